//! Date and time parsing and formatting for `date`, `time` and `datetime` values.
//!
//! Textual forms:
//! - Date: `YYYY-MM-DD`
//! - Time: `HH:MM:SS`
//! - Datetime: `YYYY-MM-DD HH:MM:SS` (a `T` separator is accepted on input)

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Canonical date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Canonical time format.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Canonical datetime format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_INPUT_FORMATS: [&str; 2] = [DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%S"];

/// Error type for date/time parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParseError {
    pub message: String,
}

impl std::fmt::Display for DateTimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DateTimeParseError {}

// =====================
// DATE functions
// =====================

/// Parses a `YYYY-MM-DD` date string.
pub fn parse_date(date_str: &str) -> Result<NaiveDate, DateTimeParseError> {
    NaiveDate::parse_from_str(date_str.trim(), DATE_FORMAT).map_err(|e| DateTimeParseError {
        message: format!("Invalid date {:?}: {}", date_str, e),
    })
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// =====================
// TIME functions
// =====================

/// Parses an `HH:MM:SS` time string.
pub fn parse_time(time_str: &str) -> Result<NaiveTime, DateTimeParseError> {
    NaiveTime::parse_from_str(time_str.trim(), TIME_FORMAT).map_err(|e| DateTimeParseError {
        message: format!("Invalid time {:?}: {}", time_str, e),
    })
}

/// Formats a time as `HH:MM:SS`.
pub fn format_time(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

// =====================
// DATETIME functions
// =====================

/// Parses a `YYYY-MM-DD HH:MM:SS` (or `T`-separated) datetime string.
pub fn parse_datetime(datetime_str: &str) -> Result<NaiveDateTime, DateTimeParseError> {
    let trimmed = datetime_str.trim();
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DateTimeParseError {
            message: format!("Invalid datetime: {:?}", datetime_str),
        })
}

/// Formats a datetime as `YYYY-MM-DD HH:MM:SS`.
pub fn format_datetime(datetime: &NaiveDateTime) -> String {
    datetime.format(DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_basic() {
        let date = parse_date("1890-08-20").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1890, 8, 20).unwrap());
        assert_eq!(parse_date(" 2000-02-29 ").unwrap().to_string(), "2000-02-29");
    }

    #[test]
    fn test_date_roundtrip() {
        for date in ["1970-01-01", "2024-03-15", "2000-02-29", "1890-08-20"] {
            let parsed = parse_date(date).unwrap();
            assert_eq!(format_date(&parsed), date, "Roundtrip failed for {}", date);
        }
    }

    #[test]
    fn test_time_roundtrip() {
        for time in ["00:00:00", "14:30:00", "23:59:59"] {
            let parsed = parse_time(time).unwrap();
            assert_eq!(format_time(&parsed), time);
        }
    }

    #[test]
    fn test_datetime_separators() {
        let spaced = parse_datetime("2024-03-15 14:30:00").unwrap();
        let t_sep = parse_datetime("2024-03-15T14:30:00").unwrap();
        assert_eq!(spaced, t_sep);
        assert_eq!(format_datetime(&spaced), "2024-03-15 14:30:00");
    }

    #[test]
    fn test_invalid_dates() {
        assert!(parse_date("2023-02-29").is_err()); // not a leap year
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("not a date").is_err());
    }

    #[test]
    fn test_invalid_times() {
        assert!(parse_time("24:00:01").is_err());
        assert!(parse_time("12:60:00").is_err());
        assert!(parse_datetime("2024-03-15").is_err());
    }
}
