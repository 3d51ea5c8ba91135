//! Property values and the raw inputs they are built from.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};
use crate::model::dtype::{self, DType};
use crate::util::datetime::{format_date, format_datetime, format_time};

/// A single typed value stored in a property.
///
/// The `string`, `text`, `url` and `person` dtypes all store [`Value::String`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Datetime(NaiveDateTime),
    /// Ordered string sub-values of an `N-tuple`.
    Tuple(Vec<String>),
}

impl Value {
    /// Returns the dtype this value has on its own.
    ///
    /// Strings containing a newline report `text`.
    pub fn dtype(&self) -> DType {
        match self {
            Value::Int(_) => DType::Int,
            Value::Float(_) => DType::Float,
            Value::Bool(_) => DType::Boolean,
            Value::String(s) if s.contains('\n') => DType::Text,
            Value::String(_) => DType::String,
            Value::Date(_) => DType::Date,
            Value::Time(_) => DType::Time,
            Value::Datetime(_) => DType::Datetime,
            Value::Tuple(elements) => DType::Tuple(elements.len()),
        }
    }

    /// Like [`Value::dtype`], but refuses an empty tuple, which has no dtype.
    pub(crate) fn checked_dtype(&self) -> Result<DType> {
        match self {
            Value::Tuple(elements) if elements.is_empty() => Err(Error::TupleLength { expected: 1, found: 0 }),
            other => Ok(other.dtype()),
        }
    }

    /// Equality that treats two NaN floats as the same value.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => self == other,
        }
    }

    /// Parses a text token, as read by a line-oriented loader.
    ///
    /// Without a dtype the token's type is inferred first.
    pub fn parse(token: &str, dtype: Option<DType>) -> Result<Value> {
        let target = dtype.unwrap_or_else(|| dtype::infer(token));
        dtype::coerce(&Value::String(token.to_string()), target)
    }

    /// Builds a tuple value from its elements.
    pub fn tuple<I, S>(elements: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Tuple(elements.into_iter().map(Into::into).collect())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[String]> {
        match self {
            Value::Tuple(elements) => Some(elements),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            // Debug keeps the fractional part of whole floats ("2.0", not "2").
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::String(s) => f.write_str(s),
            Value::Date(d) => f.write_str(&format_date(d)),
            Value::Time(t) => f.write_str(&format_time(t)),
            Value::Datetime(dt) => f.write_str(&format_datetime(dt)),
            Value::Tuple(elements) => write!(f, "({})", elements.join("; ")),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Value::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Datetime(v)
    }
}

/// Raw input handed to a property's value operations.
///
/// `None`, `""`, `()` and empty sequences all become [`ValueInput::Empty`].
/// A raw string written as a list literal, `"[a, b, c]"`, expands into one
/// string value per element.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueInput {
    #[default]
    Empty,
    One(Value),
    Many(Vec<Value>),
}

impl ValueInput {
    /// Number of values this input expands to.
    pub fn len(&self) -> usize {
        match self {
            ValueInput::Empty => 0,
            ValueInput::One(_) => 1,
            ValueInput::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the input into its values.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            ValueInput::Empty => Vec::new(),
            ValueInput::One(value) => vec![value],
            ValueInput::Many(values) => values,
        }
    }

    fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return ValueInput::Empty;
        }
        if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            if inner.trim().is_empty() {
                return ValueInput::Empty;
            }
            return ValueInput::Many(inner.split(',').map(|e| Value::from(e.trim())).collect());
        }
        ValueInput::One(Value::from(text))
    }
}

macro_rules! impl_scalar_input {
    ($($t:ty),* $(,)?) => {$(
        impl From<$t> for ValueInput {
            fn from(v: $t) -> Self {
                ValueInput::One(Value::from(v))
            }
        }
    )*};
}

impl_scalar_input!(Value, i64, i32, u32, f64, bool, NaiveDate, NaiveTime, NaiveDateTime);

impl From<&str> for ValueInput {
    fn from(v: &str) -> Self {
        ValueInput::from_text(v)
    }
}

impl From<String> for ValueInput {
    fn from(v: String) -> Self {
        ValueInput::from_text(&v)
    }
}

impl From<&String> for ValueInput {
    fn from(v: &String) -> Self {
        ValueInput::from_text(v)
    }
}

impl From<()> for ValueInput {
    fn from(_: ()) -> Self {
        ValueInput::Empty
    }
}

impl<T: Into<Value>> From<Vec<T>> for ValueInput {
    fn from(values: Vec<T>) -> Self {
        if values.is_empty() {
            return ValueInput::Empty;
        }
        ValueInput::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for ValueInput {
    fn from(values: [T; N]) -> Self {
        ValueInput::from(Vec::from(values))
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for ValueInput {
    fn from(values: &[T]) -> Self {
        ValueInput::from(values.to_vec())
    }
}

impl<T: Into<ValueInput>> From<Option<T>> for ValueInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(ValueInput::Empty, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_dtype() {
        assert_eq!(Value::from(3).dtype(), DType::Int);
        assert_eq!(Value::from(3.5).dtype(), DType::Float);
        assert_eq!(Value::from(true).dtype(), DType::Boolean);
        assert_eq!(Value::from("a string").dtype(), DType::String);
        assert_eq!(Value::from("two\nlines").dtype(), DType::Text);
        assert_eq!(Value::tuple(["a", "b", "c"]).dtype(), DType::Tuple(3));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(2.75).to_string(), "2.75");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::tuple(["39.12", "67.19"]).to_string(), "(39.12; 67.19)");
        let date = NaiveDate::from_ymd_opt(1890, 8, 20).unwrap();
        assert_eq!(Value::from(date).to_string(), "1890-08-20");
    }

    #[test]
    fn test_parse_with_and_without_dtype() {
        assert_eq!(Value::parse("42", None).unwrap(), Value::Int(42));
        assert_eq!(Value::parse("T", None).unwrap(), Value::Bool(true));
        assert_eq!(Value::parse("42", Some(DType::String)).unwrap(), Value::from("42"));
        assert_eq!(
            Value::parse("(1; 2)", Some(DType::Tuple(2))).unwrap(),
            Value::tuple(["1", "2"])
        );
        assert!(Value::parse("abc", Some(DType::Int)).is_err());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(ValueInput::from(()).is_empty());
        assert!(ValueInput::from("").is_empty());
        assert!(ValueInput::from(Vec::<i64>::new()).is_empty());
        assert!(ValueInput::from(None::<i64>).is_empty());
        assert!(ValueInput::from("[]").is_empty());
    }

    #[test]
    fn test_list_literal_expands() {
        let input = ValueInput::from("[a, b, c]");
        assert_eq!(input.len(), 3);
        assert_eq!(
            input.into_values(),
            vec![Value::from("a"), Value::from("b"), Value::from("c")]
        );

        // Typed string values are taken literally.
        assert_eq!(ValueInput::from(Value::from("[a, b]")).len(), 1);
    }

    #[test]
    fn test_sequence_inputs() {
        assert_eq!(ValueInput::from(vec![1, 2, 3]).len(), 3);
        assert_eq!(ValueInput::from([1.5, 2.5]).len(), 2);
        assert_eq!(ValueInput::from(&["x", "y"][..]).len(), 2);
        assert_eq!(ValueInput::from(Some(7)).into_values(), vec![Value::Int(7)]);
    }

    #[test]
    fn test_is_same_matches_nan() {
        assert!(Value::Float(f64::NAN).is_same(&Value::Float(f64::NAN)));
        assert!(!Value::Float(f64::NAN).is_same(&Value::Float(1.0)));
        assert!(Value::Int(3).is_same(&Value::Int(3)));
        assert!(!Value::Int(1).is_same(&Value::Float(1.0)));
    }
}
