//! The dtype vocabulary: inference from raw text and coercion between types.
//!
//! A [`DType`] is either one of ten scalar types or an `N-tuple`, a
//! fixed-length sequence of `N` string sub-values written as `(v1; v2; ...)`.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::model::Value;
use crate::util::datetime::{parse_date, parse_datetime, parse_time};

/// Suffix of tuple dtype names (`2-tuple`, `3-tuple`, ...).
const TUPLE_SUFFIX: &str = "-tuple";

/// Declared type of a property's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int,
    Float,
    String,
    Boolean,
    Date,
    Time,
    Datetime,
    Url,
    Person,
    Text,
    /// Fixed-arity tuple. The arity is at least 1 for every parsed dtype.
    Tuple(usize),
}

lazy_static! {
    /// Canonical names and aliases of the scalar dtypes.
    static ref SCALAR_NAMES: FxHashMap<&'static str, DType> = {
        let mut names = FxHashMap::default();
        for dtype in DType::SCALARS {
            if let Some(name) = dtype.scalar_name() {
                names.insert(name, dtype);
            }
        }
        names.insert("str", DType::String);
        names.insert("bool", DType::Boolean);
        names
    };
}

impl DType {
    /// Every scalar dtype, in declaration order.
    pub const SCALARS: [DType; 10] = [
        DType::Int,
        DType::Float,
        DType::String,
        DType::Boolean,
        DType::Date,
        DType::Time,
        DType::Datetime,
        DType::Url,
        DType::Person,
        DType::Text,
    ];

    /// Creates a tuple dtype; `None` for arity 0.
    pub fn tuple(arity: usize) -> Option<DType> {
        (arity > 0).then_some(DType::Tuple(arity))
    }

    /// Returns the tuple arity, or `None` for scalar dtypes.
    pub fn arity(self) -> Option<usize> {
        match self {
            DType::Tuple(n) => Some(n),
            _ => None,
        }
    }

    /// Returns true for tuple dtypes.
    pub fn is_tuple(self) -> bool {
        matches!(self, DType::Tuple(_))
    }

    /// Returns true for dtypes whose values are stored as plain strings.
    pub fn is_text_like(self) -> bool {
        matches!(self, DType::String | DType::Text | DType::Url | DType::Person)
    }

    fn scalar_name(self) -> Option<&'static str> {
        let name = match self {
            DType::Int => "int",
            DType::Float => "float",
            DType::String => "string",
            DType::Boolean => "boolean",
            DType::Date => "date",
            DType::Time => "time",
            DType::Datetime => "datetime",
            DType::Url => "url",
            DType::Person => "person",
            DType::Text => "text",
            DType::Tuple(_) => return None,
        };
        Some(name)
    }

    /// Strict insertion check: can a value whose own dtype is `found` enter a
    /// container declared as `self`?
    ///
    /// String values are accepted by every text-like dtype, and tuple
    /// containers defer entirely to coercion.
    pub(crate) fn accepts(self, found: DType) -> bool {
        self == found || self.is_tuple() || (self.is_text_like() && found.is_text_like())
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scalar_name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}{}", self.arity().unwrap_or_default(), TUPLE_SUFFIX),
        }
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(dtype) = SCALAR_NAMES.get(s) {
            return Ok(*dtype);
        }
        s.strip_suffix(TUPLE_SUFFIX)
            .and_then(|arity| arity.parse::<usize>().ok())
            .and_then(DType::tuple)
            .ok_or_else(|| Error::UnknownDType { token: s.to_string() })
    }
}

impl TryFrom<&str> for DType {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

/// Anything that can be resolved to a dtype: a [`DType`] or its name.
pub trait IntoDType {
    fn into_dtype(self) -> Result<DType>;
}

impl IntoDType for DType {
    fn into_dtype(self) -> Result<DType> {
        Ok(self)
    }
}

impl IntoDType for &str {
    fn into_dtype(self) -> Result<DType> {
        self.parse()
    }
}

impl IntoDType for String {
    fn into_dtype(self) -> Result<DType> {
        self.parse()
    }
}

impl IntoDType for &String {
    fn into_dtype(self) -> Result<DType> {
        self.parse()
    }
}

/// Parses the closed set of boolean tokens (`true/false/t/f/1/0`, any case).
pub fn parse_bool_token(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Some(true),
        "false" | "f" | "0" => Some(false),
        _ => None,
    }
}

fn looks_like_float(token: &str) -> bool {
    token.parse::<f64>().is_ok_and(f64::is_finite) && token.bytes().any(|b| b.is_ascii_digit())
}

/// Infers the most specific dtype for one raw text token.
///
/// Boolean tokens win over numbers, so `"1"` infers as `boolean`.
pub fn infer(token: &str) -> DType {
    let trimmed = token.trim();
    if parse_bool_token(trimmed).is_some() {
        DType::Boolean
    } else if trimmed.parse::<i64>().is_ok() {
        DType::Int
    } else if looks_like_float(trimmed) {
        DType::Float
    } else if token.contains('\n') {
        DType::Text
    } else {
        DType::String
    }
}

/// Splits a tuple literal `(v1; v2; ...; vN)` into exactly `arity` elements.
///
/// Parentheses are optional and elements are trimmed.
pub fn parse_tuple(s: &str, arity: usize) -> Result<Vec<String>> {
    let trimmed = s.trim();
    let inner = trimmed.strip_prefix('(').unwrap_or(trimmed);
    let inner = inner.strip_suffix(')').unwrap_or(inner);
    let elements: Vec<String> = inner.split(';').map(|e| e.trim().to_string()).collect();
    if elements.len() != arity {
        return Err(Error::TupleLength {
            expected: arity,
            found: elements.len(),
        });
    }
    Ok(elements)
}

/// Converts one value to `target`.
///
/// Conversions are idempotent: coercing an already coerced value yields it
/// unchanged.
pub fn coerce(value: &Value, target: DType) -> Result<Value> {
    let fail = || Error::Coercion {
        value: value.to_string(),
        dtype: target,
    };

    match target {
        DType::Int => match value {
            Value::Int(v) => Ok(Value::Int(*v)),
            Value::Float(f) if f.is_finite() && f.abs() < i64::MAX as f64 => Ok(Value::Int(f.trunc() as i64)),
            Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
            Value::String(s) => s.trim().parse().map(Value::Int).map_err(|_| fail()),
            _ => Err(fail()),
        },
        DType::Float => match value {
            Value::Int(v) => Ok(Value::Float(*v as f64)),
            Value::Float(f) => Ok(Value::Float(*f)),
            Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| !f.is_nan())
                .map(Value::Float)
                .ok_or_else(fail),
            _ => Err(fail()),
        },
        DType::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::Int(0) => Ok(Value::Bool(false)),
            Value::Int(1) => Ok(Value::Bool(true)),
            Value::Float(f) if *f == 0.0 => Ok(Value::Bool(false)),
            Value::Float(f) if *f == 1.0 => Ok(Value::Bool(true)),
            Value::String(s) => parse_bool_token(s).map(Value::Bool).ok_or_else(fail),
            _ => Err(fail()),
        },
        DType::String | DType::Text | DType::Url | DType::Person => match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Ok(Value::String(other.to_string())),
        },
        DType::Date => match value {
            Value::Date(d) => Ok(Value::Date(*d)),
            Value::Datetime(dt) => Ok(Value::Date(dt.date())),
            Value::String(s) => parse_date(s).map(Value::Date).map_err(|_| fail()),
            _ => Err(fail()),
        },
        DType::Time => match value {
            Value::Time(t) => Ok(Value::Time(*t)),
            Value::Datetime(dt) => Ok(Value::Time(dt.time())),
            Value::String(s) => parse_time(s).map(Value::Time).map_err(|_| fail()),
            _ => Err(fail()),
        },
        DType::Datetime => match value {
            Value::Datetime(dt) => Ok(Value::Datetime(*dt)),
            Value::Date(d) => d.and_hms_opt(0, 0, 0).map(Value::Datetime).ok_or_else(fail),
            Value::String(s) => parse_datetime(s).map(Value::Datetime).map_err(|_| fail()),
            _ => Err(fail()),
        },
        DType::Tuple(arity) => match value {
            Value::Tuple(elements) if elements.len() == arity => Ok(Value::Tuple(elements.clone())),
            Value::Tuple(elements) => Err(Error::TupleLength {
                expected: arity,
                found: elements.len(),
            }),
            Value::String(s) => parse_tuple(s, arity).map(Value::Tuple),
            other => parse_tuple(&other.to_string(), arity).map(Value::Tuple),
        },
    }
}

/// Coerces every value to `target`, failing on the first value that does not
/// convert. Nothing is returned unless all values convert.
pub fn coerce_all(values: &[Value], target: DType) -> Result<Vec<Value>> {
    values.iter().map(|v| coerce(v, target)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for dtype in DType::SCALARS {
            assert_eq!(dtype.to_string().parse::<DType>().unwrap(), dtype);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("bool".parse::<DType>().unwrap(), DType::Boolean);
        assert_eq!("str".parse::<DType>().unwrap(), DType::String);
    }

    #[test]
    fn test_parse_tuple() {
        assert_eq!("2-tuple".parse::<DType>().unwrap(), DType::Tuple(2));
        assert_eq!(DType::Tuple(3).to_string(), "3-tuple");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for token in ["crash and burn", "x-tuple", "0-tuple", "-tuple", "", "Int"] {
            let err = token.parse::<DType>().unwrap_err();
            assert!(matches!(err, Error::UnknownDType { .. }), "{token:?}");
        }
    }

    #[test]
    fn test_infer() {
        assert_eq!(infer("True"), DType::Boolean);
        assert_eq!(infer("f"), DType::Boolean);
        assert_eq!(infer("1"), DType::Boolean);
        assert_eq!(infer("42"), DType::Int);
        assert_eq!(infer("-7"), DType::Int);
        assert_eq!(infer("3.14"), DType::Float);
        assert_eq!(infer("1e3"), DType::Float);
        assert_eq!(infer("nan"), DType::String);
        assert_eq!(infer("Freude"), DType::String);
        assert_eq!(infer("line one\nline two"), DType::Text);
    }

    #[test]
    fn test_int_to_bool() {
        assert_eq!(coerce(&Value::Int(1), DType::Boolean).unwrap(), Value::Bool(true));
        assert_eq!(coerce(&Value::Int(0), DType::Boolean).unwrap(), Value::Bool(false));
        assert!(coerce(&Value::Int(3), DType::Boolean).is_err());
        assert!(coerce(&Value::Float(0.5), DType::Boolean).is_err());
    }

    #[test]
    fn test_string_to_bool() {
        for (token, expected) in [("TRUE", true), ("t", true), ("F", false), ("0", false)] {
            let value = Value::String(token.to_string());
            assert_eq!(coerce(&value, DType::Boolean).unwrap(), Value::Bool(expected));
        }
        assert!(coerce(&Value::String("12".to_string()), DType::Boolean).is_err());
        assert!(coerce(&Value::String("Ft".to_string()), DType::Boolean).is_err());
    }

    #[test]
    fn test_string_to_int() {
        assert_eq!(coerce(&Value::String("8".to_string()), DType::Int).unwrap(), Value::Int(8));
        assert!(coerce(&Value::String("1 Dog".to_string()), DType::Int).is_err());
        assert!(coerce(&Value::String("Seven".to_string()), DType::Int).is_err());
    }

    #[test]
    fn test_tuple_coercion() {
        let value = Value::String("(39.12; 67.19)".to_string());
        assert_eq!(
            coerce(&value, DType::Tuple(2)).unwrap(),
            Value::Tuple(vec!["39.12".to_string(), "67.19".to_string()])
        );

        let bare = Value::String("1;2".to_string());
        assert_eq!(coerce(&bare, DType::Tuple(2)).unwrap().as_tuple().unwrap().len(), 2);

        let long = Value::String("(5689; 1254; 687)".to_string());
        assert_eq!(
            coerce(&long, DType::Tuple(2)).unwrap_err(),
            Error::TupleLength { expected: 2, found: 3 }
        );
    }

    #[test]
    fn test_date_family() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let dt = date.and_hms_opt(14, 30, 0).unwrap();

        assert_eq!(coerce(&Value::Datetime(dt), DType::Date).unwrap(), Value::Date(date));
        assert_eq!(
            coerce(&Value::String("2024-03-15".to_string()), DType::Date).unwrap(),
            Value::Date(date)
        );
        assert_eq!(
            coerce(&Value::Date(date), DType::Datetime).unwrap(),
            Value::Datetime(date.and_hms_opt(0, 0, 0).unwrap())
        );
        assert!(coerce(&Value::Int(5), DType::Time).is_err());
    }

    #[test]
    fn test_everything_renders_to_text() {
        let tuple = Value::Tuple(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(coerce(&tuple, DType::String).unwrap(), Value::String("(a; b)".to_string()));
        assert_eq!(coerce(&Value::Bool(true), DType::Url).unwrap(), Value::String("true".to_string()));
        assert_eq!(coerce(&Value::Float(2.0), DType::Person).unwrap(), Value::String("2.0".to_string()));
    }

    #[test]
    fn test_coerce_all_is_all_or_nothing() {
        let values = vec![Value::Int(1), Value::Int(0), Value::Int(8)];
        assert!(coerce_all(&values, DType::Boolean).is_err());
        assert_eq!(coerce_all(&values[..2], DType::Boolean).unwrap().len(), 2);
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            any::<i64>().prop_map(Value::Int),
            (-1.0e12f64..1.0e12).prop_map(Value::Float),
            any::<bool>().prop_map(Value::Bool),
            "[a-z0-9 ;()]{0,12}".prop_map(Value::String),
            (0i32..3000, 1u32..13, 1u32..29)
                .prop_map(|(y, m, d)| Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())),
            proptest::collection::vec("[a-z0-9]{0,4}", 1..4).prop_map(Value::Tuple),
        ]
    }

    fn arb_dtype() -> impl Strategy<Value = DType> {
        prop_oneof![
            proptest::sample::select(DType::SCALARS.to_vec()),
            (1usize..4).prop_map(DType::Tuple),
        ]
    }

    proptest! {
        #[test]
        fn prop_coerce_is_idempotent(value in arb_value(), dtype in arb_dtype()) {
            if let Ok(once) = coerce(&value, dtype) {
                let twice = coerce(&once, dtype).unwrap();
                prop_assert_eq!(once, twice);
            }
        }
    }
}
