//! Typed property values and the coercion applied to raw tokens.

use std::fmt;

use serde::Serialize;

/// A property value, typed once when its file is parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Types a resolved [`PropertyValue`] can be read as.
///
/// Returning `None` means the stored value has a different type, and the
/// caller's default is used instead.
pub trait FromProperty: Sized {
    fn from_property(value: &PropertyValue) -> Option<Self>;
}

impl FromProperty for PropertyValue {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromProperty for bool {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromProperty for f64 {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_float()
    }
}

impl FromProperty for String {
    fn from_property(value: &PropertyValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

macro_rules! impl_from_property_int {
    ($($ty:ty),*) => {
        $(
            impl FromProperty for $ty {
                fn from_property(value: &PropertyValue) -> Option<Self> {
                    value.as_int().and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

impl_from_property_int!(i64, i32, u16, u32, u64, usize);

/// Coerces a trimmed token into the most specific value it spells.
///
/// `true`/`yes` and `false`/`no` become booleans, canonical integer literals
/// become `Int`, `digits.digits` decimals become `Float`, and anything else
/// is kept as text.
pub fn coerce_value(s: &str) -> PropertyValue {
    match s {
        "true" | "yes" => return PropertyValue::Bool(true),
        "false" | "no" => return PropertyValue::Bool(false),
        _ => {}
    }

    // Literals outside the i64 range stay text rather than losing precision
    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return PropertyValue::Int(i);
        }
    }

    if looks_like_decimal(s) {
        if let Ok(f) = s.parse::<f64>() {
            return PropertyValue::Float(f);
        }
    }

    PropertyValue::Text(s.to_string())
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    is_digits(s) && (s == "0" || !s.starts_with('0'))
}

fn looks_like_decimal(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    match s.split_once('.') {
        Some((whole, frac)) => is_digits(whole) && is_digits(frac),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_booleans() {
        assert_eq!(coerce_value("true"), PropertyValue::Bool(true));
        assert_eq!(coerce_value("yes"), PropertyValue::Bool(true));
        assert_eq!(coerce_value("false"), PropertyValue::Bool(false));
        assert_eq!(coerce_value("no"), PropertyValue::Bool(false));
        // Case-sensitive
        assert_eq!(coerce_value("True"), PropertyValue::Text("True".into()));
    }

    #[test]
    fn test_coerce_integers() {
        assert_eq!(coerce_value("42"), PropertyValue::Int(42));
        assert_eq!(coerce_value("0"), PropertyValue::Int(0));
        assert_eq!(coerce_value("-17"), PropertyValue::Int(-17));
    }

    #[test]
    fn test_leading_zeros_are_text() {
        assert_eq!(coerce_value("007"), PropertyValue::Text("007".into()));
        assert_eq!(coerce_value("-01"), PropertyValue::Text("-01".into()));
    }

    #[test]
    fn test_coerce_floats() {
        assert_eq!(coerce_value("-3.5"), PropertyValue::Float(-3.5));
        assert_eq!(coerce_value("0.25"), PropertyValue::Float(0.25));
        assert_eq!(coerce_value(".5"), PropertyValue::Text(".5".into()));
        assert_eq!(coerce_value("5."), PropertyValue::Text("5.".into()));
        assert_eq!(coerce_value("1.2.3"), PropertyValue::Text("1.2.3".into()));
    }

    #[test]
    fn test_coerce_fallback_to_text() {
        assert_eq!(coerce_value("hi"), PropertyValue::Text("hi".into()));
        assert_eq!(coerce_value(""), PropertyValue::Text(String::new()));
        assert_eq!(coerce_value("-"), PropertyValue::Text("-".into()));
    }

    #[test]
    fn test_integer_overflow_stays_text() {
        let big = "99999999999999999999";
        assert_eq!(coerce_value(big), PropertyValue::Text(big.into()));
    }

    #[test]
    fn test_from_property_conversions() {
        assert_eq!(u16::from_property(&PropertyValue::Int(8080)), Some(8080));
        assert_eq!(u16::from_property(&PropertyValue::Int(-1)), None);
        assert_eq!(f64::from_property(&PropertyValue::Int(3)), Some(3.0));
        assert_eq!(i64::from_property(&PropertyValue::Float(3.0)), None);
        assert_eq!(
            String::from_property(&PropertyValue::Text("x".into())),
            Some("x".to_string())
        );
        assert_eq!(bool::from_property(&PropertyValue::Text("yes".into())), None);
    }
}
