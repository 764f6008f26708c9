//! Purpose: Typed value slot stored per query key, plus its rendering and readings.
//! Exports: `Value`.
//! Role: Every consumer (serializer, accessors, CLI) matches on this union exhaustively.
//! Invariants: Rendering is total: every variant has exactly one text form.
//! Invariants: Integer/float readings never panic; failures are `NotANumber` or `OutOfRange`.
use std::fmt;

use serde::{Serialize, Serializer};

use crate::core::error::{Error, ErrorKind};

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    String(String),
}

// 2^63, the first f64 past i64::MAX.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Null => "null",
            Self::String(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Falsy values are `0`, `0.0`, NaN, `""`, `false` and `Null`.
    pub fn truthy(&self) -> bool {
        match self {
            Self::Integer(n) => *n != 0,
            Self::Float(n) => *n != 0.0 && !n.is_nan(),
            Self::Boolean(b) => *b,
            Self::Null => false,
            Self::String(text) => !text.is_empty(),
        }
    }

    /// Integer reading: floats truncate toward zero, strings read their leading
    /// decimal digits, booleans and null have no reading.
    pub fn to_integer(&self) -> Result<i64, Error> {
        match self {
            Self::Integer(n) => Ok(*n),
            Self::Float(n) => float_to_integer(*n),
            Self::String(text) => leading_integer(text),
            Self::Boolean(_) | Self::Null => Err(not_a_number(self)),
        }
    }

    /// Float reading: strings read their longest leading float literal.
    pub fn to_float(&self) -> Result<f64, Error> {
        match self {
            Self::Integer(n) => Ok(*n as f64),
            Self::Float(n) if n.is_nan() => Err(not_a_number(self)),
            Self::Float(n) => Ok(*n),
            Self::String(text) => leading_float(text).ok_or_else(|| not_a_number(self)),
            Self::Boolean(_) | Self::Null => Err(not_a_number(self)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write_float(*n, f),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
            Self::String(text) => f.write_str(text),
        }
    }
}

fn write_float(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        // Whole numbers keep a `.0` so the text reparses as a float, not an integer.
        let text = n.to_string();
        if text.contains('.') {
            f.write_str(&text)
        } else {
            write!(f, "{text}.0")
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::Float(_) | Self::Null => serializer.serialize_unit(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::String(text) => serializer.serialize_str(text),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

fn not_a_number(value: &Value) -> Error {
    Error::new(ErrorKind::NotANumber).with_message(format!(
        "{} value `{value}` has no numeric reading",
        value.kind_name()
    ))
}

fn float_to_integer(n: f64) -> Result<i64, Error> {
    if !n.is_finite() {
        return Err(not_a_number(&Value::Float(n)));
    }
    let truncated = n.trunc();
    if truncated < -I64_UPPER || truncated >= I64_UPPER {
        return Err(Error::new(ErrorKind::OutOfRange)
            .with_message(format!("float `{n}` does not fit a 64-bit integer")));
    }
    Ok(truncated as i64)
}

fn leading_integer(text: &str) -> Result<i64, Error> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return Err(Error::new(ErrorKind::NotANumber)
            .with_message(format!("string `{text}` has no leading integer")));
    }
    trimmed[..sign_len + digits].parse::<i64>().map_err(|err| {
        Error::new(ErrorKind::OutOfRange)
            .with_message(format!("string `{text}` does not fit a 64-bit integer"))
            .with_source(err)
    })
}

fn leading_float(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if trimmed[end..].starts_with("Infinity") {
        let inf = f64::INFINITY;
        return Some(if bytes.first() == Some(&b'-') { -inf } else { inf });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::core::error::ErrorKind;

    #[test]
    fn rendering_is_explicit_per_variant() {
        assert_eq!(Value::Integer(-7).to_string(), "-7");
        assert_eq!(Value::Float(0.02).to_string(), "0.02");
        assert_eq!(Value::Float(2e10).to_string(), "20000000000.0");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::Float(0.0).to_string(), "0.0");
        assert_eq!(Value::Float(-0.0).to_string(), "-0.0");
        assert_eq!(Value::Float(1e16).to_string(), "10000000000000000.0");
        assert_eq!(Value::Float(1e-7).to_string(), "0.0000001");
        assert_eq!(Value::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("x=y").to_string(), "x=y");
    }

    #[test]
    fn integer_reading_follows_leading_digits() {
        assert_eq!(Value::from("42px").to_integer().unwrap(), 42);
        assert_eq!(Value::from("  -12").to_integer().unwrap(), -12);
        assert_eq!(Value::Float(3.9).to_integer().unwrap(), 3);
        assert_eq!(Value::Float(-3.9).to_integer().unwrap(), -3);
        assert_eq!(
            Value::from("not_a_number").to_integer().unwrap_err().kind(),
            ErrorKind::NotANumber
        );
        assert_eq!(
            Value::Boolean(true).to_integer().unwrap_err().kind(),
            ErrorKind::NotANumber
        );
        assert_eq!(
            Value::from("99999999999999999999").to_integer().unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            Value::Float(1e300).to_integer().unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn float_reading_follows_leading_literal() {
        assert_eq!(Value::from("3.5kg").to_float().unwrap(), 3.5);
        assert_eq!(Value::from(".5").to_float().unwrap(), 0.5);
        assert_eq!(Value::from("1e3x").to_float().unwrap(), 1000.0);
        assert_eq!(Value::from("2e").to_float().unwrap(), 2.0);
        assert_eq!(Value::from("-Infinity").to_float().unwrap(), f64::NEG_INFINITY);
        assert_eq!(Value::Integer(7).to_float().unwrap(), 7.0);
        assert!(Value::from(".").to_float().unwrap_err().is_nan());
        assert!(Value::Null.to_float().unwrap_err().is_nan());
        assert!(Value::Float(f64::NAN).to_float().unwrap_err().is_nan());
    }

    #[test]
    fn string_view_and_optional_conversion() {
        assert_eq!(Value::from("spiral").as_str(), Some("spiral"));
        assert_eq!(Value::Integer(3).as_str(), None);
        assert_eq!(Value::from(Some(4_i64)), Value::Integer(4));
        assert_eq!(Value::from(Some("x")), Value::from("x"));
        assert_eq!(Value::from(None::<bool>), Value::Null);
    }

    #[test]
    fn truthiness_matches_falsy_set() {
        assert!(!Value::Integer(0).truthy());
        assert!(!Value::Float(f64::NAN).truthy());
        assert!(!Value::from("").truthy());
        assert!(!Value::Null.truthy());
        assert!(Value::from("false").truthy());
        assert!(Value::Integer(-1).truthy());
    }

    #[test]
    fn serializes_as_json_scalars() {
        let values = vec![
            Value::Integer(1),
            Value::Float(0.5),
            Value::Float(f64::INFINITY),
            Value::Boolean(true),
            Value::Null,
            Value::from("s"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,0.5,null,true,null,"s"]"#);
    }
}
