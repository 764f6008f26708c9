//! Purpose: Tokenize raw query text and coerce each decoded value into a typed `Value`.
//! Exports: `ParseOptions`, `BoolCase`, `parse_query`, `coerce`.
//! Role: The strict grammar behind `QueryCodec::parse`; pure functions over `&str`.
//! Invariants: Parsing never fails; tokens with an empty raw key are dropped.
//! Invariants: The value is everything after the first `=`, including further `=`.
//! Invariants: Coercion order is integer, float, boolean, null, then string.
use indexmap::IndexMap;

use crate::core::encoding::decode_component;
use crate::core::value::Value;

/// How the literals `true` and `false` are matched during coercion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BoolCase {
    /// Only the lower-case literals coerce.
    #[default]
    Exact,
    /// `True`, `FALSE` and other ASCII case variants coerce too.
    IgnoreAscii,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParseOptions {
    pub bool_case: BoolCase,
}

impl ParseOptions {
    pub fn with_bool_case(mut self, bool_case: BoolCase) -> Self {
        self.bool_case = bool_case;
        self
    }
}

pub fn parse_query(text: &str, options: &ParseOptions) -> IndexMap<String, Value> {
    let mut values = IndexMap::new();
    if text.is_empty() {
        return values;
    }

    for token in text.split('&') {
        let (raw_key, raw_value) = token.split_once('=').unwrap_or((token, ""));
        if raw_key.is_empty() {
            if !token.is_empty() {
                tracing::debug!(token, "dropping query token with empty key");
            }
            continue;
        }

        let key = decode_component(raw_key).into_owned();
        let value = coerce(&decode_component(raw_value), options);
        tracing::trace!(key = %key, kind = value.kind_name(), "coerced query value");
        values.insert(key, value);
    }
    values
}

pub fn coerce(text: &str, options: &ParseOptions) -> Value {
    let int_len = integer_prefix_len(text);
    if int_len > 0 {
        if int_len == text.len() {
            return match text.parse::<i64>() {
                Ok(n) => Value::Integer(n),
                // Digit runs past i64 keep their magnitude as a float.
                Err(_) => float_or_string(text),
            };
        }
        if is_float_suffix(&text.as_bytes()[int_len..]) {
            return float_or_string(text);
        }
        return Value::String(text.to_string());
    }

    if bool_literal(text, "true", options.bool_case) {
        Value::Boolean(true)
    } else if bool_literal(text, "false", options.bool_case) {
        Value::Boolean(false)
    } else if text == "null" {
        Value::Null
    } else {
        Value::String(text.to_string())
    }
}

fn bool_literal(text: &str, literal: &str, case: BoolCase) -> bool {
    match case {
        BoolCase::Exact => text == literal,
        BoolCase::IgnoreAscii => text.eq_ignore_ascii_case(literal),
    }
}

fn float_or_string(text: &str) -> Value {
    text.parse::<f64>()
        .map(Value::Float)
        .unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Length of the `-?(0|[1-9][0-9]*)` prefix, or 0 when there is none.
fn integer_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let sign = usize::from(bytes.first() == Some(&b'-'));
    match bytes.get(sign) {
        Some(b'0') => sign + 1,
        Some(b'1'..=b'9') => {
            sign + 1
                + bytes[sign + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_digit())
                    .count()
        }
        _ => 0,
    }
}

/// Matches `(\.[0-9]+)?([eE][+-]?[0-9]+)?` against the whole slice.
fn is_float_suffix(rest: &[u8]) -> bool {
    let mut pos = 0;
    if rest.first() == Some(&b'.') {
        let digits = digit_run(&rest[1..]);
        if digits == 0 {
            return false;
        }
        pos = 1 + digits;
    }
    if matches!(rest.get(pos), Some(b'e' | b'E')) {
        pos += 1;
        if matches!(rest.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let digits = digit_run(&rest[pos.min(rest.len())..]);
        if digits == 0 {
            return false;
        }
        pos += digits;
    }
    pos == rest.len()
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
