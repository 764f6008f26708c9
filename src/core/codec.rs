//! Purpose: Own an ordered key/value mapping parsed from, or serialized to, a URL query string.
//! Exports: `QueryCodec`, `HTML_SEPARATOR`.
//! Role: Core type consumed by the sketch config and the CLI.
//! Invariants: Insertion order is preserved; re-setting a key keeps its position.
//! Invariants: Caller-supplied mappings are stored as-is (no coercion, no validation).
//! Invariants: An empty mapping serializes to `""`, never to a bare prefix.
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use crate::core::encoding::encode_component;
use crate::core::error::Error;
use crate::core::grammar::{ParseOptions, parse_query};
use crate::core::location::CurrentLocation;
use crate::core::value::Value;

/// Parameter separator for query strings written into an HTML attribute.
pub const HTML_SEPARATOR: &str = "&amp;";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryCodec {
    values: IndexMap<String, Value>,
}

impl QueryCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }

    /// Builds a codec from a JSON initializer. Objects are taken entry by entry;
    /// any other JSON value yields an empty codec.
    pub fn from_json(init: &JsonValue) -> Self {
        let JsonValue::Object(map) = init else {
            tracing::debug!("non-object initializer; starting from an empty mapping");
            return Self::new();
        };
        map.iter()
            .map(|(key, value)| (key.clone(), json_to_value(value)))
            .collect()
    }

    pub fn from_location(location: &impl CurrentLocation) -> Self {
        Self::from_location_with(location, &ParseOptions::default())
    }

    pub fn from_location_with(location: &impl CurrentLocation, options: &ParseOptions) -> Self {
        Self::parse_with(&location.query_text(), options)
    }

    /// Parses raw query text (no leading `?`).
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, &ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: &ParseOptions) -> Self {
        Self {
            values: parse_query(text, options),
        }
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }

    pub fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.values.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes `key`, returning the value it held.
    pub fn unset(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    /// `None` when absent; `Err` with `ErrorKind::NotANumber` when the value
    /// has no integer reading.
    pub fn get_integer(&self, key: &str) -> Option<Result<i64, Error>> {
        self.get(key)
            .map(|value| value.to_integer().map_err(|err| err.with_key(key)))
    }

    pub fn get_float(&self, key: &str) -> Option<Result<f64, Error>> {
        self.get(key)
            .map(|value| value.to_float().map_err(|err| err.with_key(key)))
    }

    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.get(key).map(Value::truthy)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(Value::to_string)
    }

    /// Joins `key<delimiter>value` fragments with `separator` behind `prefix`.
    /// A separator of `&amp;` or `;` selects HTML-safe mode, where keys and values
    /// are URI-component encoded; any other separator emits them verbatim.
    pub fn serialize(&self, separator: &str, delimiter: &str, prefix: &str) -> String {
        if self.values.is_empty() {
            return String::new();
        }
        let html_safe = separator == HTML_SEPARATOR || separator == ";";

        let fragments: Vec<String> = self
            .values
            .iter()
            .map(|(key, value)| {
                let text = value.to_string();
                if html_safe {
                    format!(
                        "{}{delimiter}{}",
                        encode_component(key),
                        encode_component(&text)
                    )
                } else {
                    format!("{key}{delimiter}{text}")
                }
            })
            .collect();

        format!("{prefix}{}", fragments.join(separator))
    }

    pub fn to_text(&self) -> String {
        self.serialize("&", "=", "?")
    }

    /// Query string ready for an `href` attribute.
    pub fn to_html(&self) -> String {
        self.serialize(HTML_SEPARATOR, "=", "?")
    }

    /// Address to navigate to: `page` (or the current page when `None`)
    /// followed by the plain-text query.
    pub fn goto_href(&self, page: Option<&str>) -> String {
        format!("{}{}", page.unwrap_or_default(), self.to_text())
    }
}

impl fmt::Display for QueryCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryCodec {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a QueryCodec {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Serialize for QueryCodec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn json_to_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Boolean(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(int) => Value::Integer(int),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(text) => Value::String(text.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => Value::String(value.to_string()),
    }
}
