//! Purpose: Abstract the "current page address" so codecs can be built from it without globals.
//! Exports: `CurrentLocation`, `Href`, `EnvLocation`, `QUERY_STRING_VAR`.
//! Role: Injected collaborator for the parameterless construction path of `QueryCodec`.
//! Invariants: `query_text` never includes the leading `?` or any `#fragment`.
//! Invariants: Missing or unreadable locations yield the empty string, never an error.
use std::ffi::OsString;

use url::Url;

/// CGI convention for handing the request query to a process.
pub const QUERY_STRING_VAR: &str = "QUERY_STRING";

pub trait CurrentLocation {
    /// Raw query component, without the leading `?`.
    fn query_text(&self) -> String;
}

impl<T: CurrentLocation + ?Sized> CurrentLocation for &T {
    fn query_text(&self) -> String {
        (**self).query_text()
    }
}

impl CurrentLocation for Url {
    fn query_text(&self) -> String {
        self.query().unwrap_or_default().to_string()
    }
}

/// A full or partial address held as text, e.g. `index.html?s=20#top`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Href(pub String);

impl Href {
    pub fn new(href: impl Into<String>) -> Self {
        Self(href.into())
    }
}

impl CurrentLocation for Href {
    fn query_text(&self) -> String {
        let Some((_, after)) = self.0.split_once('?') else {
            return String::new();
        };
        after.split('#').next().unwrap_or_default().to_string()
    }
}

/// Reads the query text from an environment variable (`QUERY_STRING` by default).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnvLocation {
    var: OsString,
}

impl EnvLocation {
    pub fn new() -> Self {
        Self::from_var(QUERY_STRING_VAR)
    }

    pub fn from_var(var: impl Into<OsString>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrentLocation for EnvLocation {
    fn query_text(&self) -> String {
        let text = std::env::var_os(&self.var)
            .and_then(|value| value.into_string().ok())
            .unwrap_or_default();
        // Tolerate callers that export the query with its `?`.
        text.strip_prefix('?').map(str::to_string).unwrap_or(text)
    }
}
