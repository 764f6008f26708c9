//! Purpose: URI-component percent encoding and decoding for query keys and values.
//! Exports: `encode_component`, `decode_component`, `COMPONENT`.
//! Role: Only place that knows which bytes are escaped in HTML-safe output.
//! Invariants: The escape set matches `encodeURIComponent` (unreserved: A-Z a-z 0-9 - _ . ! ~ * ' ( )).
//! Invariants: Decoding never fails; malformed `%` runs pass through, invalid UTF-8 is replaced.
use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

pub const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, COMPONENT).into()
}

/// `+` is left alone; only `%XX` escapes are decoded.
pub fn decode_component(input: &str) -> Cow<'_, str> {
    percent_decode_str(input).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::{decode_component, encode_component};

    #[test]
    fn encodes_reserved_and_keeps_unreserved() {
        assert_eq!(encode_component("1&2"), "1%262");
        assert_eq!(encode_component("a=b c"), "a%3Db%20c");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_component("snow\u{2603}"), "snow%E2%98%83");
    }

    #[test]
    fn decodes_escapes_but_not_plus() {
        assert_eq!(decode_component("a%20b"), "a b");
        assert_eq!(decode_component("a+b"), "a+b");
        assert_eq!(decode_component("%E2%98%83"), "\u{2603}");
    }

    #[test]
    fn malformed_escapes_pass_through() {
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(decode_component("%ff"), "\u{fffd}");
    }
}
