//! Purpose: Lock the query grammar and serialization contract through the public API.
//! Exports: Integration tests only (no runtime exports).
//! Role: Catch drift in coercion rules, empty-key handling, and HTML-safe output.
//! Invariants: Every case goes through `spiral_query::api` only.

use spiral_query::api::{
    BoolCase, CurrentLocation, ErrorKind, Href, ParseOptions, QueryCodec, SketchParams, Value,
    decode_component,
};

fn parse(text: &str) -> QueryCodec {
    QueryCodec::parse(text)
}

#[test]
#[allow(clippy::approx_constant)]
fn coercion_corpus() {
    let cases = [
        ("a=42", Value::Integer(42)),
        ("a=-7", Value::Integer(-7)),
        ("a=007", Value::from("007")),
        ("a=3.14", Value::Float(3.14)),
        ("a=2e10", Value::Float(2e10)),
        ("a=1.5e-3", Value::Float(1.5e-3)),
        ("a=3.14.15", Value::from("3.14.15")),
        ("a=true", Value::Boolean(true)),
        ("a=false", Value::Boolean(false)),
        ("a=null", Value::Null),
        ("a=", Value::from("")),
        ("a", Value::from("")),
        ("a=x=y=z", Value::from("x=y=z")),
        ("a=%34%32", Value::Integer(42)),
    ];

    for (input, expected) in cases {
        assert_eq!(parse(input).get("a"), Some(&expected), "input {input:?}");
    }
}

#[test]
fn empty_keys_never_stored() {
    let codec = parse("=5&x=1");
    assert_eq!(codec.len(), 1);
    assert_eq!(codec.get("x"), Some(&Value::Integer(1)));
    assert!(parse("=&=&&").is_empty());
}

#[test]
fn plain_round_trip_is_stable() {
    let inputs = [
        "s=20&c=500&p=1&w=0.02&a=135",
        "x=hello&y=true&z=null&n=-3&f=0.5",
        "only",
        "a=2e10&b=1.0&c=0.0&d=1e16",
    ];
    for input in inputs {
        let first = parse(input);
        let text = first.to_text();
        let second = parse(text.trim_start_matches('?'));
        assert_eq!(second, first, "round trip of {input:?}");
        for (key, value) in first.iter() {
            assert_eq!(
                second.get(key).map(Value::kind_name),
                Some(value.kind_name()),
                "kind of {key:?} in {input:?}"
            );
        }
    }
}

#[test]
fn html_output_never_leaks_raw_ampersand_inside_values() {
    let mut codec = QueryCodec::new();
    codec.set("a", "1&2");
    codec.set("b", "x y");
    let html = codec.to_html();
    assert_eq!(html, "?a=1%262&amp;b=x%20y");
    let without_separators = html.replace("&amp;", "");
    assert!(!without_separators.contains('&'));

    // Decoding the HTML-safe fragments restores the original values.
    let roundtrip = parse(&html[1..].replace("&amp;", "&"));
    assert_eq!(roundtrip.get("a"), Some(&Value::from("1&2")));
    assert_eq!(roundtrip.get("b"), Some(&Value::from("x y")));
    assert_eq!(decode_component("1%262"), "1&2");
}

#[test]
fn empty_codec_has_no_prefix() {
    assert_eq!(QueryCodec::new().to_string(), "");
    assert_eq!(parse("").to_text(), "");
}

#[test]
fn accessor_sentinels() {
    let codec = parse("s=20&c=500&p=1&w=0.02&a=not_a_number");
    assert_eq!(codec.get_integer("s").unwrap().unwrap(), 20);
    let err = codec.get_integer("a").unwrap().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotANumber);
    assert!(codec.get_float("a").unwrap().unwrap_err().is_nan());
    assert_eq!(codec.get_float("w").unwrap().unwrap(), 0.02);
    assert!(codec.get_integer("q").is_none());
}

#[test]
fn boolean_case_policy_is_explicit() {
    let mixed = "a=True&b=TRUE&c=False&d=true";
    let exact = parse(mixed);
    assert_eq!(exact.get("a"), Some(&Value::from("True")));
    assert_eq!(exact.get("b"), Some(&Value::from("TRUE")));
    assert_eq!(exact.get("c"), Some(&Value::from("False")));
    assert_eq!(exact.get("d"), Some(&Value::Boolean(true)));

    let options = ParseOptions::default().with_bool_case(BoolCase::IgnoreAscii);
    let lenient = QueryCodec::parse_with(mixed, &options);
    assert_eq!(lenient.get("a"), Some(&Value::Boolean(true)));
    assert_eq!(lenient.get("b"), Some(&Value::Boolean(true)));
    assert_eq!(lenient.get("c"), Some(&Value::Boolean(false)));
}

#[test]
fn custom_location_provider() {
    struct Fixed;

    impl CurrentLocation for Fixed {
        fn query_text(&self) -> String {
            "s=25&a=45".to_string()
        }
    }

    let codec = QueryCodec::from_location(&Fixed);
    let params = SketchParams::from_codec(&codec);
    assert_eq!(params.size, 25);
    assert_eq!(params.angle, 45);

    let href = QueryCodec::from_location(&Href::new("index.html?c=900"));
    assert_eq!(SketchParams::from_codec(&href).count, 900);
}
