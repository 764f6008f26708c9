//! Purpose: Hold top-level CLI command dispatch for `spiral-query`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Query input resolves as: positional text, then `--url`, then `$QUERY_STRING`.
//! Invariants: Only argument problems (bad JSON, bad URL) are errors; query text never is.

use super::*;

use serde_json::Value as JsonValue;
use spiral_query::api::{CurrentLocation, EnvLocation, HTML_SEPARATOR, QueryCodec, SketchParams};
use url::Url;

pub(super) fn dispatch_command(
    command: Command,
    options: ParseOptions,
    pretty: bool,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Parse { query, url } => {
            let codec = resolve_codec(query, url, &options)?;
            let types: Map<String, JsonValue> = codec
                .iter()
                .map(|(key, value)| (key.clone(), json!(value.kind_name())))
                .collect();
            emit_json(json!({ "values": codec, "types": types }), pretty);
            Ok(RunOutcome::ok())
        }
        Command::Serialize {
            json,
            html,
            separator,
            delimiter,
            prefix,
        } => {
            let init: JsonValue = serde_json::from_str(&json).map_err(|err| {
                Error::new(ErrorKind::Usage)
                    .with_message("invalid JSON initializer")
                    .with_hint("Pass a JSON object, e.g. '{\"s\": 20, \"w\": 0.02}'.")
                    .with_source(err)
            })?;
            let codec = QueryCodec::from_json(&init);
            let separator = if html { HTML_SEPARATOR } else { separator.as_str() };
            let query = codec.serialize(separator, &delimiter, &prefix);
            emit_json(json!({ "query": query }), pretty);
            Ok(RunOutcome::ok())
        }
        Command::Sketch { query, url } => {
            let codec = resolve_codec(query, url, &options)?;
            let params = SketchParams::from_codec(&codec);
            let mut value = serde_json::to_value(params).map_err(|err| {
                Error::new(ErrorKind::Internal)
                    .with_message("failed to encode sketch params")
                    .with_source(err)
            })?;
            if let JsonValue::Object(map) = &mut value {
                map.insert("pitch_step".to_string(), json!(params.pitch_step()));
                map.insert("speed_step".to_string(), json!(params.speed_step()));
                map.insert("href".to_string(), json!(params.share_href()));
                map.insert("link".to_string(), json!(params.to_codec().to_text()));
            }
            emit_json(value, pretty);
            Ok(RunOutcome::ok())
        }
    }
}

fn resolve_codec(
    query: Option<String>,
    url: Option<String>,
    options: &ParseOptions,
) -> Result<QueryCodec, Error> {
    if let Some(query) = query {
        let text = query.strip_prefix('?').unwrap_or(&query);
        return Ok(QueryCodec::parse_with(text, options));
    }
    if let Some(url) = url {
        let url = Url::parse(&url).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid URL `{url}`"))
                .with_hint("Pass an absolute URL, e.g. https://example.org/spiral/?s=20.")
                .with_source(err)
        })?;
        return Ok(QueryCodec::from_location_with(&url, options));
    }
    let location = EnvLocation::new();
    tracing::debug!(query = %location.query_text(), "reading query from environment");
    Ok(QueryCodec::from_location_with(&location, options))
}
