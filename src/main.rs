//! Purpose: `spiral-query` CLI entry point.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Successful commands emit exactly one JSON document on stdout.
//! Invariants: Errors are emitted as JSON on stderr (plain text when stderr is a TTY).
//! Invariants: Process exit code is derived from `api::to_exit_code`.
use std::io::{self, IsTerminal};

use clap::{Parser, Subcommand, ValueEnum, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use spiral_query::api::{BoolCase, Error, ErrorKind, ParseOptions, to_exit_code};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Run `spiral-query --help` for usage."));
            }
        },
    };

    let options = ParseOptions::default().with_bool_case(cli.bool_case.into());
    command_dispatch::dispatch_command(cli.command, options, cli.pretty)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(
    name = "spiral-query",
    version,
    about = "Parse and build shareable query strings for the spiral sketch",
    long_about = None,
    after_help = r#"EXAMPLES
  $ spiral-query parse 's=20&c=500&w=0.02'
  $ spiral-query parse --url 'https://example.org/spiral/?s=20#top'
  $ QUERY_STRING='s=20' spiral-query parse
  $ spiral-query serialize '{"s": 20, "label": "a&b"}' --html
  $ spiral-query sketch 's=99&a=-90'"#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "exact",
        help = "How `true`/`false` literals are matched when parsing"
    )]
    bool_case: BoolCaseArg,
    #[arg(long, global = true, help = "Pretty-print JSON output")]
    pretty: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum BoolCaseArg {
    Exact,
    IgnoreAscii,
}

impl From<BoolCaseArg> for BoolCase {
    fn from(value: BoolCaseArg) -> Self {
        match value {
            BoolCaseArg::Exact => BoolCase::Exact,
            BoolCaseArg::IgnoreAscii => BoolCase::IgnoreAscii,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Parse a query string into typed values.
    Parse {
        #[arg(help = "Raw query text (a leading `?` is ignored); defaults to $QUERY_STRING")]
        query: Option<String>,
        #[arg(long, conflicts_with = "query", help = "Read the query component of a URL")]
        url: Option<String>,
    },
    /// Serialize a JSON object into a query string.
    Serialize {
        #[arg(help = "JSON object of key/value pairs")]
        json: String,
        #[arg(long, conflicts_with = "separator", help = "Emit the HTML-safe form (`&amp;` separators)")]
        html: bool,
        #[arg(long, default_value = "&", help = "Separator between parameters")]
        separator: String,
        #[arg(long, default_value = "=", help = "Separator between key and value")]
        delimiter: String,
        #[arg(long, default_value = "?", help = "Prefix for a non-empty query")]
        prefix: String,
    },
    /// Resolve spiral sketch settings and their share link.
    Sketch {
        #[arg(help = "Raw query text (a leading `?` is ignored); defaults to $QUERY_STRING")]
        query: Option<String>,
        #[arg(long, conflicts_with = "query", help = "Read the query component of a URL")]
        url: Option<String>,
    },
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error: ").to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn emit_json(value: Value, pretty: bool) {
    let json = if pretty || io::stdout().is_terminal() {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("{}", error_text(err));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
        ErrorKind::NotANumber => "not a number".to_string(),
        ErrorKind::OutOfRange => "value out of range".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(error_message(err)));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(key) = err.key() {
        inner.insert("key".to_string(), json!(key));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn error_text(err: &Error) -> String {
    let mut lines = vec![format!("error: {}", error_message(err))];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}
