//! Purpose: `filmliste` CLI entry point.
//! Role: Binary crate root; parses args, runs the import pipeline, emits JSON on stdout.
//! Invariants: Commands emit stable stdout formats (JSON, pretty when stdout is a TTY).
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Logging goes to stderr and is filtered by `RUST_LOG` (default `warn`).
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Map, Value, json};
use std::error::Error as StdError;
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use filmliste::api::{
    Error, ErrorKind, IdTable, ImportOptions, JsonlLoader, import, import_into, metadata_json,
    read_known_names, summary_json, to_exit_code,
};
use filmliste::notice::{Notice, degrade_notice, notice_json};

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
                    .with_hint("Run `filmliste --help` for usage."));
            }
        },
    };

    command_dispatch::dispatch_command(cli.command)
}

#[derive(Parser)]
#[command(
    name = "filmliste",
    version,
    about = "Extract and normalize movie list feeds for bulk loading",
    long_about = None,
    after_help = r#"EXAMPLES
  $ filmliste inspect filme.json
  $ filmliste import filme.json --out ./rows
  $ xz -dc Filmliste-akt.xz | filmliste import - --out ./rows
  $ filmliste import filme.json --out ./rows \
      --known-channels ./rows/channels.jsonl --known-topics ./rows/topics.jsonl --only-new-names"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Decode a movie list and write normalized rows")]
    Import {
        #[arg(help = "Movie list file, or - for stdin", value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(
            long,
            help = "Directory for channels.jsonl, topics.jsonl, movies.jsonl and metadata.json",
            value_hint = ValueHint::DirPath
        )]
        out: Option<PathBuf>,
        #[arg(long, help = "Fail on format versions without a registered field layout")]
        strict_version: bool,
        #[arg(
            long,
            default_value_t = 100,
            help = "Maximum number of field issues listed in the report"
        )]
        max_issues: usize,
        #[arg(
            long,
            help = "channels.jsonl from an earlier run; keeps those ids stable",
            value_hint = ValueHint::FilePath
        )]
        known_channels: Option<PathBuf>,
        #[arg(
            long,
            help = "topics.jsonl from an earlier run; keeps those ids stable",
            value_hint = ValueHint::FilePath
        )]
        known_topics: Option<PathBuf>,
        #[arg(long, help = "Only write channel/topic rows not listed as known")]
        only_new_names: bool,
    },
    #[command(about = "Validate the movie list header and print its metadata")]
    Inspect {
        #[arg(help = "Movie list file, or - for stdin", value_hint = ValueHint::FilePath)]
        input: PathBuf,
    },
    #[command(about = "Print version info")]
    Version,
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(help = "Shell to generate completions for")]
        shell: Shell,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn input_label(input: &Path) -> String {
    if input == Path::new("-") {
        "stdin".to_string()
    } else {
        input.display().to_string()
    }
}

fn read_feed(input: &Path) -> Result<Vec<u8>, Error> {
    if input == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read stdin")
                .with_source(err)
        })?;
        return Ok(buf);
    }
    std::fs::read(input).map_err(|err| {
        let kind = if err.kind() == io::ErrorKind::NotFound {
            ErrorKind::NotFound
        } else {
            ErrorKind::Io
        };
        Error::new(kind)
            .with_message("failed to read movie list")
            .with_path(input)
            .with_source(err)
    })
}

fn load_known(path: Option<&Path>) -> Result<IdTable, Error> {
    match path {
        Some(path) => read_known_names(path),
        None => Ok(IdTable::new()),
    }
}

fn emit_json(value: Value) {
    let pretty = io::stdout().is_terminal();
    let json = if pretty {
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

fn notice_time_now() -> String {
    use time::format_description::well_known::Rfc3339;
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| time::OffsetDateTime::from_unix_timestamp_nanos(d.as_nanos() as i128).ok())
        .and_then(|ts| ts.format(&Rfc3339).ok())
        .unwrap_or_default()
}

fn emit_notice(notice: &Notice) {
    if io::stderr().is_terminal() {
        eprintln!("notice: {} ({})", notice.message, notice.feed);
        return;
    }

    let value = notice_json(notice);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"notice\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
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
        ErrorKind::NotFound => "not found".to_string(),
        ErrorKind::Format => "malformed movie list".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
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
    if let Some(path) = err.path() {
        inner.insert("path".to_string(), json!(path.display().to_string()));
    }
    if let Some(offset) = err.offset() {
        inner.insert("offset".to_string(), json!(offset));
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
    if let Some(path) = err.path() {
        lines.push(format!("path: {}", path.display()));
    }
    if let Some(offset) = err.offset() {
        lines.push(format!("offset: {offset}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, error_json, error_text};
    use clap::Parser;
    use filmliste::api::{Error, ErrorKind};

    #[test]
    fn import_flags_parse() {
        let cli = Cli::try_parse_from([
            "filmliste",
            "import",
            "filme.json",
            "--out",
            "rows",
            "--strict-version",
            "--max-issues",
            "5",
        ])
        .expect("parse");
        match cli.command {
            Command::Import {
                input,
                out,
                strict_version,
                max_issues,
                known_channels,
                ..
            } => {
                assert_eq!(input.to_str(), Some("filme.json"));
                assert_eq!(out.as_deref().and_then(|p| p.to_str()), Some("rows"));
                assert!(strict_version);
                assert_eq!(max_issues, 5);
                assert!(known_channels.is_none());
            }
            _ => panic!("expected import"),
        }
    }

    #[test]
    fn error_json_carries_kind_offset_and_hint() {
        let err = Error::format("entry array is not closed by `]`")
            .with_offset(12)
            .with_hint("check the input");
        let value = error_json(&err);
        assert_eq!(value["error"]["kind"], "Format");
        assert_eq!(value["error"]["offset"], 12);
        assert_eq!(value["error"]["hint"], "check the input");

        let text = error_text(&Error::new(ErrorKind::Io));
        assert_eq!(text, "error: i/o error");
    }
}
