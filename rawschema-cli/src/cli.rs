use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use rawschema::{DEFAULT_MAX_DEPTH, Parser as SchemaParser, Settings};

use crate::discover::{compile_excludes, find_documents};
use crate::logging::{LogFormat, LogLevel, init_logging};
use crate::output::{
    CheckReport, OutputFormat, collect_consts, write_check_text, write_consts_text, write_json,
};

#[derive(Parser, Debug)]
#[command(
    name = "rawschema",
    version,
    about = "Check JSON Schema documents and inspect their const values"
)]
pub struct Cli {
    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Minimum log level (stderr). `RUST_LOG` takes precedence.
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse every schema document under the given paths
    Check(CheckArgs),
    /// List the const and enum values of one document
    Consts(ConstsArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(value_name = "PATH", default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Glob of paths to leave out; may be repeated
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Report format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,

    /// Maximum schema nesting depth
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[derive(Args, Debug)]
pub struct ConstsArgs {
    /// Schema document to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Report format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub format: OutputFormat,
}

/// Parses arguments, sets up logging and runs the selected command.
///
/// # Errors
///
/// Returns an error if the command fails or, for `check`, if any document
/// failed to parse.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level)?;

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Check(args) => check(&args, &mut stdout),
        Command::Consts(args) => consts(&args, &mut stdout),
    }
}

fn check(args: &CheckArgs, out: &mut dyn Write) -> Result<()> {
    let exclude = compile_excludes(&args.exclude)?;
    let (files, walk_failures) = find_documents(&args.paths, &exclude);
    let parser = SchemaParser::new(Settings::default().with_max_depth(args.max_depth));

    let mut report = CheckReport::default();
    for failure in walk_failures {
        tracing::warn!(path = %failure.path.display(), "{}", failure.message);
        report.record_failure(failure.path.display().to_string(), failure.message);
    }
    for path in &files {
        report.checked += 1;
        match parser.parse_file(path) {
            Ok(_) => tracing::debug!(path = %path.display(), "document ok"),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "document failed");
                report.record_failure(path.display().to_string(), err.to_string());
            }
        }
    }
    report.ok = report.failed == 0;
    tracing::info!(checked = report.checked, failed = report.failed, "check finished");

    match args.format {
        OutputFormat::Text => write_check_text(&report, out)?,
        OutputFormat::Json => write_json(&report, out)?,
    }

    if !report.ok {
        bail!("{} document(s) failed", report.failed);
    }
    Ok(())
}

fn consts(args: &ConstsArgs, out: &mut dyn Write) -> Result<()> {
    let schema = SchemaParser::default().parse_file(&args.file)?;
    let entries = collect_consts(&schema);
    tracing::debug!(entries = entries.len(), "collected const and enum keywords");

    match args.format {
        OutputFormat::Text => write_consts_text(&entries, out),
        OutputFormat::Json => write_json(&entries, out),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_defaults() {
        let cli = Cli::try_parse_from(["rawschema", "check"]).expect("check should parse");
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.paths, vec![PathBuf::from(".")]);
        assert!(args.exclude.is_empty());
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn parses_repeated_excludes_and_global_flags() {
        let cli = Cli::try_parse_from([
            "rawschema",
            "check",
            "schemas",
            "api",
            "--exclude",
            "draft.*",
            "--exclude",
            "*/legacy/*",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .expect("check args should parse");

        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_format, LogFormat::Json);
        let Command::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.paths.len(), 2);
        assert_eq!(args.exclude, ["draft.*", "*/legacy/*"]);
    }

    #[test]
    fn consts_requires_a_file() {
        let err = Cli::try_parse_from(["rawschema", "consts"]).expect_err("missing file");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = Cli::try_parse_from(["rawschema", "consts", "a.json", "--format", "xml"])
            .expect_err("unknown format");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
