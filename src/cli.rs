//! The Rip Command-Line Interface.
//!
//! Thin front end over the library: every subcommand reads its input, calls
//! one public entry point and prints the result or a miette report.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, Format, RipArgs};
use crate::cli::output::{print_rules, print_status, print_summary, render, Status};
use crate::config::ParseOptions;
use crate::errors::{print_error, ErrorKind, RipError};
use crate::syntax::grammar::grammar;
use crate::syntax::parser::{parse_file_with, parse_rule_with};

pub mod args;
pub mod output;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "RIP_LOG";

const SOURCE_EXTENSION: &str = "rip";

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() {
    let args = RipArgs::parse();
    init_logging(args.verbose);

    let options = load_options(&args).unwrap_or_else(|e| exit_with(e));
    let succeeded = match args.command {
        Command::Parse { file, format } => {
            parse_command(&file, format, &options).unwrap_or_else(|e| exit_with(e));
            true
        }
        Command::Check { path } => check_command(&path, &options),
        Command::Rule { name, text, format } => {
            rule_command(&name, &text, format, &options).unwrap_or_else(|e| exit_with(e));
            true
        }
        Command::Rules => {
            let grammar = grammar();
            print_rules(grammar.rule_names(), grammar.root_name());
            true
        }
    };

    if !succeeded {
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Options from `--config`, then `--max-depth` on top.
fn load_options(args: &RipArgs) -> Result<ParseOptions, RipError> {
    let options = match &args.config {
        Some(path) => ParseOptions::from_yaml_file(path)?,
        None => ParseOptions::default(),
    };
    Ok(match args.max_depth {
        Some(depth) => options.with_max_depth(depth),
        None => options,
    })
}

fn exit_with(error: RipError) -> ! {
    print_error(error);
    process::exit(1);
}

// ============================================================================
// SUBCOMMANDS
// ============================================================================

fn parse_command(file: &Path, format: Format, options: &ParseOptions) -> Result<(), RipError> {
    let program = parse_file_with(file, options)?;
    println!("{}", render(&program, format)?);
    Ok(())
}

/// Returns whether every file parsed.
fn check_command(path: &Path, options: &ParseOptions) -> bool {
    let files = match collect_sources(path) {
        Ok(files) => files,
        Err(e) => {
            print_error(e);
            return false;
        }
    };

    let mut failed = 0;
    for file in &files {
        match parse_file_with(file, options) {
            Ok(_) => print_status(file, Status::Ok),
            Err(e) => {
                failed += 1;
                print_status(file, Status::Failed);
                print_error(e);
            }
        }
    }
    print_summary(files.len(), failed);
    failed == 0
}

fn rule_command(
    name: &str,
    text: &str,
    format: Format,
    options: &ParseOptions,
) -> Result<(), RipError> {
    let parsed = parse_rule_with(name, text, options)?;
    let mut printed = false;
    for node in parsed.nodes() {
        println!("{}", render(node, format)?);
        printed = true;
    }
    if !printed {
        println!("matched {} bytes, no tree", parsed.span.end);
    }
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

/// A single file as given, or every `.rip` file below a directory, sorted.
fn collect_sources(path: &Path) -> Result<Vec<PathBuf>, RipError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            RipError::unsourced(ErrorKind::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        let is_source = entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == SOURCE_EXTENSION);
        if is_source {
            files.push(entry.into_path());
        }
    }
    tracing::debug!(root = %path.display(), files = files.len(), "collected sources");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = collect_sources(Path::new("no/such/dir")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Io { .. }));
    }
}
