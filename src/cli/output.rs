//! Handles all user-facing output for the CLI.
//!
//! Trees are rendered in one of the [`Format`]s; per-file status lines are
//! colored with `termcolor` when stdout is a terminal.

use std::io::Write;
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::Format;
use crate::errors::{ErrorKind, RipError};
use crate::syntax::Node;

// ============================================================================
// TREE RENDERING
// ============================================================================

/// Renders a node in the requested format.
pub fn render(node: &Node, format: Format) -> Result<String, RipError> {
    match format {
        Format::Pretty => Ok(node.pretty()),
        Format::Json => serde_json::to_string_pretty(node).map_err(serialize_error),
        Format::Yaml => serde_yaml::to_string(node)
            .map(|yaml| yaml.trim_end().to_string())
            .map_err(serialize_error),
    }
}

fn serialize_error(error: impl std::fmt::Display) -> RipError {
    RipError::unsourced(ErrorKind::Io {
        path: "<stdout>".into(),
        message: error.to_string(),
    })
}

// ============================================================================
// STATUS LINES
// ============================================================================

/// Outcome of checking one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Failed,
}

/// Prints `ok` or `FAILED` next to a path.
pub fn print_status(path: &Path, status: Status) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let (label, color) = match status {
        Status::Ok => ("ok", Color::Green),
        Status::Failed => ("FAILED", Color::Red),
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{label:>6}");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", path.display());
}

/// Prints the closing `checked N files, M failed` line.
pub fn print_summary(checked: usize, failed: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if failed == 0 { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "checked {checked} files, {failed} failed");
    let _ = stdout.reset();
}

pub fn print_rules<'a>(names: impl IntoIterator<Item = &'a str>, root: &str) {
    for name in names {
        if name == root {
            println!("  {name} (root)");
        } else {
            println!("  {name}");
        }
    }
}
