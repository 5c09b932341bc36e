//! Command-line arguments and subcommands for the `rip` binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "rip",
    version,
    about = "Parse Rip source and inspect its grammar."
)]
pub struct RipArgs {
    /// Maximum rule nesting before a parse is aborted.
    #[arg(long, global = true, value_name = "N")]
    pub max_depth: Option<usize>,

    /// YAML file with parse options.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log parser activity to stderr (same as RIP_LOG=debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a file and print its tree.
    Parse {
        #[arg(required = true)]
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Parse a file, or every `.rip` file below a directory, and report status.
    Check {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Run one grammar rule against a fragment of text.
    Rule {
        name: String,
        text: String,
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// List the rules of the Rip grammar.
    Rules,
}

/// How parse trees are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// S-expression rendering.
    Pretty,
    Json,
    Yaml,
}
