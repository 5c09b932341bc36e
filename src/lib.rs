//! Rip: a backtracking PEG grammar engine and the literal grammar of the Rip
//! language.
//!
//! The [`grammar`] module holds the generic engine: rules are plain data
//! ([`Matcher`]) collected by a [`GrammarBuilder`] and run with ordered
//! choice, greedy repetition, lookahead and full backtracking. The [`syntax`]
//! module defines the Rip grammar on top of it and the [`Node`] tree it
//! produces.

pub use crate::config::ParseOptions;
pub use crate::errors::{print_error, ErrorKind, ErrorReporting, RipError, SourceContext};
pub use crate::grammar::{Grammar, GrammarBuilder, Matcher, NodeKind, Parsed};
pub use crate::syntax::parser::{
    accepts, parse, parse_file, parse_file_with, parse_rule, parse_rule_with, parse_source,
};
pub use crate::syntax::{KeyValue, Node, Numeral, Range, Sign, Span};

pub mod cli;
pub mod config;
pub mod errors;
pub mod grammar;
pub mod syntax;
