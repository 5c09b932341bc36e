//! Rip Parser - public entry points
//!
//! Converts Rip source text into a [`Node::Program`] tree, or runs a single
//! named grammar rule against a fragment. Parsing is purely syntactic: no
//! numeric evaluation, no key checks, no type checks.

use std::path::Path;

use crate::config::ParseOptions;
use crate::errors::{ErrorKind, ErrorReporting, RipError, SourceContext};
use crate::grammar::Parsed;
use crate::syntax::grammar::grammar;
use crate::syntax::Node;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse Rip source text with default options.
pub fn parse(source_text: &str) -> Result<Node, RipError> {
    parse_source(&SourceContext::inline(source_text), &ParseOptions::default())
}

/// Parse a named source. The whole text must be consumed.
pub fn parse_source(source: &SourceContext, options: &ParseOptions) -> Result<Node, RipError> {
    tracing::debug!(source = %source.name, len = source.content.len(), "parsing");
    let parsed = grammar().parse_source(source, options)?;
    match parsed.into_node() {
        Some(program @ Node::Program(_)) => {
            tracing::debug!(statements = program.children().len(), "parsed program");
            Ok(program)
        }
        // The root rule always wraps its statements in a program node.
        _ => Err(source.parse_failure(0, vec!["program".into()])),
    }
}

/// Read a file and parse its contents; the path names the diagnostic source.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Node, RipError> {
    parse_file_with(path, &ParseOptions::default())
}

pub fn parse_file_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Node, RipError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        RipError::unsourced(ErrorKind::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    })?;
    parse_source(
        &SourceContext::from_file(path.display().to_string(), content),
        options,
    )
}

/// Run one named rule of the Rip grammar over all of `text`.
pub fn parse_rule(rule: &str, text: &str) -> Result<Parsed, RipError> {
    parse_rule_with(rule, text, &ParseOptions::default())
}

pub fn parse_rule_with(rule: &str, text: &str, options: &ParseOptions) -> Result<Parsed, RipError> {
    tracing::debug!(rule, len = text.len(), "parsing fragment");
    grammar().parse_rule(rule, text, options)
}

/// Whether `rule` accepts all of `text`.
pub fn accepts(rule: &str, text: &str) -> bool {
    parse_rule(rule, text).is_ok()
}
