//! Rip Error Handling - Unified Encapsulated API
//!
//! Every failure a caller can observe is a [`RipError`]. Local match failures
//! inside the grammar engine never reach this module; they are plain `None`
//! results that the enclosing choice recovers from.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Named source text that diagnostics point into.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from file content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a source context for text that did not come from a file
    pub fn inline(content: impl Into<String>) -> Self {
        Self::from_file("<input>", content)
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// 1-based line and column of a byte offset. Columns count characters.
    pub fn line_column(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let consumed = &self.content[..offset];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = consumed[line_start..].chars().count() + 1;
        (line, column)
    }

    /// Human description of what sits at `offset`.
    pub fn found_at(&self, offset: usize) -> String {
        match self.content.get(offset..).and_then(|rest| rest.chars().next()) {
            Some(ch) => format!("{:?}", ch),
            None => "end of input".into(),
        }
    }
}

// ============================================================================
// ERROR KINDS
// ============================================================================

/// All error types as a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("Parse error: expected {}, found {found} at line {line}, column {column}", describe_expected(.expected))]
    ParseFailure {
        line: usize,
        column: usize,
        found: String,
        expected: Vec<String>,
    },

    #[error("Parse error: rule nesting exceeded the limit of {limit}")]
    RecursionLimit { limit: usize },

    #[error("Grammar error: no rule named '{name}'")]
    UnknownRule { name: String },

    #[error("Grammar error: rule '{name}' is declared more than once")]
    DuplicateRule { name: String },

    #[error("Grammar error: rule '{rule}' refers to undeclared rule '{reference}'")]
    UnresolvedReference { rule: String, reference: String },

    #[error("I/O error: {path}: {message}")]
    Io { path: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => "nothing".into(),
        [only] => only.clone(),
        many => format!("one of {}", many.join(", ")),
    }
}

impl ErrorKind {
    /// Pipeline phase the error belongs to; used in diagnostic codes.
    pub const fn phase(&self) -> &'static str {
        match self {
            Self::ParseFailure { .. } | Self::RecursionLimit { .. } => "parse",
            Self::UnknownRule { .. }
            | Self::DuplicateRule { .. }
            | Self::UnresolvedReference { .. } => "grammar",
            Self::Io { .. } => "io",
            Self::Config { .. } => "config",
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::ParseFailure { .. } => "parse_failure",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::UnknownRule { .. } => "unknown_rule",
            Self::DuplicateRule { .. } => "duplicate_rule",
            Self::UnresolvedReference { .. } => "unresolved_reference",
            Self::Io { .. } => "io",
            Self::Config { .. } => "config",
        }
    }

    fn primary_label(&self) -> &'static str {
        match self {
            Self::ParseFailure { .. } => "parsing stopped here",
            Self::RecursionLimit { .. } => "nested too deeply",
            Self::UnknownRule { .. } => "unknown rule",
            Self::DuplicateRule { .. } => "duplicate rule",
            Self::UnresolvedReference { .. } => "unresolved reference",
            Self::Io { .. } => "unreadable",
            Self::Config { .. } => "invalid configuration",
        }
    }

    fn default_help(&self) -> Option<String> {
        match self {
            Self::RecursionLimit { .. } => {
                Some("raise the limit with --max-depth or flatten the nesting".into())
            }
            Self::UnknownRule { .. } => Some("run `rip rules` to list the grammar's rules".into()),
            _ => None,
        }
    }
}

// ============================================================================
// THE ERROR TYPE
// ============================================================================

/// Where the error happened
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// The single error type
#[derive(Debug)]
pub struct RipError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

impl RipError {
    /// Creates an error that is not tied to any source text, such as grammar
    /// construction or I/O failures.
    pub fn unsourced(kind: ErrorKind) -> Self {
        SourceContext::from_file("<none>", "").report(kind, unspanned())
    }

    /// Byte offset of the primary span.
    pub fn offset(&self) -> usize {
        self.source_info.primary_span.offset()
    }
}

impl std::error::Error for RipError {}

impl fmt::Display for RipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for RipError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.primary_label().to_string()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

// ============================================================================
// ERROR CONSTRUCTION
// ============================================================================

/// Context-aware error creation
pub trait ErrorReporting {
    /// Create an error with context-appropriate enhancements
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> RipError;

    /// The top-level parse failure: furthest offset reached plus what would
    /// have been accepted there.
    fn parse_failure(&self, offset: usize, expected: Vec<String>) -> RipError;
}

impl ErrorReporting for SourceContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> RipError {
        let error_code = format!("rip::{}::{}", kind.phase(), kind.code_suffix());
        let help = kind.default_help();

        RipError {
            kind,
            source_info: SourceInfo {
                source: self.to_named_source(),
                primary_span: span,
            },
            diagnostic_info: DiagnosticInfo { help, error_code },
        }
    }

    fn parse_failure(&self, offset: usize, expected: Vec<String>) -> RipError {
        let (line, column) = self.line_column(offset);
        let width = self
            .content
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        self.report(
            ErrorKind::ParseFailure {
                line,
                column,
                found: self.found_at(offset),
                expected,
            },
            SourceSpan::from(offset..offset + width),
        )
    }
}

/// Creates a placeholder span for errors not tied to a specific source code
/// location, such as I/O errors or grammar construction failures.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a RipError with full miette diagnostics
pub fn print_error(error: RipError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
