//! Parser configuration.
//!
//! Options are plain data with serde defaults so they can come from a YAML
//! file, from command-line flags, or be built in code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorKind, RipError};

/// Knobs for a single parse invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Maximum number of nested rule applications before the parse is aborted.
    /// The default fits a thread with a 2 MiB stack; raising it needs a
    /// thread with a larger one.
    pub max_depth: usize,
    /// Maximum number of expectations listed in a parse failure.
    pub max_expected: usize,
}

/// Rule nesting allowed by default. Nested lists cost three levels each.
pub const DEFAULT_MAX_DEPTH: usize = 96;

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_expected: 16,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_expected(mut self, max_expected: usize) -> Self {
        self.max_expected = max_expected;
        self
    }

    /// Decode options from YAML text. Missing keys keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, RipError> {
        serde_yaml::from_str(text).map_err(|e| {
            RipError::unsourced(ErrorKind::Config {
                message: e.to_string(),
            })
        })
    }

    /// Load options from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RipError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RipError::unsourced(ErrorKind::Config {
                message: format!("{}: {}", path.display(), e),
            })
        })?;
        Self::from_yaml_str(&text)
    }
}
