//! Grammar module: rule tables built from [`Matcher`] values and run by the
//! backtracking [`engine`].
//!
//! ```ignore
//! let grammar = GrammarBuilder::new()
//!     .rule("list", lit("[").then(rule("item").many()).then(lit("]")).node(NodeKind::List))
//!     .rule("item", rule("list").or(lit("nil").node(NodeKind::Nil)))
//!     .build("list")?;
//! let parsed = grammar.parse("[nil[]]", &ParseOptions::default())?;
//! ```

use std::collections::HashMap;

use crate::config::ParseOptions;
use crate::errors::{ErrorKind, ErrorReporting, RipError, SourceContext};
use crate::syntax::{Node, Span};

pub mod capture;
pub mod engine;
pub mod matcher;

pub use capture::{Capture, Field, FieldValue, NodeKind};
pub use matcher::{
    any, backref, choice, class, end_of_input, lit, one_of, rule, seq, CharClass, Matcher,
    Polarity, RuleRef,
};

use engine::{Engine, Halt};

// ============================================================================
// GRAMMAR DATA
// ============================================================================

/// A named rule.
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub name: &'static str,
    pub body: Matcher,
}

/// A resolved set of rules with a designated root.
#[derive(Debug)]
pub struct Grammar {
    rules: Vec<RuleDef>,
    index: HashMap<&'static str, usize>,
    root: usize,
}

/// The result of running a rule over a whole input.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub span: Span,
    pub captures: Vec<Capture>,
}

impl Parsed {
    /// Nodes captured at the top level of the rule, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.captures.iter().filter_map(Capture::as_node)
    }

    /// The captured node, if the rule produced exactly one capture and it is a node.
    pub fn node(&self) -> Option<&Node> {
        match self.captures.as_slice() {
            [Capture::Node(node)] => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        let mut captures = self.captures;
        match (captures.pop(), captures.is_empty()) {
            (Some(Capture::Node(node)), true) => Some(node),
            _ => None,
        }
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

/// Collects rule declarations in any order; [`build`](Self::build) resolves
/// the references between them.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    rules: Vec<RuleDef>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, name: &'static str, body: Matcher) -> Self {
        self.rules.push(RuleDef { name, body });
        self
    }

    /// Resolves every rule reference and selects `root` as the entry rule.
    pub fn build(self, root: &str) -> Result<Grammar, RipError> {
        let mut index = HashMap::with_capacity(self.rules.len());
        for (i, definition) in self.rules.iter().enumerate() {
            if index.insert(definition.name, i).is_some() {
                return Err(RipError::unsourced(ErrorKind::DuplicateRule {
                    name: definition.name.to_string(),
                }));
            }
        }

        for definition in &self.rules {
            for reference in definition.body.references() {
                let resolved = index.get(reference.name()).copied().ok_or_else(|| {
                    RipError::unsourced(ErrorKind::UnresolvedReference {
                        rule: definition.name.to_string(),
                        reference: reference.name().to_string(),
                    })
                })?;
                let slot = reference.slot.get_or_init(|| resolved);
                if *slot != resolved {
                    // The matcher was already resolved against another grammar.
                    return Err(RipError::unsourced(ErrorKind::UnresolvedReference {
                        rule: definition.name.to_string(),
                        reference: reference.name().to_string(),
                    }));
                }
            }
        }

        let root = index.get(root).copied().ok_or_else(|| {
            RipError::unsourced(ErrorKind::UnknownRule {
                name: root.to_string(),
            })
        })?;

        tracing::debug!(rules = self.rules.len(), "grammar built");
        Ok(Grammar {
            rules: self.rules,
            index,
            root,
        })
    }
}

// ============================================================================
// RUNNING
// ============================================================================

impl Grammar {
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.name)
    }

    pub fn root_name(&self) -> &'static str {
        self.rules[self.root].name
    }

    pub fn rule_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn definition(&self, index: usize) -> Option<&RuleDef> {
        self.rules.get(index)
    }

    /// Runs the root rule over all of `text`.
    pub fn parse(&self, text: &str, options: &ParseOptions) -> Result<Parsed, RipError> {
        self.parse_source(&SourceContext::inline(text), options)
    }

    /// Runs the root rule over a named source.
    pub fn parse_source(
        &self,
        source: &SourceContext,
        options: &ParseOptions,
    ) -> Result<Parsed, RipError> {
        self.run(self.root, source, options)
    }

    /// Runs the named rule over all of `text`.
    pub fn parse_rule(
        &self,
        name: &str,
        text: &str,
        options: &ParseOptions,
    ) -> Result<Parsed, RipError> {
        let source = SourceContext::inline(text);
        let index = self.rule_index(name).ok_or_else(|| {
            RipError::unsourced(ErrorKind::UnknownRule {
                name: name.to_string(),
            })
        })?;
        self.run(index, &source, options)
    }

    /// Runs rule `index` over the whole of `source`. Anything short of full
    /// consumption is a parse failure at the furthest offset reached.
    fn run(
        &self,
        index: usize,
        source: &SourceContext,
        options: &ParseOptions,
    ) -> Result<Parsed, RipError> {
        let input = source.content.as_str();
        let mut engine = Engine::new(self, input, options.max_depth);
        let outcome = engine.apply_rule(index, 0);
        let rule = self.rules[index].name;

        let matched = match outcome {
            Ok(matched) => matched,
            Err(Halt::DepthExceeded { position }) => {
                tracing::debug!(rule, position, "rule nesting limit reached");
                let span = miette::SourceSpan::from(position..position);
                return Err(source.report(
                    ErrorKind::RecursionLimit {
                        limit: options.max_depth,
                    },
                    span,
                ));
            }
        };

        match matched {
            Some(m) if m.end == input.len() => {
                tracing::debug!(rule, len = input.len(), "parsed");
                Ok(Parsed {
                    span: Span { start: 0, end: m.end },
                    captures: m.captures,
                })
            }
            partial => {
                let furthest = engine.furthest();
                let end_of_input = || "end of input".to_string();
                let (offset, mut expected) = match partial {
                    Some(m) if m.end > furthest => (m.end, vec![end_of_input()]),
                    Some(m) if m.end == furthest => {
                        let mut expected = vec![end_of_input()];
                        expected.extend(engine.into_expected());
                        (furthest, expected)
                    }
                    _ => (furthest, engine.into_expected()),
                };
                expected.truncate(options.max_expected);
                tracing::debug!(rule, offset, "parse failed");
                Err(source.parse_failure(offset, expected))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_rules_are_rejected() {
        let err = GrammarBuilder::new()
            .rule("a", lit("x"))
            .rule("a", lit("y"))
            .build("a")
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DuplicateRule { .. }));
    }

    #[test]
    fn rules_may_be_declared_before_their_references() {
        let grammar = GrammarBuilder::new()
            .rule("list", lit("[").then(rule("item").many()).then(lit("]")).node(NodeKind::List))
            .rule("item", rule("list").or(lit("nil").node(NodeKind::Nil)))
            .build("list")
            .unwrap();
        let parsed = grammar.parse("[nil[]]", &ParseOptions::default()).unwrap();
        assert_eq!(
            parsed.into_node(),
            Some(Node::List(vec![Node::Nil, Node::List(vec![])]))
        );
    }
}
