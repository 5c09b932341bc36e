//! The backtracking interpreter.
//!
//! Positions are passed by value and every application returns either a
//! [`Match`] (new position plus captures) or `None`. A failed branch never
//! leaves anything behind, so ordered choice can retry the next alternative
//! at the original position. The only state that outlives a failure is the
//! furthest-failure bookkeeping used for the final diagnostic.

use std::collections::BTreeSet;

use crate::grammar::capture::{field_value, Capture, Field, NodeKind};
use crate::grammar::matcher::{Matcher, Polarity, RuleRef};
use crate::grammar::Grammar;

/// A successful application.
#[derive(Debug, Default)]
pub(crate) struct Match {
    pub end: usize,
    pub captures: Vec<Capture>,
}

impl Match {
    fn empty(end: usize) -> Self {
        Self {
            end,
            captures: Vec::new(),
        }
    }
}

/// Conditions that stop the whole parse instead of backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Halt {
    DepthExceeded { position: usize },
}

type Step = Result<Option<Match>, Halt>;

/// Text bound by [`Matcher::Bind`], visible to the matchers after it.
struct Scope<'s> {
    name: &'static str,
    text: &'s str,
    parent: Option<&'s Scope<'s>>,
}

impl<'s> Scope<'s> {
    fn lookup(scope: Option<&'s Scope<'s>>, name: &str) -> Option<&'s str> {
        let mut current = scope;
        while let Some(s) = current {
            if s.name == name {
                return Some(s.text);
            }
            current = s.parent;
        }
        None
    }
}

pub(crate) struct Engine<'g, 'i> {
    grammar: &'g Grammar,
    input: &'i str,
    max_depth: usize,
    depth: usize,
    /// Nesting of lookaheads; failures inside them are not expectations.
    silenced: usize,
    furthest: usize,
    expected: BTreeSet<String>,
}

impl<'g, 'i> Engine<'g, 'i> {
    pub fn new(grammar: &'g Grammar, input: &'i str, max_depth: usize) -> Self {
        Self {
            grammar,
            input,
            max_depth,
            depth: 0,
            silenced: 0,
            furthest: 0,
            expected: BTreeSet::new(),
        }
    }

    /// Furthest offset at which a primitive failed.
    pub fn furthest(&self) -> usize {
        self.furthest
    }

    pub fn into_expected(self) -> Vec<String> {
        self.expected.into_iter().collect()
    }

    /// Applies rule `index` at `pos`.
    pub fn apply_rule(&mut self, index: usize, pos: usize) -> Step {
        self.enter_rule(index, pos, None)
    }

    fn apply(&mut self, matcher: &Matcher, pos: usize, scope: Option<&Scope<'_>>) -> Step {
        let input = self.input;
        match matcher {
            Matcher::Literal(text) => {
                if input[pos..].starts_with(text) {
                    Ok(Some(Match::empty(pos + text.len())))
                } else {
                    self.fail(pos, || format!("{:?}", text))
                }
            }
            Matcher::Class(class) => match input[pos..].chars().next() {
                Some(ch) if class.contains(ch) => Ok(Some(Match::empty(pos + ch.len_utf8()))),
                _ => self.fail(pos, || class.name().to_string()),
            },
            Matcher::Any => match input[pos..].chars().next() {
                Some(ch) => Ok(Some(Match::empty(pos + ch.len_utf8()))),
                None => self.fail(pos, || "any character".into()),
            },
            Matcher::EndOfInput => {
                if pos == input.len() {
                    Ok(Some(Match::empty(pos)))
                } else {
                    self.fail(pos, || "end of input".into())
                }
            }
            Matcher::Sequence(items) => self.sequence(items, pos, scope, Vec::new()),
            Matcher::Choice(alternatives) => {
                for alternative in alternatives {
                    if let Some(m) = self.apply(alternative, pos, scope)? {
                        return Ok(Some(m));
                    }
                }
                Ok(None)
            }
            Matcher::Repeat { inner, min, max } => self.repeat(inner, *min, *max, pos, scope),
            Matcher::Optional(inner) => self.repeat(inner, 0, Some(1), pos, scope),
            Matcher::Lookahead { inner, polarity } => {
                self.silenced += 1;
                let probe = self.apply(inner, pos, scope);
                self.silenced -= 1;
                let matched = probe?.is_some();
                if matched == (*polarity == Polarity::Positive) {
                    Ok(Some(Match::empty(pos)))
                } else {
                    Ok(None)
                }
            }
            Matcher::Node { kind, inner } => self.node(*kind, inner, pos, scope),
            Matcher::Field { field, inner } => self.field(*field, inner, pos, scope),
            // Outside a sequence nothing follows the binding, so it only matches.
            Matcher::Bind { inner, .. } => self.apply(inner, pos, scope),
            Matcher::BackRef(name) => match Scope::lookup(scope, name) {
                Some(text) if input[pos..].starts_with(text) => {
                    Ok(Some(Match::empty(pos + text.len())))
                }
                Some(text) => self.fail(pos, || format!("{:?}", text)),
                None => {
                    tracing::warn!(name, pos, "back-reference to unbound name");
                    Ok(None)
                }
            },
            Matcher::Rule(reference) => match self.resolve(reference) {
                Some(index) => self.enter_rule(index, pos, scope),
                None => {
                    tracing::warn!(rule = reference.name(), "reference was never resolved");
                    Ok(None)
                }
            },
        }
    }

    fn resolve(&self, reference: &RuleRef) -> Option<usize> {
        reference
            .index()
            .or_else(|| self.grammar.rule_index(reference.name()))
    }

    fn enter_rule(&mut self, index: usize, pos: usize, scope: Option<&Scope<'_>>) -> Step {
        if self.depth >= self.max_depth {
            return Err(Halt::DepthExceeded { position: pos });
        }
        let grammar = self.grammar;
        let Some(definition) = grammar.definition(index) else {
            return Ok(None);
        };
        tracing::trace!(rule = definition.name, pos, depth = self.depth, "enter");
        self.depth += 1;
        let step = self.apply(&definition.body, pos, scope);
        self.depth -= 1;
        step
    }

    /// Applies `items` in order. Recurses only where a binding opens a new
    /// scope for the items after it.
    fn sequence(
        &mut self,
        items: &[Matcher],
        pos: usize,
        scope: Option<&Scope<'_>>,
        mut captures: Vec<Capture>,
    ) -> Step {
        let mut end = pos;
        for (i, item) in items.iter().enumerate() {
            let Some(step) = self.apply(item, end, scope)? else {
                return Ok(None);
            };
            captures.extend(step.captures);
            if let Matcher::Bind { name, .. } = item {
                let input = self.input;
                let bound = Scope {
                    name: *name,
                    text: &input[end..step.end],
                    parent: scope,
                };
                return self.sequence(&items[i + 1..], step.end, Some(&bound), captures);
            }
            end = step.end;
        }
        Ok(Some(Match { end, captures }))
    }

    fn node(
        &mut self,
        kind: NodeKind,
        inner: &Matcher,
        pos: usize,
        scope: Option<&Scope<'_>>,
    ) -> Step {
        let Some(m) = self.apply(inner, pos, scope)? else {
            return Ok(None);
        };
        match kind.build(&self.input[pos..m.end], m.captures) {
            Some(node) => Ok(Some(Match {
                end: m.end,
                captures: vec![Capture::Node(node)],
            })),
            None => {
                tracing::warn!(?kind, pos, "captures do not fit node kind");
                Ok(None)
            }
        }
    }

    fn field(
        &mut self,
        field: Field,
        inner: &Matcher,
        pos: usize,
        scope: Option<&Scope<'_>>,
    ) -> Step {
        let Some(m) = self.apply(inner, pos, scope)? else {
            return Ok(None);
        };
        match field_value(&self.input[pos..m.end], m.captures) {
            Some(value) => Ok(Some(Match {
                end: m.end,
                captures: vec![Capture::Field(field, value)],
            })),
            None => {
                tracing::warn!(%field, pos, "field wraps more than one value");
                Ok(None)
            }
        }
    }

    fn repeat(
        &mut self,
        inner: &Matcher,
        min: usize,
        max: Option<usize>,
        pos: usize,
        scope: Option<&Scope<'_>>,
    ) -> Step {
        let mut end = pos;
        let mut count = 0;
        let mut captures = Vec::new();
        while max.map_or(true, |max| count < max) {
            let Some(step) = self.apply(inner, end, scope)? else {
                break;
            };
            let progressed = step.end > end;
            end = step.end;
            count += 1;
            captures.extend(step.captures);
            if !progressed {
                // An empty match can repeat forever; it satisfies any minimum.
                count = count.max(min);
                break;
            }
        }
        if count >= min {
            Ok(Some(Match { end, captures }))
        } else {
            Ok(None)
        }
    }

    fn fail(&mut self, pos: usize, label: impl FnOnce() -> String) -> Step {
        if self.silenced == 0 {
            if pos > self.furthest {
                self.furthest = pos;
                self.expected.clear();
            }
            if pos == self.furthest {
                self.expected.insert(label());
            }
        }
        Ok(None)
    }
}
