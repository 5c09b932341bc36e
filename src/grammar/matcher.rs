//! Matchers: grammar rules as plain data.
//!
//! A [`Matcher`] never holds state about a particular parse; the engine walks
//! it. Rules refer to each other by name through [`RuleRef`], whose slot is
//! filled in by [`GrammarBuilder::build`](crate::grammar::GrammarBuilder::build)
//! after every rule has been declared, so grammars may be cyclic.

use std::fmt;
use std::ops::RangeInclusive;

use once_cell::sync::OnceCell;

use crate::grammar::capture::{Field, NodeKind};

/// A named set of characters.
#[derive(Clone, PartialEq, Eq)]
pub struct CharClass {
    name: &'static str,
    ranges: Vec<RangeInclusive<char>>,
}

impl CharClass {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ranges: Vec::new(),
        }
    }

    pub fn range(mut self, low: char, high: char) -> Self {
        self.ranges.push(low..=high);
        self
    }

    /// Adds each character of `chars` as a member.
    pub fn chars(mut self, chars: &str) -> Self {
        self.ranges.extend(chars.chars().map(|c| c..=c));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn contains(&self, ch: char) -> bool {
        self.ranges.iter().any(|r| r.contains(&ch))
    }
}

impl fmt::Debug for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.name)
    }
}

/// Zero-width assertion polarity.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// A reference to a rule by name, resolved after the grammar is declared.
#[derive(Debug, Clone)]
pub struct RuleRef {
    pub(crate) name: &'static str,
    pub(crate) slot: OnceCell<usize>,
}

impl RuleRef {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Index of the referenced rule, once the grammar has been built.
    pub fn index(&self) -> Option<usize> {
        self.slot.get().copied()
    }
}

#[derive(Debug, Clone)]
pub enum Matcher {
    /// Exact text.
    Literal(&'static str),
    /// One character from a class.
    Class(CharClass),
    /// Any single character.
    Any,
    /// Succeeds only at the end of input.
    EndOfInput,
    Sequence(Vec<Matcher>),
    /// Ordered choice; the first alternative that succeeds wins.
    Choice(Vec<Matcher>),
    Repeat {
        inner: Box<Matcher>,
        min: usize,
        max: Option<usize>,
    },
    Optional(Box<Matcher>),
    Lookahead {
        inner: Box<Matcher>,
        polarity: Polarity,
    },
    /// Builds one parse node from the matched text and the inner captures.
    Node {
        kind: NodeKind,
        inner: Box<Matcher>,
    },
    /// Names the single value produced inside (or the matched text).
    Field {
        field: Field,
        inner: Box<Matcher>,
    },
    /// Binds the matched text to a name for later [`Matcher::BackRef`]s.
    Bind {
        name: &'static str,
        inner: Box<Matcher>,
    },
    /// Matches exactly the text most recently bound to the name.
    BackRef(&'static str),
    Rule(RuleRef),
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

pub fn lit(text: &'static str) -> Matcher {
    Matcher::Literal(text)
}

pub fn class(class: CharClass) -> Matcher {
    Matcher::Class(class)
}

/// One character out of `chars`.
pub fn one_of(name: &'static str, chars: &str) -> Matcher {
    Matcher::Class(CharClass::new(name).chars(chars))
}

pub fn any() -> Matcher {
    Matcher::Any
}

pub fn end_of_input() -> Matcher {
    Matcher::EndOfInput
}

pub fn rule(name: &'static str) -> Matcher {
    Matcher::Rule(RuleRef {
        name,
        slot: OnceCell::new(),
    })
}

pub fn backref(name: &'static str) -> Matcher {
    Matcher::BackRef(name)
}

pub fn seq(items: impl IntoIterator<Item = Matcher>) -> Matcher {
    Matcher::Sequence(items.into_iter().collect())
}

pub fn choice(alternatives: impl IntoIterator<Item = Matcher>) -> Matcher {
    Matcher::Choice(alternatives.into_iter().collect())
}

impl Matcher {
    /// `self` followed by `next`. Chained calls build one flat sequence.
    pub fn then(self, next: Matcher) -> Matcher {
        match self {
            Matcher::Sequence(mut items) => {
                items.push(next);
                Matcher::Sequence(items)
            }
            first => Matcher::Sequence(vec![first, next]),
        }
    }

    /// `self`, or else `alternative` at the same position.
    pub fn or(self, alternative: Matcher) -> Matcher {
        match self {
            Matcher::Choice(mut alternatives) => {
                alternatives.push(alternative);
                Matcher::Choice(alternatives)
            }
            first => Matcher::Choice(vec![first, alternative]),
        }
    }

    pub fn repeat(self, min: usize, max: Option<usize>) -> Matcher {
        Matcher::Repeat {
            inner: Box::new(self),
            min,
            max,
        }
    }

    /// Zero or more.
    pub fn many(self) -> Matcher {
        self.repeat(0, None)
    }

    /// One or more.
    pub fn many1(self) -> Matcher {
        self.repeat(1, None)
    }

    pub fn maybe(self) -> Matcher {
        Matcher::Optional(Box::new(self))
    }

    /// Positive lookahead.
    pub fn present(self) -> Matcher {
        Matcher::Lookahead {
            inner: Box::new(self),
            polarity: Polarity::Positive,
        }
    }

    /// Negative lookahead.
    pub fn absent(self) -> Matcher {
        Matcher::Lookahead {
            inner: Box::new(self),
            polarity: Polarity::Negative,
        }
    }

    pub fn node(self, kind: NodeKind) -> Matcher {
        Matcher::Node {
            kind,
            inner: Box::new(self),
        }
    }

    pub fn field(self, field: Field) -> Matcher {
        Matcher::Field {
            field,
            inner: Box::new(self),
        }
    }

    pub fn bind(self, name: &'static str) -> Matcher {
        Matcher::Bind {
            name,
            inner: Box::new(self),
        }
    }

    /// Every rule reference reachable without crossing into another rule.
    pub(crate) fn references(&self) -> Vec<&RuleRef> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a RuleRef>) {
        match self {
            Matcher::Rule(r) => found.push(r),
            Matcher::Sequence(items) | Matcher::Choice(items) => {
                for item in items {
                    item.collect_references(found);
                }
            }
            Matcher::Repeat { inner, .. }
            | Matcher::Optional(inner)
            | Matcher::Lookahead { inner, .. }
            | Matcher::Node { inner, .. }
            | Matcher::Field { inner, .. }
            | Matcher::Bind { inner, .. } => inner.collect_references(found),
            Matcher::Literal(_)
            | Matcher::Class(_)
            | Matcher::Any
            | Matcher::EndOfInput
            | Matcher::BackRef(_) => {}
        }
    }
}
