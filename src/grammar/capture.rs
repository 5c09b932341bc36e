//! Captures produced while matching, and the construction of parse nodes
//! from them.
//!
//! Untagged matchers produce nothing. A [`Matcher::Node`](crate::grammar::Matcher::Node)
//! turns the captures of its inner matcher into exactly one [`Node`]; a
//! [`Matcher::Field`](crate::grammar::Matcher::Field) names one value so the
//! enclosing node can find it.

use std::fmt;

use crate::syntax::{KeyValue, Node, Numeral, Range};

/// Kind of parse node a matcher builds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Comment,
    Nil,
    True,
    False,
    Integer,
    Decimal,
    Character,
    StringLit,
    Regex,
    KeyValue,
    Range,
    Hash,
    List,
}

/// Named slot inside a composite node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Field {
    Key,
    Value,
    Start,
    End,
    Exclusivity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Key => "key",
            Field::Value => "value",
            Field::Start => "start",
            Field::End => "end",
            Field::Exclusivity => "exclusivity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Node(Node),
    Text(String),
}

/// One value produced by a successful match.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Node(Node),
    Field(Field, FieldValue),
}

impl Capture {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Capture::Node(node) => Some(node),
            Capture::Field(..) => None,
        }
    }
}

/// Shapes the value a field matcher produced: the single inner node, or the
/// matched text when the inner matcher captured nothing.
pub(crate) fn field_value(text: &str, mut captures: Vec<Capture>) -> Option<FieldValue> {
    match captures.len() {
        0 => Some(FieldValue::Text(text.to_string())),
        1 => match captures.pop() {
            Some(Capture::Node(node)) => Some(FieldValue::Node(node)),
            _ => None,
        },
        _ => None,
    }
}

impl NodeKind {
    /// Builds the node for a successful match of `text`. Returns `None` when
    /// the captures do not have the shape this kind needs, which means the
    /// grammar wraps the wrong matcher.
    pub fn build(self, text: &str, captures: Vec<Capture>) -> Option<Node> {
        match self {
            NodeKind::Program => Some(Node::Program(only_nodes(captures)?)),
            NodeKind::List => Some(Node::List(only_nodes(captures)?)),
            NodeKind::Hash => only_nodes(captures)?
                .into_iter()
                .map(|node| match node {
                    Node::KeyValue(kv) => Some(kv),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Node::Hash),
            NodeKind::KeyValue => {
                let mut fields = Fields::new(captures)?;
                let key = fields.node(Field::Key)?;
                let value = fields.node(Field::Value)?;
                fields.finish()?;
                Some(Node::KeyValue(KeyValue {
                    key: Box::new(key),
                    value: Box::new(value),
                }))
            }
            NodeKind::Range => {
                let mut fields = Fields::new(captures)?;
                let start = fields.node(Field::Start)?;
                let end = fields.node(Field::End)?;
                let exclusive = fields.text(Field::Exclusivity).is_some();
                fields.finish()?;
                Some(Node::Range(Range {
                    start: Box::new(start),
                    end: Box::new(end),
                    exclusive,
                }))
            }
            leaf => {
                if !captures.is_empty() {
                    return None;
                }
                leaf.build_leaf(text)
            }
        }
    }

    fn build_leaf(self, text: &str) -> Option<Node> {
        let node = match self {
            NodeKind::Comment => Node::Comment(text.to_string()),
            NodeKind::Nil => Node::Nil,
            NodeKind::True => Node::Bool(true),
            NodeKind::False => Node::Bool(false),
            NodeKind::Integer => Node::Integer(Numeral::from(text)),
            NodeKind::Decimal => Node::Decimal(Numeral::from(text)),
            NodeKind::Character => {
                let mut chars = text.chars();
                let ch = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Node::Character(ch)
            }
            NodeKind::StringLit => Node::StringLit(text.to_string()),
            NodeKind::Regex => Node::Regex(text.to_string()),
            NodeKind::Program
            | NodeKind::List
            | NodeKind::Hash
            | NodeKind::KeyValue
            | NodeKind::Range => return None,
        };
        Some(node)
    }
}

fn only_nodes(captures: Vec<Capture>) -> Option<Vec<Node>> {
    captures
        .into_iter()
        .map(|capture| match capture {
            Capture::Node(node) => Some(node),
            Capture::Field(..) => None,
        })
        .collect()
}

/// Field captures of one composite node, taken out one name at a time.
struct Fields {
    entries: Vec<(Field, FieldValue)>,
}

impl Fields {
    fn new(captures: Vec<Capture>) -> Option<Self> {
        let entries = captures
            .into_iter()
            .map(|capture| match capture {
                Capture::Field(field, value) => Some((field, value)),
                Capture::Node(_) => None,
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self { entries })
    }

    fn take(&mut self, field: Field) -> Option<FieldValue> {
        let index = self.entries.iter().position(|(f, _)| *f == field)?;
        Some(self.entries.remove(index).1)
    }

    fn node(&mut self, field: Field) -> Option<Node> {
        match self.take(field)? {
            FieldValue::Node(node) => Some(node),
            FieldValue::Text(_) => None,
        }
    }

    fn text(&mut self, field: Field) -> Option<String> {
        match self.take(field)? {
            FieldValue::Text(text) => Some(text),
            FieldValue::Node(_) => None,
        }
    }

    /// Every field must have been claimed.
    fn finish(self) -> Option<()> {
        self.entries.is_empty().then_some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_value_needs_both_fields() {
        let captures = vec![Capture::Field(
            Field::Key,
            FieldValue::Node(Node::integer("5")),
        )];
        assert_eq!(NodeKind::KeyValue.build("5:", captures), None);
    }

    #[test]
    fn range_reads_exclusivity_marker() {
        let captures = vec![
            Capture::Field(Field::Start, FieldValue::Node(Node::integer("1"))),
            Capture::Field(Field::Exclusivity, FieldValue::Text(".".into())),
            Capture::Field(Field::End, FieldValue::Node(Node::integer("3"))),
        ];
        assert_eq!(
            NodeKind::Range.build("1...3", captures),
            Some(Node::range(Node::integer("1"), Node::integer("3"), true))
        );
    }

    #[test]
    fn hash_rejects_non_pairs() {
        let captures = vec![Capture::Node(Node::Nil)];
        assert_eq!(NodeKind::Hash.build("{nil}", captures), None);
    }

    #[test]
    fn character_is_exactly_one_char() {
        assert_eq!(NodeKind::Character.build("a", vec![]), Some(Node::Character('a')));
        assert_eq!(NodeKind::Character.build("ab", vec![]), None);
    }
}
