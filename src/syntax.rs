//! Syntax module for the Rip language
//!
//! This module provides the parse tree produced by the Rip grammar. The tree
//! is purely syntactic: numbers keep their source text, keys are not checked
//! for uniqueness and range bounds are not type checked.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod grammar;
pub mod parser;

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Sign written in front of a numeric literal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Sign {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '+' => Some(Sign::Plus),
            '-' => Some(Sign::Minus),
            _ => None,
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

/// The text of a numeric literal, kept exactly as written.
///
/// `digits` holds everything after the sign, grouping underscores and (for
/// decimals) the decimal point included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numeral {
    pub sign: Option<Sign>,
    pub digits: String,
}

impl From<&str> for Numeral {
    fn from(text: &str) -> Self {
        let mut chars = text.chars();
        match chars.next().and_then(Sign::from_char) {
            Some(sign) => Numeral {
                sign: Some(sign),
                digits: chars.as_str().to_string(),
            },
            None => Numeral {
                sign: None,
                digits: text.to_string(),
            },
        }
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sign) = self.sign {
            write!(f, "{}", sign.as_char())?;
        }
        f.write_str(&self.digits)
    }
}

/// A key and its value, as found in a hash literal or on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: Box<Node>,
    pub value: Box<Node>,
}

/// `start..end` (inclusive) or `start...end` (exclusive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub start: Box<Node>,
    pub end: Box<Node>,
    pub exclusive: bool,
}

/// The parse tree for Rip source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Program(Vec<Node>),
    Comment(String),
    Nil,
    Bool(bool),
    Integer(Numeral),
    Decimal(Numeral),
    Character(char),
    #[serde(rename = "string")]
    StringLit(String),
    Regex(String),
    KeyValue(KeyValue),
    Range(Range),
    Hash(Vec<KeyValue>),
    List(Vec<Node>),
}

impl Node {
    pub fn integer(text: &str) -> Node {
        Node::Integer(Numeral::from(text))
    }

    pub fn decimal(text: &str) -> Node {
        Node::Decimal(Numeral::from(text))
    }

    pub fn string(text: impl Into<String>) -> Node {
        Node::StringLit(text.into())
    }

    pub fn comment(text: impl Into<String>) -> Node {
        Node::Comment(text.into())
    }

    pub fn regex(text: impl Into<String>) -> Node {
        Node::Regex(text.into())
    }

    pub fn key_value(key: Node, value: Node) -> KeyValue {
        KeyValue {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn pair(key: Node, value: Node) -> Node {
        Node::KeyValue(Node::key_value(key, value))
    }

    pub fn range(start: Node, end: Node, exclusive: bool) -> Node {
        Node::Range(Range {
            start: Box::new(start),
            end: Box::new(end),
            exclusive,
        })
    }

    /// Children of a container node, in source order. Leaves have none.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Program(items) | Node::List(items) => items.iter().collect(),
            Node::Hash(pairs) => pairs
                .iter()
                .flat_map(|kv| [&*kv.key, &*kv.value])
                .collect(),
            Node::KeyValue(kv) => vec![&*kv.key, &*kv.value],
            Node::Range(range) => vec![&*range.start, &*range.end],
            Node::Comment(_)
            | Node::Nil
            | Node::Bool(_)
            | Node::Integer(_)
            | Node::Decimal(_)
            | Node::Character(_)
            | Node::StringLit(_)
            | Node::Regex(_) => Vec::new(),
        }
    }

    /// Returns the type name of this node as a string (for diagnostics and debugging).
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Program(_) => "Program",
            Node::Comment(_) => "Comment",
            Node::Nil => "Nil",
            Node::Bool(_) => "Bool",
            Node::Integer(_) => "Integer",
            Node::Decimal(_) => "Decimal",
            Node::Character(_) => "Character",
            Node::StringLit(_) => "String",
            Node::Regex(_) => "Regex",
            Node::KeyValue(_) => "KeyValue",
            Node::Range(_) => "Range",
            Node::Hash(_) => "Hash",
            Node::List(_) => "List",
        }
    }

    /// Pretty-prints the node as an s-expression.
    pub fn pretty(&self) -> String {
        match self {
            Node::Program(items) => Self::pretty_form("program", items.iter()),
            Node::Comment(text) => format!("(comment {:?})", text),
            Node::Nil => "nil".into(),
            Node::Bool(b) => b.to_string(),
            Node::Integer(n) => format!("(integer {})", n),
            Node::Decimal(n) => format!("(decimal {})", n),
            Node::Character(c) => format!("(character `{})", c),
            Node::StringLit(s) => format!("(string {:?})", s),
            Node::Regex(r) => format!("(regex /{}/)", r),
            Node::KeyValue(kv) => Self::pretty_pair(kv),
            Node::Range(range) => {
                let head = if range.exclusive {
                    "range-exclusive"
                } else {
                    "range"
                };
                format!(
                    "({} {} {})",
                    head,
                    range.start.pretty(),
                    range.end.pretty()
                )
            }
            Node::Hash(pairs) => {
                let mut s = String::from("(hash");
                for kv in pairs {
                    s.push(' ');
                    s.push_str(&Self::pretty_pair(kv));
                }
                s.push(')');
                s
            }
            Node::List(items) => Self::pretty_form("list", items.iter()),
        }
    }

    fn pretty_pair(kv: &KeyValue) -> String {
        format!("(pair {} {})", kv.key.pretty(), kv.value.pretty())
    }

    fn pretty_form<'a>(head: &str, items: impl Iterator<Item = &'a Node>) -> String {
        let mut s = format!("({}", head);
        for item in items {
            s.push(' ');
            s.push_str(&item.pretty());
        }
        s.push(')');
        s
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeral_keeps_sign_and_grouping() {
        let n = Numeral::from("-1_000");
        assert_eq!(n.sign, Some(Sign::Minus));
        assert_eq!(n.digits, "1_000");
        assert_eq!(n.to_string(), "-1_000");
        assert_eq!(Numeral::from(".5").sign, None);
    }

    #[test]
    fn pretty_prints_nested_containers() {
        let node = Node::List(vec![
            Node::integer("31"),
            Node::Hash(vec![Node::key_value(Node::string("a"), Node::Nil)]),
            Node::range(Node::Character('a'), Node::Character('z'), true),
        ]);
        assert_eq!(
            node.pretty(),
            r#"(list (integer 31) (hash (pair (string "a") nil)) (range-exclusive (character `a) (character `z)))"#
        );
    }

    #[test]
    fn serializes_with_snake_case_tags() {
        let json = serde_json::to_string(&Node::string("x")).unwrap();
        assert_eq!(json, r#"{"string":"x"}"#);
        let json = serde_json::to_string(&Node::integer("-3")).unwrap();
        assert_eq!(json, r#"{"integer":{"sign":"-","digits":"3"}}"#);
    }

    #[test]
    fn children_of_containers() {
        let pair = Node::pair(Node::string("k"), Node::integer("1"));
        assert_eq!(pair.children(), vec![&Node::string("k"), &Node::integer("1")]);
        assert_eq!(pair.type_name(), "KeyValue");
        assert!(Node::Nil.children().is_empty());
    }
}
