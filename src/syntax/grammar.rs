//! The Rip grammar.
//!
//! Rule order inside every choice is significant: alternatives are tried top
//! to bottom and the first success wins. The comments next to a choice say
//! which ordering it depends on.

use once_cell::sync::Lazy;

use crate::errors::RipError;
use crate::grammar::{
    any, backref, choice, class, end_of_input, lit, one_of, rule, CharClass, Field, Grammar,
    GrammarBuilder, Matcher, NodeKind,
};

/// Name of the root rule.
pub const ROOT: &str = "program";

static RIP_GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    // Every reference below names a rule declared in `build_grammar`;
    // `built_in_grammar_resolves` keeps it that way.
    build_grammar().expect("built-in Rip grammar resolves")
});

/// The shared, read-only Rip grammar.
pub fn grammar() -> &'static Grammar {
    &RIP_GRAMMAR
}

/// Builds a fresh copy of the Rip grammar.
pub fn build_grammar() -> Result<Grammar, RipError> {
    let builder = GrammarBuilder::new();
    let builder = top_level_rules(builder);
    let builder = composite_rules(builder);
    let builder = literal_rules(builder);
    let builder = lexical_rules(builder);
    builder.build(ROOT)
}

// ============================================================================
// TOP LEVEL
// ============================================================================

fn top_level_rules(builder: GrammarBuilder) -> GrammarBuilder {
    builder
        .rule(ROOT, rule("statements").node(NodeKind::Program))
        // Blank lines and indentation may surround statements.
        .rule(
            "statements",
            rule("whitespaces?")
                .then(rule("statement"))
                .many()
                .then(rule("whitespaces?")),
        )
        .rule(
            "statement",
            rule("comment").or(rule("expression")
                .then(rule("spaces?"))
                .then(rule("comment").maybe())),
        )
        .rule(
            "comment",
            lit("#")
                .then(rest_of_line().node(NodeKind::Comment))
                .then(rule("eol").maybe()),
        )
        .rule("expression", rule("simple_expression"))
        .rule("expression_terminator", lit(";").or(rule("eol")))
        // Terminators are optional after every statement, not only the last:
        // `1 2` is two statements rather than a failure.
        .rule(
            "simple_expression",
            rule("object")
                .then(rule("spaces?"))
                .then(rule("expression_terminator").maybe()),
        )
}

/// Everything up to, not including, the next line ending.
fn rest_of_line() -> Matcher {
    rule("eol").absent().then(any()).many()
}

// ============================================================================
// COMPOSITES
// ============================================================================

fn composite_rules(builder: GrammarBuilder) -> GrammarBuilder {
    builder
        .rule("object", rule("recursive_object").or(rule("simple_object")))
        // Composites first: each needs a distinguishing token after its first
        // element, and falls back to the plain literal when it is missing.
        .rule(
            "recursive_object",
            rule("key_value_pair")
                .or(rule("range"))
                .or(rule("hash_literal"))
                .or(rule("list")),
        )
        .rule(
            "simple_object",
            choice([
                rule("nil_literal"),
                rule("boolean"),
                rule("numeric"),
                rule("character"),
                rule("string"),
                rule("regular_expression"),
            ]),
        )
        // Keys are atomic literals only.
        .rule(
            "key_value_pair",
            rule("simple_object")
                .field(Field::Key)
                .then(rule("spaces?"))
                .then(lit(":"))
                .then(rule("spaces?"))
                .then(rule("object").field(Field::Value))
                .node(NodeKind::KeyValue),
        )
        .rule("rangeable_object", rule("integer").or(rule("character")))
        .rule(
            "range",
            rule("rangeable_object")
                .field(Field::Start)
                .then(rule("spaces?"))
                .then(lit(".."))
                .then(lit(".").field(Field::Exclusivity).maybe())
                .then(rule("spaces?"))
                .then(rule("rangeable_object").field(Field::End))
                .node(NodeKind::Range),
        )
        .rule(
            "hash_literal",
            delimited("{", rule("key_value_pair"), "}").node(NodeKind::Hash),
        )
        .rule(
            "list",
            delimited("[", rule("object"), "]").node(NodeKind::List),
        )
}

/// `open`, zero or more comma separated `element`s, `close`, with optional
/// whitespace (line endings included) around the delimiters.
fn delimited(open: &'static str, element: Matcher, close: &'static str) -> Matcher {
    let separator = rule("whitespaces?")
        .then(lit(","))
        .then(rule("whitespaces?"));
    let elements = element.clone().then(separator.then(element).many());
    lit(open)
        .then(rule("whitespaces?"))
        .then(elements.maybe())
        .then(rule("whitespaces?"))
        .then(lit(close))
}

// ============================================================================
// LITERALS
// ============================================================================

fn literal_rules(builder: GrammarBuilder) -> GrammarBuilder {
    builder
        .rule("nil_literal", lit("nil").node(NodeKind::Nil))
        .rule("boolean", rule("true_literal").or(rule("false_literal")))
        .rule("true_literal", lit("true").node(NodeKind::True))
        .rule("false_literal", lit("false").node(NodeKind::False))
        // Decimal before integer, otherwise `4.2` stops after `4`.
        .rule("numeric", rule("decimal").or(rule("integer")))
        .rule(
            "decimal",
            rule("sign")
                .maybe()
                .then(rule("digits").maybe())
                .then(lit("."))
                .then(rule("digits"))
                .node(NodeKind::Decimal),
        )
        .rule(
            "integer",
            rule("sign")
                .maybe()
                .then(rule("digits"))
                .node(NodeKind::Integer),
        )
        .rule(
            "character",
            lit("`").then(
                class(
                    CharClass::new("alphanumeric or underscore")
                        .range('0', '9')
                        .range('a', 'z')
                        .range('A', 'Z')
                        .chars("_"),
                )
                .node(NodeKind::Character),
            ),
        )
        .rule(
            "string",
            rule("symbol_string")
                .or(rule("single_quoted_string"))
                .or(rule("double_quoted_string"))
                .or(rule("here_doc")),
        )
        .rule(
            "symbol_string",
            lit(":").then(
                class(
                    CharClass::new("letter or underscore")
                        .range('a', 'z')
                        .range('A', 'Z')
                        .chars("_"),
                )
                .many1()
                .node(NodeKind::StringLit),
            ),
        )
        .rule("single_quoted_string", quoted("'", NodeKind::StringLit))
        .rule("double_quoted_string", quoted("\"", NodeKind::StringLit))
        .rule(
            "here_doc",
            lit("<<")
                .then(rule("here_doc_label").bind(HERE_DOC_LABEL))
                .then(rule("eol"))
                .then(here_doc_line().many().node(NodeKind::StringLit))
                .then(here_doc_terminator()),
        )
        .rule(
            "here_doc_label",
            class(CharClass::new("here-doc label").range('A', 'Z').chars("_")).many1(),
        )
        .rule("regular_expression", quoted("/", NodeKind::Regex))
}

const HERE_DOC_LABEL: &str = "here_doc_label";

/// `delimiter`, any text without it, `delimiter`. No escapes.
fn quoted(delimiter: &'static str, kind: NodeKind) -> Matcher {
    lit(delimiter)
        .then(lit(delimiter).absent().then(any()).many().node(kind))
        .then(lit(delimiter))
}

/// A line that consists of exactly the opening label, then a line ending or
/// the end of input.
fn here_doc_terminator() -> Matcher {
    backref(HERE_DOC_LABEL).then(rule("eol").or(end_of_input()))
}

/// One body line, line ending included.
fn here_doc_line() -> Matcher {
    here_doc_terminator()
        .absent()
        .then(rest_of_line())
        .then(rule("eol"))
}

// ============================================================================
// LEXICAL
// ============================================================================

fn lexical_rules(builder: GrammarBuilder) -> GrammarBuilder {
    builder
        .rule("sign", one_of("sign", "+-"))
        .rule(
            "digit",
            class(CharClass::new("digit").range('0', '9')),
        )
        // Underscores group digits: never first, last or doubled.
        .rule(
            "digits",
            rule("digit")
                .many1()
                .then(lit("_").maybe().then(rule("digit").many1()).many()),
        )
        .rule("whitespace", rule("space").or(rule("eol")))
        .rule("whitespaces", rule("whitespace").many1())
        .rule("whitespaces?", rule("whitespaces").maybe())
        .rule("space", lit(" ").or(lit("\t")))
        .rule("spaces", rule("space").many1())
        .rule("spaces?", rule("spaces").maybe())
        // CRLF first so the pair is never split.
        .rule("eol", lit("\r\n").or(lit("\n")).or(lit("\r")))
        .rule("eols", rule("eol").many())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_grammar_resolves() {
        let grammar = build_grammar().unwrap();
        assert_eq!(grammar.root_name(), ROOT);
        assert!(grammar.rule_index("here_doc").is_some());
        assert!(grammar.rule_index("whitespaces?").is_some());
    }
}
