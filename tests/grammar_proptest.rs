//! Property-based tests for the Rip grammar
//!
//! Generated literals must parse back to the value they were built from, and
//! layout whitespace around list, hash, key-value and range delimiters must
//! not change the tree.

use proptest::prelude::*;
use rip::{parse, parse_rule, Node};

/// Digit groups joined by single underscores, e.g. `12_345_6`.
fn grouped_digits_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[0-9]{1,4}", 1..5).prop_map(|groups| groups.join("_"))
}

/// Layout between list elements: spaces, tabs and line endings.
fn layout_strategy() -> impl Strategy<Value = String> {
    "[ \t\n]{0,3}"
}

/// Spaces and tabs only, for delimiters that must stay on one line.
fn inline_space_strategy() -> impl Strategy<Value = String> {
    "[ \t]{0,3}"
}

fn single_node(rule: &str, text: &str) -> Option<Node> {
    parse_rule(rule, text).ok()?.into_node()
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn single_quoted_text_round_trips(body in "[^']{0,24}") {
            let text = format!("'{}'", body);
            prop_assert_eq!(single_node("string", &text), Some(Node::string(body)));
        }

        #[test]
        fn double_quoted_text_round_trips(body in "[^\"]{0,24}") {
            let text = format!("\"{}\"", body);
            prop_assert_eq!(single_node("string", &text), Some(Node::string(body)));
        }

        #[test]
        fn grouped_digits_are_integers(digits in grouped_digits_strategy(), sign in "[+-]?") {
            let text = format!("{}{}", sign, digits);
            prop_assert_eq!(single_node("numeric", &text), Some(Node::integer(&text)));
        }

        #[test]
        fn here_doc_bodies_round_trip(lines in prop::collection::vec("[a-z ]{0,12}", 0..4)) {
            let body: String = lines.iter().map(|line| format!("{}\n", line)).collect();
            let text = format!("<<EOS\n{}EOS", body);
            prop_assert_eq!(single_node("here_doc", &text), Some(Node::string(body)));
        }

        #[test]
        fn list_layout_does_not_matter(
            items in prop::collection::vec(0u32..10_000, 0..6),
            before in layout_strategy(),
            after in layout_strategy(),
        ) {
            let compact = format!(
                "[{}]",
                items.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
            );
            let separator = format!("{},{}", before, after);
            let spread = format!(
                "[{}{}{}]",
                after,
                items.iter().map(u32::to_string).collect::<Vec<_>>().join(&separator),
                before
            );
            let expected = Node::List(items.iter().map(|n| Node::integer(&n.to_string())).collect());
            prop_assert_eq!(single_node("list", &compact), Some(expected.clone()));
            prop_assert_eq!(single_node("list", &spread), Some(expected));
        }

        #[test]
        fn key_value_spacing_does_not_matter(
            key in 0u32..1000,
            value in 0u32..1000,
            before in inline_space_strategy(),
            after in inline_space_strategy(),
        ) {
            let text = format!("{}{}:{}{}", key, before, after, value);
            let expected = Node::pair(Node::integer(&key.to_string()), Node::integer(&value.to_string()));
            prop_assert_eq!(single_node("object", &text), Some(expected));
        }

        #[test]
        fn range_spacing_does_not_matter(
            start in 0u32..1000,
            end in 0u32..1000,
            exclusive in any::<bool>(),
            before in inline_space_strategy(),
            after in inline_space_strategy(),
        ) {
            let dots = if exclusive { "..." } else { ".." };
            let text = format!("{}{}{}{}{}", start, before, dots, after, end);
            let expected = Node::range(
                Node::integer(&start.to_string()),
                Node::integer(&end.to_string()),
                exclusive,
            );
            prop_assert_eq!(single_node("object", &text), Some(expected));
        }

        #[test]
        fn hash_layout_does_not_matter(
            entries in prop::collection::vec(("[a-z_]{1,6}", 0u32..1000), 0..5),
            colon_before in inline_space_strategy(),
            colon_after in inline_space_strategy(),
            comma_before in layout_strategy(),
            comma_after in layout_strategy(),
        ) {
            let render = |colon: (&str, &str), comma: (&str, &str)| {
                let pairs: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!(":{}{}:{}{}", key, colon.0, colon.1, value))
                    .collect();
                format!("{{{}{}{}}}", comma.1, pairs.join(&format!("{},{}", comma.0, comma.1)), comma.0)
            };
            let compact = render(("", ""), ("", ""));
            let spread = render(
                (colon_before.as_str(), colon_after.as_str()),
                (comma_before.as_str(), comma_after.as_str()),
            );
            let expected = Node::Hash(
                entries
                    .iter()
                    .map(|(key, value)| {
                        Node::key_value(Node::string(key.as_str()), Node::integer(&value.to_string()))
                    })
                    .collect(),
            );
            prop_assert_eq!(single_node("hash_literal", &compact), Some(expected.clone()));
            prop_assert_eq!(single_node("hash_literal", &spread), Some(expected));
        }

        #[test]
        fn arbitrary_input_never_panics(text in "\\PC{0,40}") {
            let _ = parse(&text);
        }
    }
}
