// tests/program_tests.rs
//
// Whole programs through `rip::parse`, including failure diagnostics.

use rip::config::DEFAULT_MAX_DEPTH;
use rip::{parse, parse_source, ErrorKind, Node, ParseOptions, SourceContext};

fn program(text: &str) -> Vec<Node> {
    match parse(text) {
        Ok(Node::Program(items)) => items,
        Ok(other) => panic!("expected a program, got {other:?}"),
        Err(e) => panic!("rejected {text:?}: {e}"),
    }
}

fn int(text: &str) -> Node {
    Node::integer(text)
}

#[test]
fn empty_input_is_an_empty_program() {
    assert_eq!(program(""), vec![]);
    assert_eq!(program("\n\n  \n"), vec![]);
}

#[test]
fn comment_only_program() {
    assert_eq!(
        program("# just a comment"),
        vec![Node::comment(" just a comment")]
    );
}

#[test]
fn statements_end_with_semicolons_or_line_endings() {
    assert_eq!(
        program("1; 2\n3 # three\n"),
        vec![int("1"), int("2"), int("3"), Node::comment(" three")]
    );
}

#[test]
fn terminators_are_optional() {
    assert_eq!(program("1 2"), vec![int("1"), int("2")]);
    assert_eq!(program("nil;"), vec![Node::Nil]);
}

#[test]
fn blank_lines_and_indentation_between_statements() {
    let text = "\n  nil\n\n\t:done\r\n";
    assert_eq!(program(text), vec![Node::Nil, Node::string("done")]);
}

#[test]
fn here_doc_statement_is_followed_by_more_code() {
    let text = "<<SQL\nselect 1\nSQL\n42\n";
    assert_eq!(program(text), vec![Node::string("select 1\n"), int("42")]);
}

#[test]
fn hash_spanning_lines_inside_a_program() {
    let text = "# config\n{\n  :name: :Thomas,\n  :tags: [`a, /x+/]\n}\n";
    assert_eq!(
        program(text),
        vec![
            Node::comment(" config"),
            Node::Hash(vec![
                Node::key_value(Node::string("name"), Node::string("Thomas")),
                Node::key_value(
                    Node::string("tags"),
                    Node::List(vec![Node::Character('a'), Node::regex("x+")])
                ),
            ]),
        ]
    );
}

#[test]
fn pretty_rendering_of_a_program() {
    let parsed = parse("[31, :Thomas]; 1...3").unwrap();
    assert_eq!(
        parsed.pretty(),
        "(program (list (integer 31) (string \"Thomas\")) (range-exclusive (integer 1) (integer 3)))"
    );
}

// ---
// Failures
// ---

#[test]
fn failure_reports_the_furthest_position() {
    let err = parse("42 @").unwrap_err();
    assert_eq!(err.offset(), 3);
    match &err.kind {
        ErrorKind::ParseFailure {
            line,
            column,
            found,
            expected,
        } => {
            assert_eq!((*line, *column), (1, 4));
            assert_eq!(found, "'@'");
            assert!(expected.contains(&"end of input".to_string()), "{expected:?}");
            assert!(expected.contains(&"\"#\"".to_string()), "{expected:?}");
        }
        other => panic!("unexpected error kind {other:?}"),
    }
    assert_eq!(err.diagnostic_info.error_code, "rip::parse::parse_failure");
}

#[test]
fn failure_on_a_later_line() {
    let err = parse("1\n[2,\n").unwrap_err();
    let ErrorKind::ParseFailure { line, found, .. } = &err.kind else {
        panic!("unexpected error kind {:?}", err.kind);
    };
    assert_eq!(*line, 3);
    assert_eq!(found, "end of input");
}

#[test]
fn unterminated_here_doc_fails() {
    assert!(parse("<<EOS\nnever closed\n").is_err());
}

#[test]
fn expectations_are_capped() {
    let options = ParseOptions::default().with_max_expected(2);
    let err = parse_source(&SourceContext::inline("@"), &options).unwrap_err();
    let ErrorKind::ParseFailure { expected, .. } = &err.kind else {
        panic!("unexpected error kind {:?}", err.kind);
    };
    assert_eq!(expected.len(), 2);
}

#[test]
fn deep_nesting_hits_the_recursion_limit() {
    let depth = 200;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let options = ParseOptions::default().with_max_depth(64);
    let err = parse_source(&SourceContext::inline(text), &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::RecursionLimit { limit: 64 });
    assert_eq!(err.diagnostic_info.error_code, "rip::parse::recursion_limit");
}

fn nested_lists(depth: usize) -> String {
    format!("{}{}", "[".repeat(depth), "]".repeat(depth))
}

/// Parses on a freshly spawned thread, which gets the default 2 MiB stack.
fn parse_on_thread(text: String) -> Result<Node, rip::RipError> {
    std::thread::spawn(move || parse(&text)).join().unwrap()
}

#[test]
fn nesting_under_the_default_limit_parses_on_a_plain_thread() {
    let depth = 25;
    let mut node = match parse_on_thread(nested_lists(depth)) {
        Ok(Node::Program(mut items)) => items.pop().unwrap(),
        other => panic!("expected a program, got {other:?}"),
    };
    for _ in 1..depth {
        let Node::List(mut items) = node else {
            panic!("expected a list");
        };
        node = items.pop().unwrap();
    }
    assert_eq!(node, Node::List(vec![]));
}

#[test]
fn nesting_over_the_default_limit_is_reported_on_a_plain_thread() {
    let err = parse_on_thread(nested_lists(40)).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::RecursionLimit {
            limit: DEFAULT_MAX_DEPTH
        }
    );
}

#[test]
fn far_deeper_nesting_is_still_an_error_not_a_crash() {
    let err = parse_on_thread(nested_lists(5_000)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::RecursionLimit { .. }));
}
