use marq::{Arguments, ListItem, Node, NumberRange, ParseErrorKind, Tag, Value};
use pretty_assertions::assert_eq;

#[test]
fn code_block_end_to_end() {
    let source = r#"code-block(highlights: [1, 3..5], lang: "ts") { p { "a js snippet" } }"#;
    let document = marq::parse(source).unwrap();

    assert_eq!(document.nodes.len(), 1);
    let Node::Tag(code_block) = &document.nodes[0] else {
        panic!("expected a tag node");
    };
    assert_eq!(code_block.name, "code-block");
    assert_eq!(
        code_block.arguments.get("highlights"),
        Some(&Value::List(vec![
            ListItem::Number(1),
            ListItem::Range(NumberRange {
                start: 3,
                end: Some(5),
            }),
        ]))
    );
    assert_eq!(
        code_block.arguments.get("lang"),
        Some(&Value::String("ts".to_string()))
    );
    assert_eq!(
        code_block.children,
        vec![Node::Tag(Tag {
            name: "p".to_string(),
            arguments: Arguments::new(),
            children: vec![Node::Text("a js snippet".to_string())],
        })]
    );
}

#[test]
fn round_trip_is_stable() {
    let source = r#"
code-block(highlights: [1, 3..5, 9..], lang: "ts") {
    p { "a js snippet" }
    "trailing text"
}
leaf
row(reversed: "true", count: -2) { item item "x" }
"#;
    let parsed = marq::parse(source).unwrap();
    let printed = parsed.to_string();
    let reparsed = marq::parse(&printed).unwrap();
    assert_eq!(parsed.nodes, reparsed.nodes);

    // Printing is a fixed point after one round.
    assert_eq!(printed, reparsed.to_string());
}

#[test]
fn strings_are_verbatim() {
    let source = "note { \"first line\n    second line, indented\" }";
    let document = marq::parse(source).unwrap();
    let Node::Tag(note) = &document.nodes[0] else {
        panic!("expected a tag node");
    };
    assert_eq!(
        note.children,
        vec![Node::Text("first line\n    second line, indented".to_string())]
    );
}

#[test]
fn verbatim_string_survives_a_round_trip() {
    let source = "note { \"first line\n    second line\" }";
    let parsed = marq::parse(source).unwrap();
    let reparsed = marq::parse(&parsed.to_string()).unwrap();
    assert_eq!(parsed.nodes, reparsed.nodes);
}

#[test]
fn text_nodes_are_distinguishable_from_any_tag() {
    // A user tag may be named anything identifier-like; text nodes are a
    // separate variant, so no name can collide with them.
    let document = marq::parse(r#"text { "text" }"#).unwrap();
    let Node::Tag(tag) = &document.nodes[0] else {
        panic!("expected a tag node");
    };
    assert_eq!(tag.name, "text");
    assert_eq!(tag.children, vec![Node::Text("text".to_string())]);
}

#[test]
fn diagnostics_carry_kind_span_and_file_id() {
    let source = "n(a: 1, a: 2)";
    let errors = marq::Parser::new(source.to_string(), 7).parse().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        ParseErrorKind::DuplicateArgument {
            name: "a".to_string(),
        }
    );
    assert_eq!(errors[0].file_id, 7);
    assert_eq!(&source[errors[0].span.clone()], "a");

    let diagnostic = errors[0].to_diagnostic();
    assert_eq!(diagnostic.message, "duplicate argument `a`");
}

#[test]
fn repeated_parses_are_deterministic() {
    let source = ", p {} , ] q(";
    let first = marq::parse(source).unwrap_err();
    let second = marq::parse(source).unwrap_err();
    let first_kinds: Vec<_> = first.iter().map(|e| (e.kind.clone(), e.span.clone())).collect();
    let second_kinds: Vec<_> = second.iter().map(|e| (e.kind.clone(), e.span.clone())).collect();
    assert_eq!(first_kinds, second_kinds);
}

#[test]
fn ast_serializes_with_argument_order_preserved() {
    let document = marq::parse(r#"p(b: 2, a: 1)"#).unwrap();
    let json = serde_json::to_string(&document.nodes).unwrap();
    assert_eq!(
        json,
        r#"[{"Tag":{"name":"p","arguments":{"b":{"Number":2},"a":{"Number":1}},"children":[]}}]"#
    );
}
