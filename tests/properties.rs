// Property tests over generated Jack classes

use jack_analyzer::lexer::{strip_comments, tokenize_all};
use jack_analyzer::token::{Keyword, Kind};
use jack_analyzer::{parse_to_xml, parse_tree};
use proptest::prelude::*;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-zA-Z0-9_]{0,6}".prop_filter("keywords are not identifiers", |name| {
        Keyword::lookup(name).is_none()
    })
}

fn binary_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["+", "-", "*", "/", "&", "|", "<", ">", "="])
}

fn unary_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["-", "~", "^", "#"])
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u16..=32767).prop_map(|n| n.to_string()),
        identifier(),
        "[a-zA-Z0-9 ]{0,8}".prop_map(|s| format!("\"{}\"", s)),
        prop::sample::select(vec!["true", "false", "null", "this"]).prop_map(String::from),
    ];

    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), binary_op(), inner.clone())
                .prop_map(|(lhs, op, rhs)| format!("{} {} {}", lhs, op, rhs)),
            inner.clone().prop_map(|e| format!("({})", e)),
            (unary_op(), inner.clone()).prop_map(|(op, e)| format!("{}{}", op, e)),
            (identifier(), inner.clone()).prop_map(|(name, e)| format!("{}[{}]", name, e)),
            (identifier(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(name, args)| format!("{}({})", name, args.join(", "))),
            (identifier(), identifier(), prop::collection::vec(inner, 0..3)).prop_map(
                |(target, name, args)| format!("{}.{}({})", target, name, args.join(", "))
            ),
        ]
    })
}

fn statement() -> impl Strategy<Value = String> {
    let simple = prop_oneof![
        (identifier(), expression()).prop_map(|(name, e)| format!("let {} = {};", name, e)),
        (identifier(), expression(), expression())
            .prop_map(|(name, i, e)| format!("let {}[{}] = {};", name, i, e)),
        (identifier(), identifier(), prop::collection::vec(expression(), 0..3))
            .prop_map(|(target, name, args)| format!("do {}.{}({});", target, name, args.join(", "))),
        expression().prop_map(|e| format!("return {};", e)),
        Just("return;".to_string()),
    ];

    simple.prop_recursive(2, 8, 3, |inner| {
        prop_oneof![
            (expression(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(cond, body)| format!("while ({}) {{ {} }}", cond, body.join(" "))),
            (
                expression(),
                prop::collection::vec(inner.clone(), 0..3),
                prop::option::of(prop::collection::vec(inner, 0..3))
            )
                .prop_map(|(cond, then, otherwise)| match otherwise {
                    Some(body) => format!(
                        "if ({}) {{ {} }} else {{ {} }}",
                        cond,
                        then.join(" "),
                        body.join(" ")
                    ),
                    None => format!("if ({}) {{ {} }}", cond, then.join(" ")),
                }),
        ]
    })
}

fn class_source() -> impl Strategy<Value = String> {
    (
        identifier(),
        prop::collection::vec(statement(), 0..5),
        prop::collection::vec(prop::sample::select(vec!["", "// note\n", "/* block */", "/** doc */"]), 5),
    )
        .prop_map(|(name, statements, comments)| {
            let separator = format!(" {} ", comments[4]);
            format!(
                "{}class {} {{ {} field int a, b; {} method void run(int x, {} y) {{ var char c; {} {} }} }}",
                comments[0],
                name,
                comments[1],
                comments[2],
                name,
                comments[3],
                statements.join(separator.as_str())
            )
        })
}

/// Checks that tags close in reverse order of opening.
fn is_well_nested(xml: &str) -> bool {
    let mut open: Vec<&str> = Vec::new();
    for line in xml.lines().map(str::trim) {
        if let Some(name) = line.strip_prefix("</") {
            if open.pop() != name.strip_suffix('>') {
                return false;
            }
        } else if line.contains("</") {
            continue;
        } else if let Some(name) = line.strip_prefix('<').and_then(|l| l.strip_suffix('>')) {
            open.push(name);
        } else {
            return false;
        }
    }
    open.is_empty()
}

proptest! {
    #[test]
    fn terminals_reproduce_token_stream(source in class_source()) {
        let tree = parse_tree(&source).unwrap();
        let tokens = tokenize_all(&source).unwrap();

        let expected: Vec<(Kind, String)> =
            tokens.iter().map(|token| (token.kind(), token.text())).collect();
        let emitted: Vec<(Kind, String)> = tree
            .terminals()
            .into_iter()
            .map(|(kind, text)| (kind, text.to_string()))
            .collect();
        prop_assert_eq!(emitted, expected);
    }

    #[test]
    fn xml_output_is_well_nested(source in class_source(), indent in 0usize..4) {
        let xml = parse_to_xml(&source, indent).unwrap();
        prop_assert!(is_well_nested(&xml), "badly nested output:\n{}", xml);
    }

    #[test]
    fn comment_stripping_is_idempotent(source in class_source()) {
        let once = strip_comments(&source).unwrap();
        let twice = strip_comments(&once).unwrap();

        let lexemes = |s: &str| -> Vec<(Kind, String)> {
            tokenize_all(s)
                .unwrap()
                .into_iter()
                .map(|token| (token.kind(), token.text()))
                .collect()
        };
        prop_assert_eq!(lexemes(&once), lexemes(&twice));
        prop_assert_eq!(lexemes(&source), lexemes(&once));
    }
}

#[test]
fn nesting_checker_rejects_crossed_tags() {
    assert!(is_well_nested("<a>\n<b>\n</b>\n</a>\n"));
    assert!(!is_well_nested("<a>\n<b>\n</a>\n</b>\n"));
    assert!(!is_well_nested("<a>\n"));
}
