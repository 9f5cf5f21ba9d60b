use std::collections::HashMap;

use rstest::rstest;
use xpath_forge::{AxisKind, Expr, NamespaceContext, ParseError, Step, parse, parse_with_context};

fn path_steps(expr: &Expr) -> &[Step] {
    match expr {
        Expr::Path(steps) => steps,
        other => panic!("expected a path, got {other:?}"),
    }
}

#[rstest]
#[case("/a/b", "/a/b")]
#[case("a/b[1]/@id", "a/b[1]/@id")]
#[case("  /a / b ", "/a/b")]
#[case("/a[@id = '1']", "/a[@id = '1']")]
#[case("self::a", "self::a")]
#[case("preceding-sibling::row", "preceding-sibling::row")]
#[case("../x", "../x")]
#[case(".[2]", ".[2]")]
fn canonical_rendering(#[case] input: &str, #[case] rendered: &str) {
    assert_eq!(parse(input).unwrap().to_string(), rendered);
}

#[test]
fn absolute_path_starts_with_root() {
    let expr = parse("/a").unwrap();
    let steps = path_steps(&expr);
    assert!(matches!(steps[0], Step::Root));
    assert!(matches!(&steps[1], Step::Element { name, .. } if name.local == "a"));
}

#[test]
fn double_slash_expands_to_descendant_or_self() {
    let expr = parse("/a//b").unwrap();
    let steps = path_steps(&expr);
    assert_eq!(steps.len(), 4);
    assert!(matches!(
        &steps[2],
        Step::Axis { axis: AxisKind::DescendantOrSelf, name, .. } if name.local == "*"
    ));
}

#[test]
fn leading_double_slash_searches_from_root() {
    let expr = parse("//b").unwrap();
    let steps = path_steps(&expr);
    assert!(matches!(steps[0], Step::Root));
    assert!(matches!(&steps[1], Step::Axis { axis: AxisKind::DescendantOrSelf, .. }));
    assert!(matches!(&steps[2], Step::Element { name, .. } if name.local == "b"));
}

#[test]
fn explicit_axis_step() {
    let expr = parse("following-sibling::item[2]").unwrap();
    let steps = path_steps(&expr);
    match &steps[0] {
        Step::Axis { axis, name, predicates } => {
            assert_eq!(*axis, AxisKind::FollowingSibling);
            assert_eq!(name.local, "item");
            assert_eq!(predicates.len(), 1);
        }
        other => panic!("unexpected step {other:?}"),
    }
}

#[test]
fn comparisons_do_not_chain() {
    let err = parse("a = b = c").unwrap_err();
    assert!(matches!(err, ParseError::TrailingToken { .. }), "got {err:?}");
}

#[test]
fn arithmetic_is_not_wired_into_the_grammar() {
    // `+` is only an AST node kind; the grammar stops at the comparison
    let err = parse("1 + 2").unwrap_err();
    assert!(matches!(err, ParseError::TrailingToken { .. }), "got {err:?}");
}

#[test]
fn unary_minus_nests() {
    let expr = parse("--2").unwrap();
    assert!(matches!(expr, Expr::Neg(inner) if matches!(*inner, Expr::Neg(_))));
}

#[test]
fn missing_bracket_reports_expected_tokens() {
    let err = parse("a[1").unwrap_err();
    match err {
        ParseError::UnexpectedToken { expected, .. } => {
            assert_eq!(expected, vec![xpath_forge::parser::lexer::TokenKind::RBracket]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unterminated_literal_is_rejected() {
    let err = parse("a['oops").unwrap_err();
    assert!(matches!(err, ParseError::UnrecognizedInput { .. }), "got {err:?}");
}

#[test]
fn unknown_axis_is_rejected() {
    let err = parse("sideways::a").unwrap_err();
    assert!(matches!(err, ParseError::InvalidAxis { found, .. } if found == "sideways"));
}

#[test]
fn empty_input_is_rejected() {
    assert!(parse("").is_err());
}

struct Namespaces(HashMap<String, String>);

impl NamespaceContext for Namespaces {
    fn namespace_uri(&self, prefix: &str) -> Option<String> {
        self.0.get(prefix).cloned()
    }
}

#[test]
fn prefix_resolves_through_namespace_context() {
    let ns = Namespaces(HashMap::from([("x".to_string(), "urn:example".to_string())]));
    let expr = parse_with_context("/x:a", &ns).unwrap();
    match &path_steps(&expr)[1] {
        Step::Element { name, .. } => {
            assert_eq!(name.prefix.as_deref(), Some("x"));
            assert_eq!(name.local, "a");
            assert_eq!(name.ns_uri.as_deref(), Some("urn:example"));
        }
        other => panic!("unexpected step {other:?}"),
    }
}

#[test]
fn prefix_is_silently_dropped_without_a_context() {
    // long-standing behavior: downstream documents rely on it
    let expr = parse("/x:a").unwrap();
    match &path_steps(&expr)[1] {
        Step::Element { name, .. } => {
            assert_eq!(name.prefix, None);
            assert_eq!(name.local, "a");
            assert_eq!(name.ns_uri, None);
        }
        other => panic!("unexpected step {other:?}"),
    }
}
