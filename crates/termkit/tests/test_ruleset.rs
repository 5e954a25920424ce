//! Loading rule sets from JSON and rewriting with them

use std::path::PathBuf;
use termkit::{EngineError, Rewriter, RuleSet, Term};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn and(a: Term, b: Term) -> Term {
    Term::infix("and", a, b)
}

fn not(a: Term) -> Term {
    Term::prefix("not", a)
}

fn boolean_rewriter() -> Rewriter {
    let rules = RuleSet::from_path(fixture("boolean.json")).unwrap();
    assert_eq!(rules.len(), 5);
    Rewriter::new(rules.into_substitution())
}

#[test]
fn test_simplify_with_loaded_rules() {
    let p = Term::var("p");
    let term = and(not(not(and(p.clone(), Term::constant("true")))), Term::constant("true"));
    let normal = boolean_rewriter().normalize(&term).unwrap();
    assert_eq!(normal.term, p);
}

#[test]
fn test_exact_rule_from_file() {
    let term = and(Term::var("q"), not(Term::constant("true")));
    let normal = boolean_rewriter().normalize(&term).unwrap();
    assert_eq!(normal.term, Term::constant("false"));
}

#[test]
fn test_non_substituting_rule_protects_subterm() {
    let protected = Term::app("protect", vec![not(not(Term::var("p")))]);
    let term = and(protected.clone(), Term::constant("true"));
    let normal = boolean_rewriter().normalize(&term).unwrap();
    assert_eq!(normal.term, protected);
}

#[test]
fn test_missing_file() {
    assert!(matches!(
        RuleSet::from_path(fixture("does_not_exist.json")),
        Err(EngineError::RuleSetIo(_))
    ));
}

#[test]
fn test_invalid_operator_in_rule() {
    let json = r#"{"rules": [{"pattern": {"type": "Operator", "op": "f", "args": [
        {"type": "Integer", "value": 1}, {"type": "Integer", "value": 2}, {"type": "Integer", "value": 3}
    ]}}]}"#;
    assert!(matches!(
        RuleSet::from_json_str(json),
        Err(EngineError::UnsupportedTermShape { .. })
    ));
}
