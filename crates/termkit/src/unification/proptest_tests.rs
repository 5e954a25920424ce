//! Property-based tests for unification, matching and composition using proptest.

use super::{unify, Unification};
use crate::error::EngineError;
use crate::matcher::Matcher;
use crate::substitution::{compose, Substitution};
use crate::term::{Term, Variable};
use proptest::prelude::*;

/// Composite, sequence and collection shapes over `inner`:
/// functions f0/f1 with 1 or 2 arguments, operators `+` and `neg`,
/// term sequences, packed integer sequences and bags of up to 2 elements.
fn arb_compound(inner: BoxedStrategy<Term>) -> BoxedStrategy<Term> {
    prop_oneof![
        3 => (0..2u8, proptest::collection::vec(inner.clone(), 1..=2))
            .prop_map(|(f, args)| Term::app(format!("f{}", f), args)),
        1 => (inner.clone(), inner.clone()).prop_map(|(a, b)| Term::infix("+", a, b)),
        1 => inner.clone().prop_map(|a| Term::prefix("neg", a)),
        1 => proptest::collection::vec(inner.clone(), 0..=2).prop_map(Term::sequence),
        1 => proptest::collection::vec(0..3i64, 0..=2).prop_map(Term::integers),
        1 => proptest::collection::vec(inner, 0..=2).prop_map(Term::collection),
    ]
    .boxed()
}

/// Random term of bounded depth over a small fixed signature:
/// variables X0-X3, constants c0-c3, integers 0-2, the shapes of
/// [`arb_compound`] and `forall` binders.
fn arb_term(max_depth: u32) -> BoxedStrategy<Term> {
    let leaf = prop_oneof![
        2 => (0..4u8).prop_map(|i| Term::var(format!("X{}", i))),
        2 => (0..4u8).prop_map(|i| Term::constant(format!("c{}", i))),
        1 => (0..3i64).prop_map(Term::int),
    ];
    if max_depth == 0 {
        leaf.boxed()
    } else {
        let inner = arb_term(max_depth - 1);
        prop_oneof![
            4 => leaf,
            3 => arb_compound(inner.clone()),
            1 => (0..4u8, inner).prop_map(|(i, body)| Term::forall(Variable::new(format!("X{}", i)), body)),
        ]
        .boxed()
    }
}

/// Ground term (no variables)
fn arb_ground_term(max_depth: u32) -> BoxedStrategy<Term> {
    let leaf = prop_oneof![
        2 => (0..4u8).prop_map(|i| Term::constant(format!("c{}", i))),
        1 => (0..3i64).prop_map(Term::int),
    ];
    if max_depth == 0 {
        leaf.boxed()
    } else {
        prop_oneof![
            4 => leaf,
            3 => arb_compound(arb_ground_term(max_depth - 1)),
        ]
        .boxed()
    }
}

fn unifier_of(terms: &[Term]) -> Option<Substitution> {
    unify(terms).unwrap().into_unifier()
}

// =========================================================================
// Unification properties
// =========================================================================

proptest! {
    /// Soundness: if unify({s, t}) = σ, then sσ = tσ
    #[test]
    fn unification_soundness(t1 in arb_term(3), t2 in arb_term(3)) {
        if let Some(sigma) = unifier_of(&[t1.clone(), t2.clone()]) {
            prop_assert_eq!(
                sigma.apply(&t1).unwrap(),
                sigma.apply(&t2).unwrap(),
                "unifier must make terms equal"
            );
        }
    }

    /// Soundness on three-element sets
    #[test]
    fn unification_soundness_triples(t1 in arb_term(2), t2 in arb_term(2), t3 in arb_term(2)) {
        if let Some(sigma) = unifier_of(&[t1.clone(), t2.clone(), t3.clone()]) {
            let image = sigma.apply(&t1).unwrap();
            prop_assert_eq!(&image, &sigma.apply(&t2).unwrap());
            prop_assert_eq!(&image, &sigma.apply(&t3).unwrap());
        }
    }

    /// Symmetry: unify({s, t}) succeeds iff unify({t, s}) succeeds
    #[test]
    fn unification_symmetry(t1 in arb_term(3), t2 in arb_term(3)) {
        let r1 = unify(&[t1.clone(), t2.clone()]).unwrap();
        let r2 = unify(&[t2, t1]).unwrap();
        prop_assert_eq!(r1.is_unified(), r2.is_unified(), "unification should be symmetric");
    }

    /// Unifiers are idempotent
    #[test]
    fn unification_idempotent(t1 in arb_term(3), t2 in arb_term(3)) {
        if let Some(sigma) = unifier_of(&[t1.clone(), t2]) {
            let once = sigma.apply(&t1).unwrap();
            let twice = sigma.apply(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    /// Occurs check: unify({X, f(...X...)}) always fails
    #[test]
    fn unification_occurs_check(func_idx in 0..2u8, depth in 1..4u32) {
        let x = Term::var("X");
        let mut term = x.clone();
        for _ in 0..depth {
            term = Term::app(format!("f{}", func_idx), vec![term]);
        }
        prop_assert!(unify(&[x, term]).unwrap().is_no_unifier(), "occurs check should prevent X = f(...X...)");
    }

    /// Identity: unify({t}) and unify({t, t}) give the identity
    #[test]
    fn unification_identity(t in arb_term(3)) {
        prop_assert_eq!(unifier_of(&[t.clone()]), Some(Substitution::identity()));
        prop_assert_eq!(unifier_of(&[t.clone(), t]), Some(Substitution::identity()));
    }

    /// Ground terms unify iff they are equal
    #[test]
    fn ground_unification_is_equality(t1 in arb_ground_term(3), t2 in arb_ground_term(3)) {
        let result = unify(&[t1.clone(), t2.clone()]).unwrap();
        prop_assert_eq!(result.is_unified(), t1 == t2);
    }
}

// =========================================================================
// Matching and substitution properties
// =========================================================================

proptest! {
    /// A unifying matcher only accepts instances of its pattern
    #[test]
    fn matching_soundness(pattern in arb_term(3), target in arb_term(3)) {
        let matcher = Matcher::unifying(pattern.clone(), pattern.clone());
        let subst = Substitution::new(vec![matcher.clone()]);
        let outcome = matcher.attempt(&target, &Default::default()).unwrap();
        if outcome.is_matched() {
            // the instantiated pattern is the target itself
            prop_assert_eq!(subst.apply(&target).unwrap(), target);
        }
    }

    /// Any ground term matches a pattern built from it by abstracting a subterm
    #[test]
    fn matching_completeness(t in arb_ground_term(3)) {
        let pattern = Term::app("wrap", vec![Term::var("P")]);
        let target = Term::app("wrap", vec![t.clone()]);
        let subst = Substitution::new(vec![Matcher::unifying(pattern, Term::var("P"))]);
        prop_assert_eq!(subst.apply(&target).unwrap(), t);
    }

    /// Applying a binding of a variable that does not occur is the identity
    #[test]
    fn apply_identity_on_non_matching(t in arb_term(3), replacement in arb_term(2)) {
        let subst = Substitution::bind(Variable::new("Unused"), replacement);
        prop_assert_eq!(subst.apply(&t).unwrap(), t);
    }

    /// compose(σ, τ) applied once equals τ then σ
    #[test]
    fn composition_is_sequential(
        t in arb_term(3),
        a in arb_ground_term(2),
        b in arb_term(2),
    ) {
        let sigma = Substitution::bind(Variable::new("X0"), a);
        let tau = Substitution::bind(Variable::new("X1"), b);
        let composed = compose(&sigma, &tau).unwrap();
        let sequential = sigma.apply(&tau.apply(&t).unwrap()).unwrap();
        prop_assert_eq!(composed.apply(&t).unwrap(), sequential);
    }

    /// Exact rules on ground terms compose with a later binding
    #[test]
    fn composition_is_sequential_for_exact_rules(
        t in arb_term(3),
        g in arb_ground_term(2),
        b in arb_term(2),
        a in arb_ground_term(2),
    ) {
        let tau = Substitution::new(vec![Matcher::exact(Term::app("g", vec![g.clone()]), b)]);
        let sigma = Substitution::bind(Variable::new("X0"), a);
        let t = Term::sequence(vec![t, Term::app("g", vec![g])]);
        let composed = compose(&sigma, &tau).unwrap();
        let sequential = sigma.apply(&tau.apply(&t).unwrap()).unwrap();
        prop_assert_eq!(composed.apply(&t).unwrap(), sequential);
    }

    /// Unifying rules have no single-pass composition and are rejected
    #[test]
    fn composition_rejects_unifying_rules(pattern in arb_term(2), replacement in arb_term(2), a in arb_ground_term(1)) {
        let rule = Substitution::new(vec![Matcher::unifying(pattern, replacement)]);
        let binding = Substitution::bind(Variable::new("X0"), a);
        let is_unsupported = |r: crate::error::Result<Substitution>| {
            matches!(r, Err(EngineError::UnsupportedTermShape { .. }))
        };
        prop_assert!(is_unsupported(compose(&binding, &rule)));
        prop_assert!(is_unsupported(compose(&rule, &binding)));
    }

    /// compose(id, σ) = σ = compose(σ, id)
    #[test]
    fn composition_identities(t1 in arb_term(3), t2 in arb_term(3)) {
        if let Unification::Unified(sigma) = unify(&[t1, t2]).unwrap() {
            let id = Substitution::identity();
            prop_assert_eq!(&compose(&id, &sigma).unwrap(), &sigma);
            prop_assert_eq!(&compose(&sigma, &id).unwrap(), &sigma);
        }
    }
}
