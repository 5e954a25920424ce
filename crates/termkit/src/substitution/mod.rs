//! Substitutions: ordered matcher lists usable as rewriting functions
//!
//! Order matters for application (the first matching matcher decides) but
//! not for equality, which compares the matchers as sets.

mod apply;
mod compose;

pub use compose::{compose, compose_with};

use crate::matcher::Matcher;
use crate::term::{Term, Variable};
use indexmap::IndexSet;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct Substitution {
    matchers: Vec<Matcher>,
}

impl Substitution {
    pub fn new(matchers: Vec<Matcher>) -> Self {
        Substitution { matchers }
    }

    /// The empty substitution; `apply` is the identity
    pub fn identity() -> Self {
        Substitution::default()
    }

    /// Single binding `var ↦ term`
    pub fn bind(var: Variable, term: Term) -> Self {
        Substitution::new(vec![Matcher::exact(Term::Variable(var), term)])
    }

    pub fn from_bindings<I>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (Variable, Term)>,
    {
        Substitution::new(
            bindings
                .into_iter()
                .map(|(var, term)| Matcher::exact(Term::Variable(var), term))
                .collect(),
        )
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Variable bindings: exact, substituting matchers on a variable pattern
    pub fn bindings(&self) -> impl Iterator<Item = (&Variable, &Term)> + '_ {
        self.matchers.iter().filter_map(Matcher::as_binding)
    }

    /// Whether every matcher is a variable binding
    pub fn is_bindings_only(&self) -> bool {
        self.matchers.iter().all(|m| m.as_binding().is_some())
    }

    /// The term `var` is bound to, if any
    pub fn binding(&self, var: &Variable) -> Option<&Term> {
        self.bindings().find(|(v, _)| *v == var).map(|(_, term)| term)
    }

    pub fn domain(&self) -> IndexSet<Variable> {
        self.bindings().map(|(var, _)| var.clone()).collect()
    }

    pub(crate) fn binds_pattern(&self, pattern: &Term) -> bool {
        self.matchers.iter().any(|m| m.pattern() == pattern)
    }

    /// Copy without the matchers whose pattern is exactly `var`
    pub(crate) fn without_variable(&self, var: &Variable) -> Substitution {
        Substitution::new(
            self.matchers
                .iter()
                .filter(|m| m.pattern().as_variable() != Some(var))
                .cloned()
                .collect(),
        )
    }
}

impl PartialEq for Substitution {
    fn eq(&self, other: &Self) -> bool {
        self.matchers.iter().all(|m| other.matchers.contains(m))
            && other.matchers.iter().all(|m| self.matchers.contains(m))
    }
}

impl FromIterator<Matcher> for Substitution {
    fn from_iter<I: IntoIterator<Item = Matcher>>(iter: I) -> Self {
        Substitution::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, matcher) in self.matchers.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", matcher)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_lookup() {
        let x = Variable::new("X");
        let y = Variable::new("Y");
        let subst = Substitution::bind(x.clone(), Term::constant("a"));

        assert_eq!(subst.binding(&x), Some(&Term::constant("a")));
        assert_eq!(subst.binding(&y), None);
        assert!(subst.domain().contains(&x));
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = Substitution::from_bindings([
            (Variable::new("X"), Term::constant("a")),
            (Variable::new("Y"), Term::constant("b")),
        ]);
        let b = Substitution::from_bindings([
            (Variable::new("Y"), Term::constant("b")),
            (Variable::new("X"), Term::constant("a")),
        ]);
        assert_eq!(a, b);
        assert_ne!(a, Substitution::identity());
    }

    #[test]
    fn test_unifying_matchers_are_not_bindings() {
        let subst = Substitution::new(vec![Matcher::unifying(Term::var("X"), Term::constant("a"))]);
        assert_eq!(subst.bindings().count(), 0);
        assert_eq!(subst.len(), 1);
        assert!(!subst.is_bindings_only());
        assert!(Substitution::bind(Variable::new("X"), Term::constant("a")).is_bindings_only());
    }

    #[test]
    fn test_display() {
        let subst = Substitution::bind(Variable::new("X"), Term::app("f", vec![Term::constant("a")]));
        assert_eq!(subst.to_string(), "{X ↦ f(a)}");
    }
}
