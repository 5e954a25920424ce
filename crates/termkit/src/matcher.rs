//! Elementary match/replace rules
//!
//! A [`Matcher`] holds no state between the match step and the replace
//! step. [`Matcher::attempt`] returns a [`MatchOutcome`] carrying whatever
//! evidence the match produced, and the caller passes it back into
//! [`Matcher::replace`].

use crate::config::EngineConfig;
use crate::error::Result;
use crate::substitution::Substitution;
use crate::term::{Term, Variable};
use crate::unification::{unify_pair_with, Unification};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

type Predicate = dyn Fn(&Substitution) -> bool + Send + Sync;

/// Named predicate over the unifier of a conditional match
#[derive(Clone)]
pub struct Condition {
    name: String,
    predicate: Arc<Predicate>,
}

impl Condition {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Substitution) -> bool + Send + Sync + 'static,
    {
        Condition {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn holds(&self, unifier: &Substitution) -> bool {
        (self.predicate)(unifier)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Condition").field(&self.name).finish()
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

/// How a matcher decides whether it applies to a term
#[derive(Debug, Clone, PartialEq)]
pub enum MatchStrategy {
    /// Value equality with the pattern
    Exact,
    /// The pattern unifies with the term without instantiating the term
    Unifying,
    /// As `Unifying`, and the condition holds for the unifier
    Conditional(Condition),
}

/// Result of a single match attempt
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Rejected,
    Matched { unifier: Option<Substitution> },
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }
}

/// A pattern, an optional replacement and a matching strategy
///
/// A matcher without a replacement is non-substituting: when it matches,
/// the term is returned unchanged and nothing below it is rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher {
    pattern: Term,
    substitute: Option<Term>,
    strategy: MatchStrategy,
}

impl Matcher {
    pub fn new(pattern: Term, substitute: Option<Term>, strategy: MatchStrategy) -> Self {
        Matcher {
            pattern,
            substitute,
            strategy,
        }
    }

    pub fn exact(pattern: Term, substitute: Term) -> Self {
        Matcher::new(pattern, Some(substitute), MatchStrategy::Exact)
    }

    pub fn unifying(pattern: Term, substitute: Term) -> Self {
        Matcher::new(pattern, Some(substitute), MatchStrategy::Unifying)
    }

    pub fn conditional(pattern: Term, substitute: Term, condition: Condition) -> Self {
        Matcher::new(pattern, Some(substitute), MatchStrategy::Conditional(condition))
    }

    /// Non-substituting matcher that shields matching terms from rewriting
    pub fn keep(pattern: Term, strategy: MatchStrategy) -> Self {
        Matcher::new(pattern, None, strategy)
    }

    pub fn pattern(&self) -> &Term {
        &self.pattern
    }

    pub fn substitute(&self) -> Option<&Term> {
        self.substitute.as_ref()
    }

    pub fn is_substituting(&self) -> bool {
        self.substitute.is_some()
    }

    pub fn strategy(&self) -> &MatchStrategy {
        &self.strategy
    }

    /// `var ↦ term` when this is an exact, substituting matcher on a variable
    pub fn as_binding(&self) -> Option<(&Variable, &Term)> {
        match (&self.strategy, &self.pattern, &self.substitute) {
            (MatchStrategy::Exact, Term::Variable(var), Some(term)) => Some((var, term)),
            _ => None,
        }
    }

    pub(crate) fn with_substitute(&self, substitute: Option<Term>) -> Matcher {
        Matcher {
            pattern: self.pattern.clone(),
            substitute,
            strategy: self.strategy.clone(),
        }
    }

    /// Test whether this matcher applies to `term`
    ///
    /// A rejection is an ordinary outcome. Errors come only from evaluating
    /// the unifier on `term` (reconstruction or depth limits).
    pub fn attempt(&self, term: &Term, config: &EngineConfig) -> Result<MatchOutcome> {
        let condition = match &self.strategy {
            MatchStrategy::Exact => {
                return Ok(if self.pattern == *term {
                    MatchOutcome::Matched { unifier: None }
                } else {
                    MatchOutcome::Rejected
                });
            }
            MatchStrategy::Unifying => None,
            MatchStrategy::Conditional(condition) => Some(condition),
        };

        let unifier = match unify_pair_with(&self.pattern, term, config)? {
            Unification::Unified(unifier) => unifier,
            Unification::NoUnifier(_) => return Ok(MatchOutcome::Rejected),
        };

        // Only a match if the term is already a fixed point of its unifier
        if unifier.apply_with(term, config)? != *term {
            trace!(pattern = %self.pattern, %term, "unifier instantiates term, rejected");
            return Ok(MatchOutcome::Rejected);
        }

        if let Some(condition) = condition {
            if !condition.holds(&unifier) {
                trace!(pattern = %self.pattern, condition = condition.name(), "condition failed");
                return Ok(MatchOutcome::Rejected);
            }
        }

        Ok(MatchOutcome::Matched {
            unifier: Some(unifier),
        })
    }

    /// Replacement for a term this matcher accepted
    pub fn replace(&self, term: &Term, outcome: MatchOutcome, config: &EngineConfig) -> Result<Term> {
        let (substitute, unifier) = match (&self.substitute, outcome) {
            (Some(substitute), MatchOutcome::Matched { unifier }) => (substitute, unifier),
            _ => return Ok(term.clone()),
        };
        match unifier {
            Some(unifier) => unifier.apply_with(substitute, config),
            None => Ok(substitute.clone()),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = match self.strategy {
            MatchStrategy::Exact => "↦",
            MatchStrategy::Unifying | MatchStrategy::Conditional(_) => "~>",
        };
        match &self.substitute {
            Some(substitute) => write!(f, "{} {} {}", self.pattern, arrow, substitute)?,
            None => write!(f, "keep {}", self.pattern)?,
        }
        if let MatchStrategy::Conditional(condition) = &self.strategy {
            write!(f, " if {}", condition.name())?;
        }
        Ok(())
    }
}
