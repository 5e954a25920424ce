//! Applying a substitution to a term

use super::Substitution;
use crate::config::{BinderPolicy, EngineConfig};
use crate::error::{EngineError, Result};
use crate::term::{Collection, Component, Composite, Constant, Sequence, Term};
use tracing::trace;

impl Substitution {
    /// Apply with the default [`EngineConfig`]
    pub fn apply(&self, term: &Term) -> Result<Term> {
        self.apply_with(term, &EngineConfig::default())
    }

    /// Rewrite `term` in a single top-down pass
    ///
    /// At each position the first matcher that matches produces the result
    /// and nothing below that position is visited. Unmatched composites,
    /// sequences and collections are rebuilt from their rewritten parts.
    pub fn apply_with(&self, term: &Term, config: &EngineConfig) -> Result<Term> {
        self.apply_at(term, config, 0)
    }

    /// Absent terms map to absent terms
    pub fn apply_opt(&self, term: Option<&Term>) -> Result<Option<Term>> {
        self.apply_opt_with(term, &EngineConfig::default())
    }

    pub fn apply_opt_with(&self, term: Option<&Term>, config: &EngineConfig) -> Result<Option<Term>> {
        term.map(|t| self.apply_with(t, config)).transpose()
    }

    /// Apply to every term of a materialised slice
    ///
    /// There is no variant taking an iterator: terms must be fully built
    /// before the engine sees them.
    pub fn apply_all(&self, terms: &[Term]) -> Result<Vec<Term>> {
        self.apply_all_with(terms, &EngineConfig::default())
    }

    pub fn apply_all_with(&self, terms: &[Term], config: &EngineConfig) -> Result<Vec<Term>> {
        terms.iter().map(|t| self.apply_with(t, config)).collect()
    }

    fn apply_at(&self, term: &Term, config: &EngineConfig, depth: usize) -> Result<Term> {
        if depth > config.max_depth {
            return Err(EngineError::DepthLimitExceeded {
                limit: config.max_depth,
            });
        }

        for matcher in &self.matchers {
            let outcome = matcher.attempt(term, config)?;
            if outcome.is_matched() {
                trace!(%matcher, %term, "matched");
                return matcher.replace(term, outcome, config);
            }
        }

        match term {
            Term::Variable(_) | Term::Constant(_) => Ok(term.clone()),
            Term::Composite(node) => self.apply_composite(node, config, depth).map(Term::Composite),
            Term::Collection(items) => {
                let mapped = items
                    .iter()
                    .map(|item| self.apply_at(item, config, depth + 1))
                    .collect::<Result<Collection>>()?;
                Ok(Term::Collection(mapped))
            }
            Term::Sequence(Sequence::Terms(items)) => {
                let mapped = items
                    .iter()
                    .map(|item| self.apply_at(item, config, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Term::Sequence(Sequence::Terms(mapped)))
            }
            Term::Sequence(Sequence::Integers(values)) => {
                let mapped = values
                    .iter()
                    .map(|&n| match self.apply_at(&Term::int(n), config, depth + 1)? {
                        Term::Constant(Constant::Integer(m)) => Ok(m),
                        other => Err(EngineError::UnsupportedTermShape {
                            expected: "integer element of a packed integer sequence".to_string(),
                            found: other.to_string(),
                        }),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Term::Sequence(Sequence::Integers(mapped)))
            }
        }
    }

    fn apply_composite(&self, node: &Composite, config: &EngineConfig, depth: usize) -> Result<Composite> {
        let compositor = self.apply_at(node.compositor(), config, depth + 1)?;

        let scoped;
        let inner = match (config.binder_policy, node.bound_variable()) {
            (BinderPolicy::Shadowing, Some(bound)) => {
                scoped = self.without_variable(bound);
                &scoped
            }
            _ => self,
        };

        let component = match node.component() {
            Component::Single(operand) => {
                Component::Single(Box::new(inner.apply_at(operand, config, depth + 1)?))
            }
            Component::Operands(operands) => Component::Operands(
                operands
                    .iter()
                    .map(|operand| inner.apply_at(operand, config, depth + 1))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };

        Ok(node.rebuild(compositor, component)?)
    }
}
