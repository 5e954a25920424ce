//! Composition of substitutions

use super::Substitution;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::matcher::{MatchStrategy, Matcher};

/// Compose two substitutions: `compose(σ, τ)` is σ∘τ, which applies τ
/// first and then σ, in a single pass
///
/// Every matcher `p ↦ t` of τ becomes `p ↦ σ(t)`, except that variable
/// bindings rewritten to `x ↦ x` are dropped. Bindings of σ whose pattern
/// τ does not already cover follow, unchanged.
///
/// Composing with the identity on either side returns the other operand
/// as is. Otherwise σ must consist of variable bindings and τ of exact,
/// substituting matchers. Unifying or conditional rules and
/// non-substituting matchers have no single-pass equivalent and are
/// rejected with [`EngineError::UnsupportedTermShape`].
pub fn compose(sigma: &Substitution, tau: &Substitution) -> Result<Substitution> {
    compose_with(sigma, tau, &EngineConfig::default())
}

pub fn compose_with(sigma: &Substitution, tau: &Substitution, config: &EngineConfig) -> Result<Substitution> {
    if sigma.is_identity() {
        return Ok(tau.clone());
    }
    if tau.is_identity() {
        return Ok(sigma.clone());
    }
    if let Some(rule) = sigma.matchers().iter().find(|m| m.as_binding().is_none()) {
        return Err(unsupported("variable binding", rule));
    }
    if let Some(rule) = tau
        .matchers()
        .iter()
        .find(|m| !matches!(m.strategy(), MatchStrategy::Exact) || !m.is_substituting())
    {
        return Err(unsupported("exact substituting matcher", rule));
    }

    let mut matchers = Vec::with_capacity(sigma.len() + tau.len());

    for matcher in tau.matchers() {
        let substitute = matcher
            .substitute()
            .map(|t| sigma.apply_with(t, config))
            .transpose()?;
        let rewritten = matcher.with_substitute(substitute);
        if rewritten.as_binding().is_some_and(|(var, term)| term.as_variable() == Some(var)) {
            continue;
        }
        matchers.push(rewritten);
    }

    for matcher in sigma.matchers() {
        if !tau.binds_pattern(matcher.pattern()) {
            matchers.push(matcher.clone());
        }
    }

    Ok(Substitution::new(matchers))
}

fn unsupported(expected: &str, rule: &Matcher) -> EngineError {
    EngineError::UnsupportedTermShape {
        expected: format!("{} in composition", expected),
        found: rule.to_string(),
    }
}

impl Substitution {
    /// The substitution that applies `self` and then `next`
    pub fn then(&self, next: &Substitution) -> Result<Substitution> {
        compose(next, self)
    }

    /// Whether σ∘σ = σ
    pub fn is_idempotent(&self) -> Result<bool> {
        Ok(compose(self, self)? == *self)
    }
}
