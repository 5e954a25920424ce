//! Fixed-point rewriting driver
//!
//! Applies a substitution repeatedly until the term stops changing. The
//! number of passes is bounded by [`EngineConfig::max_iterations`] so that
//! looping or non-confluent rule sets are reported instead of running
//! forever.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::substitution::Substitution;
use crate::term::Term;
use tracing::{debug, warn};

/// A term in normal form together with the number of rewrite steps taken
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub term: Term,
    pub steps: usize,
}

#[derive(Debug, Clone)]
pub struct Rewriter {
    rules: Substitution,
    config: EngineConfig,
}

impl Rewriter {
    pub fn new(rules: Substitution) -> Self {
        Rewriter {
            rules,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn rules(&self) -> &Substitution {
        &self.rules
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rewrite `term` until a pass leaves it unchanged
    pub fn normalize(&self, term: &Term) -> Result<Normalized> {
        let mut current = term.clone();
        for step in 0..self.config.max_iterations {
            let next = self.rules.apply_with(&current, &self.config)?;
            if next == current {
                debug!(steps = step, term = %current, "reached fixed point");
                return Ok(Normalized { term: current, steps: step });
            }
            debug!(step = step + 1, from = %current, to = %next, "rewrite");
            current = next;
        }
        warn!(
            iterations = self.config.max_iterations,
            term = %current,
            "no fixed point within iteration limit"
        );
        Err(EngineError::NonTermination {
            iterations: self.config.max_iterations,
            last: current,
        })
    }

    /// Normalize every term of a materialised slice
    pub fn normalize_all(&self, terms: &[Term]) -> Result<Vec<Normalized>> {
        terms.iter().map(|t| self.normalize(t)).collect()
    }
}
