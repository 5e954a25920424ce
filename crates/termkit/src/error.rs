//! Error types for termkit
//!
//! "No unifier exists" is not an error: it is reported through
//! [`Unification::NoUnifier`](crate::Unification). Everything here signals
//! misuse or a term the engine cannot process.

use crate::term::Term;
use std::io;
use thiserror::Error;

/// Failure to rebuild a composite node from a new (compositor, component) pair
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    #[error("{kind} node cannot take compositor `{found}`")]
    InvalidCompositor { kind: String, found: String },

    #[error("{kind} node expects {expected} operand(s), got {found}")]
    Arity {
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("{kind} node must bind a variable, got `{found}`")]
    NotBindable { kind: String, found: String },

    #[error("{kind} node has no default construction path (primary path failed: {cause})")]
    NoDefault {
        kind: String,
        cause: Box<ReconstructError>,
    },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("absent term at position {position}")]
    NullArgument { position: usize },

    #[error("reconstruction failed: {0}")]
    Reconstruction(#[from] ReconstructError),

    #[error("unsupported term shape: expected {expected}, found `{found}`")]
    UnsupportedTermShape { expected: String, found: String },

    #[error("rewriting did not reach a fixed point after {iterations} iterations (last term: {last})")]
    NonTermination { iterations: usize, last: Term },

    #[error("recursion depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    #[error("invalid rule set: {0}")]
    RuleSet(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    RuleSetIo(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
