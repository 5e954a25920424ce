//! termkit: term substitution and unification
//!
//! This library rewrites terms by replacing matched subterms and computes
//! most general unifiers of term sets. It is the engine underneath
//! resolution-style proving and rule-based simplification.
//!
//! ```
//! use termkit::{unify, Term, Unification};
//!
//! let s = Term::app("f", vec![Term::var("X"), Term::constant("b")]);
//! let t = Term::app("f", vec![Term::constant("a"), Term::var("Y")]);
//!
//! let Unification::Unified(mgu) = unify(&[s.clone(), t.clone()]).unwrap() else {
//!     panic!("f(X, b) and f(a, Y) unify");
//! };
//! assert_eq!(mgu.apply(&s).unwrap(), mgu.apply(&t).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod rewrite;
pub mod ruleset;
pub mod substitution;
pub mod term;
pub mod unification;

pub use config::{BinderPolicy, EngineConfig};
pub use error::{EngineError, ReconstructError, Result};
pub use matcher::{Condition, MatchOutcome, MatchStrategy, Matcher};
pub use rewrite::{Normalized, Rewriter};
pub use ruleset::{RuleSet, RuleStrategy, TermJson};
pub use substitution::{compose, compose_with, Substitution};
pub use term::{
    BinderKind, Collection, Component, Composite, CompositeKind, Constant, Fixity, Sequence, Term, Variable,
};
pub use unification::{unify, unify_nullable, unify_pair, unify_with, Disagreement, Unification};
