//! Unification of term sets

mod mgu;

#[cfg(test)]
mod proptest_tests;

pub use mgu::{unify, unify_nullable, unify_pair, unify_pair_with, unify_with, Disagreement, Unification};
