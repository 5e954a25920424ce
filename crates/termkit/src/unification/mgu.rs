//! Most General Unifier (MGU) computation

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::substitution::{compose_with, Substitution};
use crate::term::{Collection, Component, Term, Variable};
use indexmap::IndexSet;
use std::fmt;
use tracing::debug;

/// Outcome of a unification attempt
///
/// Failure to unify is an expected result, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Unification {
    Unified(Substitution),
    NoUnifier(Disagreement),
}

impl Unification {
    pub fn is_unified(&self) -> bool {
        matches!(self, Unification::Unified(_))
    }

    pub fn is_no_unifier(&self) -> bool {
        matches!(self, Unification::NoUnifier(_))
    }

    pub fn unifier(&self) -> Option<&Substitution> {
        match self {
            Unification::Unified(unifier) => Some(unifier),
            Unification::NoUnifier(_) => None,
        }
    }

    pub fn into_unifier(self) -> Option<Substitution> {
        match self {
            Unification::Unified(unifier) => Some(unifier),
            Unification::NoUnifier(_) => None,
        }
    }
}

/// Why a set of terms has no unifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disagreement {
    /// Variable occurs in the term it would be bound to
    OccursCheck { variable: Variable, term: Term },
    /// Root symbols or shapes that no binding can reconcile
    NameClash { left: Term, right: Term },
    /// Operand counts differ
    ArityMismatch { left: usize, right: usize },
}

impl fmt::Display for Disagreement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disagreement::OccursCheck { variable, term } => {
                write!(f, "occurs check: {} occurs in {}", variable, term)
            }
            Disagreement::NameClash { left, right } => write!(f, "name clash: {} vs {}", left, right),
            Disagreement::ArityMismatch { left, right } => {
                write!(f, "arity mismatch: {} vs {}", left, right)
            }
        }
    }
}

/// Why the recursive walk stopped early
enum Halt {
    Disagree(Disagreement),
    Error(EngineError),
}

impl From<EngineError> for Halt {
    fn from(err: EngineError) -> Self {
        Halt::Error(err)
    }
}

impl From<Disagreement> for Halt {
    fn from(disagreement: Disagreement) -> Self {
        Halt::Disagree(disagreement)
    }
}

/// Unify a set of terms, returning a most general unifier if one exists
///
/// Duplicates are ignored. The empty set and singletons unify under the
/// identity substitution. Collections are unordered, so two collections
/// may have several incomparable unifiers; the first pairing of their
/// elements that succeeds is returned, and `NoUnifier` means no pairing
/// does.
pub fn unify<'a, I>(terms: I) -> Result<Unification>
where
    I: IntoIterator<Item = &'a Term>,
{
    unify_with(terms, &EngineConfig::default())
}

pub fn unify_with<'a, I>(terms: I, config: &EngineConfig) -> Result<Unification>
where
    I: IntoIterator<Item = &'a Term>,
{
    let set: IndexSet<&Term> = terms.into_iter().collect();
    let mut members = set.into_iter();
    let Some(first) = members.next() else {
        return Ok(Unification::Unified(Substitution::identity()));
    };

    // Stack of equations still to solve; the top is solved first
    let mut pending: Vec<(Term, Term)> = members.map(|other| (first.clone(), other.clone())).collect();
    pending.reverse();

    match solve(pending, Substitution::identity(), config) {
        Ok(unifier) => Ok(Unification::Unified(unifier)),
        Err(Halt::Disagree(disagreement)) => {
            debug!(%disagreement, "no unifier");
            Ok(Unification::NoUnifier(disagreement))
        }
        Err(Halt::Error(err)) => Err(err),
    }
}

/// Unify a set that may contain absent terms
///
/// An absent term is caller misuse and is reported as
/// [`EngineError::NullArgument`], never as a failed unification.
pub fn unify_nullable(terms: &[Option<Term>]) -> Result<Unification> {
    if let Some(position) = terms.iter().position(Option::is_none) {
        return Err(EngineError::NullArgument { position });
    }
    unify(terms.iter().flatten())
}

/// Unify two terms
pub fn unify_pair(left: &Term, right: &Term) -> Result<Unification> {
    unify([left, right])
}

pub fn unify_pair_with(left: &Term, right: &Term, config: &EngineConfig) -> Result<Unification> {
    unify_with([left, right], config)
}

/// Solve the pending equations under `unifier`, extending it
fn solve(
    mut pending: Vec<(Term, Term)>,
    mut unifier: Substitution,
    config: &EngineConfig,
) -> std::result::Result<Substitution, Halt> {
    while let Some((left, right)) = pending.pop() {
        let left = unifier.apply_with(&left, config)?;
        let right = unifier.apply_with(&right, config)?;

        match (&left, &right) {
            // Same term - nothing to do
            _ if left == right => {}

            (Term::Variable(v), t) | (t, Term::Variable(v)) => bind(v, t, &mut unifier, config)?,

            (Term::Composite(a), Term::Composite(b)) => {
                if a.kind() != b.kind() {
                    return Err(clash(&left, &right));
                }
                match (a.component(), b.component()) {
                    (Component::Single(x), Component::Single(y)) => {
                        pending.push(((**x).clone(), (**y).clone()))
                    }
                    (xs, ys) => push_all(&mut pending, xs.as_slice(), ys.as_slice())?,
                }
                pending.push((a.compositor().clone(), b.compositor().clone()));
            }

            (Term::Sequence(a), Term::Sequence(b)) => push_all(&mut pending, &a.to_terms(), &b.to_terms())?,

            (Term::Collection(a), Term::Collection(b)) => {
                return solve_collections(pending, unifier, a, b, config);
            }

            _ => return Err(clash(&left, &right)),
        }
    }
    Ok(unifier)
}

/// Queue `xs[i] = ys[i]` so that the leftmost pair is solved first
fn push_all(pending: &mut Vec<(Term, Term)>, xs: &[Term], ys: &[Term]) -> std::result::Result<(), Halt> {
    if xs.len() != ys.len() {
        return Err(Disagreement::ArityMismatch {
            left: xs.len(),
            right: ys.len(),
        }
        .into());
    }
    for (x, y) in xs.iter().zip(ys.iter()).rev() {
        pending.push((x.clone(), y.clone()));
    }
    Ok(())
}

/// Pair the first element of `a` with each distinct element of `b` in
/// turn, solving the remaining bags and equations on each branch
fn solve_collections(
    pending: Vec<(Term, Term)>,
    unifier: Substitution,
    a: &Collection,
    b: &Collection,
    config: &EngineConfig,
) -> std::result::Result<Substitution, Halt> {
    if a.len() != b.len() {
        return Err(Disagreement::ArityMismatch {
            left: a.len(),
            right: b.len(),
        }
        .into());
    }
    let Some((x, rest)) = a.as_slice().split_first() else {
        return solve(pending, unifier, config);
    };

    let mut first_failure = None;
    let mut tried: IndexSet<&Term> = IndexSet::new();
    for (j, y) in b.iter().enumerate() {
        if !tried.insert(y) {
            continue;
        }
        let others: Collection = b
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != j)
            .map(|(_, t)| t.clone())
            .collect();

        let mut branch = pending.clone();
        branch.push((Term::Collection(rest.iter().cloned().collect()), Term::Collection(others)));
        branch.push((x.clone(), y.clone()));

        match solve(branch, unifier.clone(), config) {
            Ok(found) => return Ok(found),
            Err(Halt::Disagree(disagreement)) => {
                first_failure.get_or_insert(disagreement);
            }
            Err(err) => return Err(err),
        }
    }

    let disagreement = first_failure.unwrap_or_else(|| Disagreement::NameClash {
        left: Term::Collection(a.clone()),
        right: Term::Collection(b.clone()),
    });
    Err(disagreement.into())
}

fn bind(
    var: &Variable,
    term: &Term,
    unifier: &mut Substitution,
    config: &EngineConfig,
) -> std::result::Result<(), Halt> {
    if term.occurs(var) {
        return Err(Disagreement::OccursCheck {
            variable: var.clone(),
            term: term.clone(),
        }
        .into());
    }
    debug!(%var, %term, "bind");
    let binding = Substitution::bind(var.clone(), term.clone());
    *unifier = compose_with(&binding, unifier, config)?;
    Ok(())
}

fn clash(left: &Term, right: &Term) -> Halt {
    Halt::Disagree(Disagreement::NameClash {
        left: left.clone(),
        right: right.clone(),
    })
}
