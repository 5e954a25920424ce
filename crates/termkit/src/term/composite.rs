//! Composite nodes and their per-kind reconstruction
//!
//! Every composite node is rebuilt through the builder of its kind
//! ([`CompositeKind::build`]). Only when that primary path rejects the new
//! parts does [`Composite::rebuild`] fall back to the kind's default node
//! and assign the fields directly, and it logs every time it does so.

use super::{Constant, Term, Variable};
use crate::error::ReconstructError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Fixity {
    Prefix,
    Infix,
}

impl Fixity {
    pub fn arity(self) -> usize {
        match self {
            Fixity::Prefix => 1,
            Fixity::Infix => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinderKind {
    Forall,
    Exists,
    Lambda,
}

impl BinderKind {
    pub fn symbol(self) -> &'static str {
        match self {
            BinderKind::Forall => "forall",
            BinderKind::Exists => "exists",
            BinderKind::Lambda => "lambda",
        }
    }
}

/// The logical kind of a composite node; reconstruction preserves it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompositeKind {
    Application,
    Operator(Fixity),
    Binder(BinderKind),
    Custom(String),
}

/// Operand part of a composite node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Component {
    Single(Box<Term>),
    Operands(Vec<Term>),
}

impl Component {
    pub fn len(&self) -> usize {
        match self {
            Component::Single(_) => 1,
            Component::Operands(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[Term] {
        match self {
            Component::Single(term) => std::slice::from_ref(term.as_ref()),
            Component::Operands(items) => items,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.as_slice().iter()
    }
}

/// A compositor applied to a component, tagged with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Composite {
    kind: CompositeKind,
    compositor: Box<Term>,
    component: Component,
}

impl CompositeKind {
    pub fn name(&self) -> String {
        match self {
            CompositeKind::Application => "application".to_string(),
            CompositeKind::Operator(Fixity::Prefix) => "prefix operator".to_string(),
            CompositeKind::Operator(Fixity::Infix) => "infix operator".to_string(),
            CompositeKind::Binder(kind) => format!("{} binder", kind.symbol()),
            CompositeKind::Custom(name) => name.clone(),
        }
    }

    /// Validate the parts a node of this kind would be built from
    pub fn check(&self, compositor: &Term, component: &Component) -> Result<(), ReconstructError> {
        match self {
            CompositeKind::Application => match compositor {
                Term::Sequence(_) | Term::Collection(_) => Err(self.invalid_compositor(compositor)),
                _ => Ok(()),
            },
            CompositeKind::Operator(fixity) => {
                if !matches!(compositor, Term::Constant(Constant::Symbol(_))) {
                    return Err(self.invalid_compositor(compositor));
                }
                self.check_operands(component, fixity.arity())
            }
            CompositeKind::Binder(_) => {
                if !matches!(compositor, Term::Constant(Constant::Symbol(_))) {
                    return Err(self.invalid_compositor(compositor));
                }
                self.check_operands(component, 2)?;
                match component.iter().next() {
                    Some(Term::Variable(_)) | None => Ok(()),
                    Some(other) => Err(ReconstructError::NotBindable {
                        kind: self.name(),
                        found: other.to_string(),
                    }),
                }
            }
            CompositeKind::Custom(_) => Ok(()),
        }
    }

    /// Primary construction path
    pub fn build(&self, compositor: Term, component: Component) -> Result<Composite, ReconstructError> {
        self.check(&compositor, &component)?;
        Ok(Composite::assemble(self.clone(), compositor, component))
    }

    /// Placeholder node for the secondary construction path, if this kind has one
    pub fn default_node(&self) -> Option<Composite> {
        match self {
            CompositeKind::Application => Some(Composite::assemble(
                self.clone(),
                Term::constant("_"),
                Component::Operands(Vec::new()),
            )),
            CompositeKind::Binder(kind) => Some(Composite::assemble(
                self.clone(),
                Term::constant(kind.symbol()),
                Component::Operands(vec![Term::var("_"), Term::constant("_")]),
            )),
            CompositeKind::Operator(_) | CompositeKind::Custom(_) => None,
        }
    }

    fn invalid_compositor(&self, found: &Term) -> ReconstructError {
        ReconstructError::InvalidCompositor {
            kind: self.name(),
            found: found.to_string(),
        }
    }

    fn check_operands(&self, component: &Component, expected: usize) -> Result<(), ReconstructError> {
        match component {
            Component::Operands(items) if items.len() == expected => Ok(()),
            _ => Err(ReconstructError::Arity {
                kind: self.name(),
                expected,
                found: component.len(),
            }),
        }
    }
}

impl Composite {
    /// Build a node after validating the parts against the kind
    pub fn new(kind: CompositeKind, compositor: Term, component: Component) -> Result<Self, ReconstructError> {
        kind.build(compositor, component)
    }

    pub(crate) fn assemble(kind: CompositeKind, compositor: Term, component: Component) -> Self {
        Composite {
            kind,
            compositor: Box::new(compositor),
            component,
        }
    }

    pub fn kind(&self) -> &CompositeKind {
        &self.kind
    }

    pub fn compositor(&self) -> &Term {
        &self.compositor
    }

    pub fn component(&self) -> &Component {
        &self.component
    }

    /// The variable bound by a binder node, if it still binds one
    pub fn bound_variable(&self) -> Option<&Variable> {
        match (&self.kind, &self.component) {
            (CompositeKind::Binder(_), Component::Operands(items)) => items.first()?.as_variable(),
            _ => None,
        }
    }

    /// A node of the same kind with new parts; the receiver is untouched
    pub fn reconstruct(&self, compositor: Term, component: Component) -> Result<Composite, ReconstructError> {
        self.kind.build(compositor, component)
    }

    /// [`reconstruct`](Self::reconstruct), falling back to the kind's
    /// default node with the fields assigned directly
    pub fn rebuild(&self, compositor: Term, component: Component) -> Result<Composite, ReconstructError> {
        let cause = match self.kind.check(&compositor, &component) {
            Ok(()) => return Ok(Composite::assemble(self.kind.clone(), compositor, component)),
            Err(cause) => cause,
        };

        let Some(mut node) = self.kind.default_node() else {
            return Err(ReconstructError::NoDefault {
                kind: self.kind.name(),
                cause: Box::new(cause),
            });
        };
        warn!(
            kind = %self.kind.name(),
            %cause,
            "reconstruction rejected, using default construction path"
        );
        node.set_compositor(compositor);
        node.set_component(component);
        Ok(node)
    }

    fn set_compositor(&mut self, compositor: Term) {
        self.compositor = Box::new(compositor);
    }

    fn set_component(&mut self, component: Component) {
        self.component = component;
    }
}

impl fmt::Display for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operands: Vec<&Term> = self.component.iter().collect();
        match (&self.kind, operands.as_slice()) {
            (CompositeKind::Operator(Fixity::Infix), [left, right]) => {
                write!(f, "({} {} {})", left, self.compositor, right)
            }
            (CompositeKind::Operator(Fixity::Prefix), [operand]) => {
                write!(f, "({} {})", self.compositor, operand)
            }
            (CompositeKind::Binder(_), [bound, body]) => {
                write!(f, "{} {}. {}", self.compositor, bound, body)
            }
            (CompositeKind::Custom(name), _) => {
                write!(f, "{}[{}](", name, self.compositor)?;
                write_operands(f, &operands)?;
                write!(f, ")")
            }
            _ => {
                write!(f, "{}(", self.compositor)?;
                write_operands(f, &operands)?;
                write!(f, ")")
            }
        }
    }
}

fn write_operands(f: &mut fmt::Formatter<'_>, operands: &[&Term]) -> fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", operand)?;
    }
    Ok(())
}
