//! Terms: the values the engine matches against and rewrites
//!
//! A term is one of four shapes: atomic (variables and constants),
//! composite (a compositor applied to a component), sequence (ordered)
//! or collection (unordered).

mod composite;

pub use composite::{BinderKind, Component, Composite, CompositeKind, Fixity};

use indexmap::IndexSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A free variable; the only kind of term unification may bind
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable { name: name.into() }
    }
}

/// An opaque leaf compared by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    Symbol(String),
    Integer(i64),
}

/// An ordered run of terms
///
/// `Integers` is the packed primitive form: every element must stay an
/// integer constant under rewriting. Equality, ordering and hashing look
/// at the elements only, so a packed sequence equals the `Terms` sequence
/// of the same integers.
#[derive(Debug, Clone)]
pub enum Sequence {
    Terms(Vec<Term>),
    Integers(Vec<i64>),
}

impl Sequence {
    pub fn len(&self) -> usize {
        match self {
            Sequence::Terms(items) => items.len(),
            Sequence::Integers(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements as terms, expanding packed integers
    pub fn to_terms(&self) -> Vec<Term> {
        match self {
            Sequence::Terms(items) => items.clone(),
            Sequence::Integers(values) => values.iter().map(|&n| Term::int(n)).collect(),
        }
    }
}

impl PartialEq for Sequence {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Sequence::Terms(a), Sequence::Terms(b)) => a == b,
            (Sequence::Integers(a), Sequence::Integers(b)) => a == b,
            _ => self.to_terms() == other.to_terms(),
        }
    }
}

impl Eq for Sequence {}

impl PartialOrd for Sequence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sequence {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match (self, other) {
            (Sequence::Terms(a), Sequence::Terms(b)) => a.cmp(b),
            _ => self.to_terms().cmp(&other.to_terms()),
        }
    }
}

impl Hash for Sequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Sequence::Terms(items) => items.hash(state),
            Sequence::Integers(_) => self.to_terms().hash(state),
        }
    }
}

/// An unordered bag of terms
///
/// Elements are kept sorted so that derived equality, hashing and ordering
/// ignore insertion order. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Collection {
    items: Vec<Term>,
}

impl Collection {
    pub fn new(mut items: Vec<Term>) -> Self {
        items.sort();
        Collection { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Term] {
        &self.items
    }
}

impl FromIterator<Term> for Collection {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Collection::new(iter.into_iter().collect())
    }
}

/// A term
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Composite(Composite),
    Sequence(Sequence),
    Collection(Collection),
}

// =============================================================================
// Construction
// =============================================================================

impl Term {
    pub fn var(name: impl Into<String>) -> Term {
        Term::Variable(Variable::new(name))
    }

    pub fn constant(name: impl Into<String>) -> Term {
        Term::Constant(Constant::Symbol(name.into()))
    }

    pub fn int(value: i64) -> Term {
        Term::Constant(Constant::Integer(value))
    }

    /// Function application `name(args...)`
    pub fn app(name: impl Into<String>, args: Vec<Term>) -> Term {
        Term::Composite(Composite::assemble(
            CompositeKind::Application,
            Term::constant(name),
            Component::Operands(args),
        ))
    }

    /// Binary operator `left op right`
    pub fn infix(op: impl Into<String>, left: Term, right: Term) -> Term {
        Term::Composite(Composite::assemble(
            CompositeKind::Operator(Fixity::Infix),
            Term::constant(op),
            Component::Operands(vec![left, right]),
        ))
    }

    /// Unary operator `op operand`
    pub fn prefix(op: impl Into<String>, operand: Term) -> Term {
        Term::Composite(Composite::assemble(
            CompositeKind::Operator(Fixity::Prefix),
            Term::constant(op),
            Component::Operands(vec![operand]),
        ))
    }

    /// Quantifier or lambda binding `variable` in `body`
    pub fn binder(kind: BinderKind, variable: Variable, body: Term) -> Term {
        Term::Composite(Composite::assemble(
            CompositeKind::Binder(kind),
            Term::constant(kind.symbol()),
            Component::Operands(vec![Term::Variable(variable), body]),
        ))
    }

    pub fn forall(variable: Variable, body: Term) -> Term {
        Term::binder(BinderKind::Forall, variable, body)
    }

    pub fn exists(variable: Variable, body: Term) -> Term {
        Term::binder(BinderKind::Exists, variable, body)
    }

    pub fn lambda(variable: Variable, body: Term) -> Term {
        Term::binder(BinderKind::Lambda, variable, body)
    }

    pub fn sequence(items: Vec<Term>) -> Term {
        Term::Sequence(Sequence::Terms(items))
    }

    pub fn integers(values: Vec<i64>) -> Term {
        Term::Sequence(Sequence::Integers(values))
    }

    pub fn collection(items: Vec<Term>) -> Term {
        Term::Collection(Collection::new(items))
    }
}

// =============================================================================
// Inspection
// =============================================================================

impl Term {
    pub fn is_atomic(&self) -> bool {
        matches!(self, Term::Variable(_) | Term::Constant(_))
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Term::Composite(node) => Some(node),
            _ => None,
        }
    }

    /// Immediate subterms, in order
    pub fn children(&self) -> Vec<&Term> {
        match self {
            Term::Variable(_) | Term::Constant(_) | Term::Sequence(Sequence::Integers(_)) => {
                Vec::new()
            }
            Term::Composite(node) => {
                let mut children = vec![node.compositor()];
                children.extend(node.component().iter());
                children
            }
            Term::Sequence(Sequence::Terms(items)) => items.iter().collect(),
            Term::Collection(items) => items.iter().collect(),
        }
    }

    /// Variables in order of first occurrence
    pub fn variables(&self) -> IndexSet<Variable> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    pub fn collect_variables(&self, vars: &mut IndexSet<Variable>) {
        match self {
            Term::Variable(v) => {
                vars.insert(v.clone());
            }
            _ => {
                for child in self.children() {
                    child.collect_variables(vars);
                }
            }
        }
    }

    /// Whether `var` occurs anywhere in this term
    pub fn occurs(&self, var: &Variable) -> bool {
        match self {
            Term::Variable(v) => v == var,
            _ => self.children().into_iter().any(|child| child.occurs(var)),
        }
    }

    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            _ => self.children().into_iter().all(Term::is_ground),
        }
    }

    /// Number of nodes, packed integers counted one each
    pub fn size(&self) -> usize {
        match self {
            Term::Sequence(Sequence::Integers(values)) => 1 + values.len(),
            _ => 1 + self.children().into_iter().map(Term::size).sum::<usize>(),
        }
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Term::Variable(v)
    }
}

impl From<Composite> for Term {
    fn from(node: Composite) -> Self {
        Term::Composite(node)
    }
}

// =============================================================================
// Display
// =============================================================================

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Symbol(name) => write!(f, "{}", name),
            Constant::Integer(n) => write!(f, "{}", n),
        }
    }
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        match self {
            Sequence::Terms(items) => write_joined(f, items)?,
            Sequence::Integers(values) => write_joined(f, values)?,
        }
        write!(f, "]")
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        write_joined(f, &self.items)?;
        write!(f, "}}")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
            Term::Composite(node) => write!(f, "{}", node),
            Term::Sequence(seq) => write!(f, "{}", seq),
            Term::Collection(items) => write!(f, "{}", items),
        }
    }
}
