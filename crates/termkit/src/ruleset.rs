//! JSON rule sets
//!
//! A rule set is an ordered list of (pattern, replacement) pairs stored as
//! JSON and turned into a [`Substitution`]. Rule order is kept, since the
//! first matching rule wins.
//!
//! ```json
//! {
//!   "rules": [
//!     {
//!       "pattern": {"type": "Operator", "op": "+", "args": [
//!         {"type": "Variable", "name": "X"}, {"type": "Integer", "value": 0}
//!       ]},
//!       "replacement": {"type": "Variable", "name": "X"}
//!     }
//!   ]
//! }
//! ```

use crate::error::{EngineError, Result};
use crate::matcher::{MatchStrategy, Matcher};
use crate::substitution::Substitution;
use crate::term::{
    BinderKind, Collection, Component, Composite, CompositeKind, Constant, Fixity, Sequence, Term, Variable,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

/// JSON representation of a term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Variable { name: String },
    Constant { name: String },
    Integer { value: i64 },
    Application { name: String, args: Vec<TermJson> },
    Operator { op: String, args: Vec<TermJson> },
    Binder { binder: BinderKind, variable: String, body: Box<TermJson> },
    Sequence { items: Vec<TermJson> },
    Integers { values: Vec<i64> },
    Collection { items: Vec<TermJson> },
    Custom { kind: String, compositor: Box<TermJson>, args: Vec<TermJson> },
}

impl TermJson {
    pub fn from_term(term: &Term) -> Result<Self> {
        let json = match term {
            Term::Variable(v) => TermJson::Variable { name: v.name.clone() },
            Term::Constant(Constant::Symbol(name)) => TermJson::Constant { name: name.clone() },
            Term::Constant(Constant::Integer(value)) => TermJson::Integer { value: *value },
            Term::Sequence(Sequence::Terms(items)) => TermJson::Sequence {
                items: items.iter().map(TermJson::from_term).collect::<Result<_>>()?,
            },
            Term::Sequence(Sequence::Integers(values)) => TermJson::Integers { values: values.clone() },
            Term::Collection(items) => TermJson::Collection {
                items: items.iter().map(TermJson::from_term).collect::<Result<_>>()?,
            },
            Term::Composite(node) => Self::from_composite(node)?,
        };
        Ok(json)
    }

    fn from_composite(node: &Composite) -> Result<Self> {
        let args = || -> Result<Vec<TermJson>> {
            node.component().iter().map(TermJson::from_term).collect()
        };
        let symbol = match node.compositor() {
            Term::Constant(Constant::Symbol(name)) => Some(name.clone()),
            _ => None,
        };
        let json = match (node.kind(), symbol, node.component()) {
            (CompositeKind::Custom(kind), _, Component::Operands(_)) => TermJson::Custom {
                kind: kind.clone(),
                compositor: Box::new(TermJson::from_term(node.compositor())?),
                args: args()?,
            },
            (CompositeKind::Application, Some(name), Component::Operands(_)) => {
                TermJson::Application { name, args: args()? }
            }
            (CompositeKind::Operator(_), Some(op), Component::Operands(_)) => TermJson::Operator { op, args: args()? },
            (CompositeKind::Binder(binder), Some(_), Component::Operands(items)) => match items.as_slice() {
                [Term::Variable(v), body] => TermJson::Binder {
                    binder: *binder,
                    variable: v.name.clone(),
                    body: Box::new(TermJson::from_term(body)?),
                },
                _ => return Err(unrepresentable(node)),
            },
            _ => return Err(unrepresentable(node)),
        };
        Ok(json)
    }

    pub fn into_term(self) -> Result<Term> {
        let term = match self {
            TermJson::Variable { name } => Term::var(name),
            TermJson::Constant { name } => Term::constant(name),
            TermJson::Integer { value } => Term::int(value),
            TermJson::Application { name, args } => Term::app(name, convert_all(args)?),
            TermJson::Operator { op, args } => {
                let fixity = match args.len() {
                    1 => Fixity::Prefix,
                    2 => Fixity::Infix,
                    n => {
                        return Err(EngineError::UnsupportedTermShape {
                            expected: "operator with one or two operands".to_string(),
                            found: format!("{} with {} operands", op, n),
                        })
                    }
                };
                let node = Composite::new(
                    CompositeKind::Operator(fixity),
                    Term::constant(op),
                    Component::Operands(convert_all(args)?),
                )?;
                Term::Composite(node)
            }
            TermJson::Binder { binder, variable, body } => {
                Term::binder(binder, Variable::new(variable), body.into_term()?)
            }
            TermJson::Sequence { items } => Term::sequence(convert_all(items)?),
            TermJson::Integers { values } => Term::integers(values),
            TermJson::Collection { items } => Term::Collection(Collection::new(convert_all(items)?)),
            TermJson::Custom { kind, compositor, args } => Term::Composite(Composite::new(
                CompositeKind::Custom(kind),
                compositor.into_term()?,
                Component::Operands(convert_all(args)?),
            )?),
        };
        Ok(term)
    }
}

fn convert_all(items: Vec<TermJson>) -> Result<Vec<Term>> {
    items.into_iter().map(TermJson::into_term).collect()
}

fn unrepresentable(node: &Composite) -> EngineError {
    EngineError::UnsupportedTermShape {
        expected: "composite with a symbol compositor and an operand list".to_string(),
        found: node.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStrategy {
    Exact,
    #[default]
    Unifying,
}

/// One rule as stored on disk; a missing replacement keeps matching terms unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleJson {
    pub pattern: TermJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<TermJson>,
    #[serde(default)]
    pub strategy: RuleStrategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSetJson {
    pub rules: Vec<RuleJson>,
}

/// An ordered list of rewrite rules
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Matcher>,
}

impl RuleSet {
    pub fn new() -> Self {
        RuleSet::default()
    }

    pub fn push(&mut self, pattern: Term, replacement: Option<Term>, strategy: RuleStrategy) {
        let strategy = match strategy {
            RuleStrategy::Exact => MatchStrategy::Exact,
            RuleStrategy::Unifying => MatchStrategy::Unifying,
        };
        self.rules.push(Matcher::new(pattern, replacement, strategy));
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.rules
    }

    pub fn from_json(json: RuleSetJson) -> Result<Self> {
        let mut set = RuleSet::new();
        for rule in json.rules {
            let replacement = rule.replacement.map(TermJson::into_term).transpose()?;
            set.push(rule.pattern.into_term()?, replacement, rule.strategy);
        }
        Ok(set)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_json(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn to_json(&self) -> Result<RuleSetJson> {
        let rules = self
            .rules
            .iter()
            .map(|m| {
                let strategy = match m.strategy() {
                    MatchStrategy::Exact => RuleStrategy::Exact,
                    MatchStrategy::Unifying => RuleStrategy::Unifying,
                    MatchStrategy::Conditional(condition) => {
                        return Err(EngineError::UnsupportedTermShape {
                            expected: "exact or unifying rule".to_string(),
                            found: format!("conditional rule `{}`", condition.name()),
                        })
                    }
                };
                Ok(RuleJson {
                    pattern: TermJson::from_term(m.pattern())?,
                    replacement: m.substitute().map(TermJson::from_term).transpose()?,
                    strategy,
                })
            })
            .collect::<Result<_>>()?;
        Ok(RuleSetJson { rules })
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json()?)?)
    }

    pub fn into_substitution(self) -> Substitution {
        Substitution::new(self.rules)
    }
}
