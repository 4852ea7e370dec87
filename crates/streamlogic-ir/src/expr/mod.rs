//! Logical expressions over raw values or references.
//!
//! [`Expr<A>`] is generic over its leaf type: raw-space expressions use
//! [`Value`] leaves, reference-space expressions use [`Term`](crate::Term)
//! leaves. Conversion between the two lives in [`crate::convert`].

mod analysis;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The closed set of reserved prefixes.
///
/// Any prefix outside this set names a predicate or function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    And,
    Or,
    Not,
    Equal,
    Exists,
    Forall,
    Implies,
    When,
}

impl Operator {
    pub const ALL: [Operator; 8] = [
        Operator::And,
        Operator::Or,
        Operator::Not,
        Operator::Equal,
        Operator::Exists,
        Operator::Forall,
        Operator::Implies,
        Operator::When,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Equal => "=",
            Operator::Exists => "exists",
            Operator::Forall => "forall",
            Operator::Implies => "implies",
            Operator::When => "when",
        }
    }

    /// Classify a prefix. `None` means a predicate application.
    pub fn parse(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == prefix)
    }

    pub fn is_connective(self) -> bool {
        matches!(self, Operator::And | Operator::Or | Operator::Not)
    }

    pub fn is_quantifier(self) -> bool {
        matches!(self, Operator::Exists | Operator::Forall)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A quantified parameter, `?x - type` in surface syntax.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: None,
        }
    }

    pub fn typed(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: Some(ty.into()),
        }
    }
}

/// Right-hand side of an equality node.
///
/// Scalar fluent values are never wrapped into references; only a nested
/// fact is converted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rhs<A> {
    Scalar(Value),
    Expr(Box<Expr<A>>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr<A> {
    /// Predicate or function application
    Pred {
        name: String,
        args: Vec<A>,
    },
    And(Vec<Expr<A>>),
    Or(Vec<Expr<A>>),
    Not(Box<Expr<A>>),
    Exists {
        params: Vec<Param>,
        body: Box<Expr<A>>,
    },
    Forall {
        params: Vec<Param>,
        body: Box<Expr<A>>,
    },
    Implies(Box<Expr<A>>, Box<Expr<A>>),
    When(Box<Expr<A>>, Box<Expr<A>>),
    Equal {
        head: Box<Expr<A>>,
        value: Rhs<A>,
    },
}

impl<A> Expr<A> {
    pub fn pred(name: impl Into<String>, args: Vec<A>) -> Self {
        Expr::Pred {
            name: name.into(),
            args,
        }
    }

    pub fn and(children: Vec<Expr<A>>) -> Self {
        Expr::And(children)
    }

    pub fn or(children: Vec<Expr<A>>) -> Self {
        Expr::Or(children)
    }

    pub fn negate(expr: Expr<A>) -> Self {
        Expr::Not(Box::new(expr))
    }

    /// `(= head value)` with a scalar right-hand side.
    pub fn equal(head: Expr<A>, value: impl Into<Value>) -> Self {
        Expr::Equal {
            head: Box::new(head),
            value: Rhs::Scalar(value.into()),
        }
    }

    /// `(= head other)` where the right-hand side is itself a fact.
    pub fn equal_expr(head: Expr<A>, other: Expr<A>) -> Self {
        Expr::Equal {
            head: Box::new(head),
            value: Rhs::Expr(Box::new(other)),
        }
    }

    pub fn exists(params: Vec<Param>, body: Expr<A>) -> Self {
        Expr::Exists {
            params,
            body: Box::new(body),
        }
    }

    pub fn forall(params: Vec<Param>, body: Expr<A>) -> Self {
        Expr::Forall {
            params,
            body: Box::new(body),
        }
    }

    pub fn implies(premise: Expr<A>, conclusion: Expr<A>) -> Self {
        Expr::Implies(Box::new(premise), Box::new(conclusion))
    }

    pub fn when(condition: Expr<A>, effect: Expr<A>) -> Self {
        Expr::When(Box::new(condition), Box::new(effect))
    }

    /// The empty expression, `()` in surface syntax.
    pub fn empty() -> Self {
        Expr::And(Vec::new())
    }

    /// Reserved operator of this node, `None` for predicate applications.
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expr::Pred { .. } => None,
            Expr::And(_) => Some(Operator::And),
            Expr::Or(_) => Some(Operator::Or),
            Expr::Not(_) => Some(Operator::Not),
            Expr::Exists { .. } => Some(Operator::Exists),
            Expr::Forall { .. } => Some(Operator::Forall),
            Expr::Implies(..) => Some(Operator::Implies),
            Expr::When(..) => Some(Operator::When),
            Expr::Equal { .. } => Some(Operator::Equal),
        }
    }

    /// First element of the surface form: an operator keyword or a predicate name.
    pub fn prefix(&self) -> &str {
        match self {
            Expr::Pred { name, .. } => name,
            other => other.operator().map(Operator::keyword).unwrap_or_default(),
        }
    }

    pub fn is_head(&self) -> bool {
        matches!(self, Expr::Pred { .. })
    }
}
