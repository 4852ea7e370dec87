//! Evaluations: the planner's flattened internal fact representation.
//!
//! A fact in reference space is classified into an [`Evaluation`], a
//! `(Head, value)` pair. `true` encodes a positive atom, `false` a negated atom
//! and any other value a fluent assignment.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::convert::{to_reference_space, values_from_terms};
use crate::error::{IrError, IrResult};
use crate::expr::{Expr, Rhs};
use crate::session::Session;
use crate::term::Term;
use crate::value::Value;

/// A function name applied to an ordered tuple of references.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Head {
    pub function: String,
    pub args: Vec<Term>,
}

impl Head {
    pub fn new(function: impl Into<String>, args: Vec<Term>) -> Self {
        Head {
            function: function.into(),
            args,
        }
    }

    /// The head as a predicate application.
    pub fn to_expr(&self) -> Expr<Term> {
        Expr::pred(self.function.clone(), self.args.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evaluation {
    pub head: Head,
    pub value: Value,
}

impl Evaluation {
    pub fn new(head: Head, value: impl Into<Value>) -> Self {
        Evaluation {
            head,
            value: value.into(),
        }
    }

    pub fn atom(head: Head) -> Self {
        Self::new(head, true)
    }

    pub fn negated_atom(head: Head) -> Self {
        Self::new(head, false)
    }

    pub fn is_atom(&self) -> bool {
        self.value == Value::Bool(true)
    }

    pub fn is_negated_atom(&self) -> bool {
        self.value == Value::Bool(false)
    }
}

/// Head→value mapping of one consistent state snapshot.
pub type State = IndexMap<Head, Value>;

/// Canonical head of a fact, looking through a leading `not` or `=`.
pub fn head_from_fact(fact: &Expr<Term>) -> IrResult<Head> {
    match fact {
        Expr::Pred { name, args } => Ok(Head::new(name.clone(), args.clone())),
        Expr::Not(inner) => head_of_atom(inner),
        Expr::Equal { head, .. } => head_of_atom(head),
        other => Err(IrError::structural(format!(
            "'{}' expression has no head",
            other.prefix()
        ))),
    }
}

fn head_of_atom(expr: &Expr<Term>) -> IrResult<Head> {
    match expr {
        Expr::Pred { name, args } => Ok(Head::new(name.clone(), args.clone())),
        other => Err(IrError::structural(format!(
            "expected a predicate application, found '{}'",
            other.prefix()
        ))),
    }
}

/// Classify a reference-space fact.
///
/// `(= head v)` becomes a fluent evaluation, `(not head)` a negated atom and
/// a bare predicate application a positive atom. The right-hand side of `=`
/// must be a scalar.
pub fn evaluation_from_fact(fact: &Expr<Term>) -> IrResult<Evaluation> {
    match fact {
        Expr::Equal { head, value } => {
            let head = head_of_atom(head)?;
            match value {
                Rhs::Scalar(v) => Ok(Evaluation::new(head, v.clone())),
                Rhs::Expr(e) => Err(IrError::structural(format!(
                    "fluent {} is assigned the compound value {}",
                    head, e
                ))),
            }
        }
        Expr::Not(inner) => Ok(Evaluation::negated_atom(head_of_atom(inner)?)),
        other => Ok(Evaluation::atom(head_of_atom(other)?)),
    }
}

/// Convert raw initial facts and classify each one, preserving order.
pub fn evaluations_from_init(
    session: &mut Session,
    init: &[Expr<Value>],
) -> IrResult<Vec<Evaluation>> {
    init.iter()
        .map(|fact| evaluation_from_fact(&to_reference_space(session, fact)?))
        .collect()
}

/// Reference-space fact for an evaluation.
pub fn fact_from_evaluation(evaluation: &Evaluation) -> Expr<Term> {
    let head = evaluation.head.to_expr();
    if evaluation.is_atom() {
        head
    } else if evaluation.is_negated_atom() {
        Expr::negate(head)
    } else {
        Expr::equal(head, evaluation.value.clone())
    }
}

/// Raw-space fact for an evaluation; every argument is unwrapped.
pub fn raw_fact_from_evaluation(
    session: &Session,
    evaluation: &Evaluation,
) -> IrResult<Expr<Value>> {
    let head = Expr::pred(
        evaluation.head.function.clone(),
        values_from_terms(session, &evaluation.head.args)?,
    );
    Ok(if evaluation.is_atom() {
        head
    } else if evaluation.is_negated_atom() {
        Expr::negate(head)
    } else {
        Expr::equal(head, evaluation.value.clone())
    })
}

pub fn init_from_evaluations(
    session: &Session,
    evaluations: &[Evaluation],
) -> IrResult<Vec<Expr<Value>>> {
    evaluations
        .iter()
        .map(|evaluation| raw_fact_from_evaluation(session, evaluation))
        .collect()
}

/// Fold evaluations into a state, failing on contradicting values.
///
/// Repeating an evaluation with the same value is allowed.
pub fn state_from_evaluations<'a>(
    evaluations: impl IntoIterator<Item = &'a Evaluation>,
) -> IrResult<State> {
    let mut state = State::new();
    for evaluation in evaluations {
        if let Some(existing) = state.get(&evaluation.head) {
            if *existing != evaluation.value {
                return Err(IrError::StateInconsistency {
                    head: evaluation.head.to_string(),
                    existing: existing.to_string(),
                    conflicting: evaluation.value.to_string(),
                });
            }
            continue;
        }
        state.insert(evaluation.head.clone(), evaluation.value.clone());
    }
    Ok(state)
}

/// Every argument referenced by the heads of `evaluations`.
pub fn objects_from_evaluations<'a>(
    evaluations: impl IntoIterator<Item = &'a Evaluation>,
) -> IndexSet<Term> {
    evaluations
        .into_iter()
        .flat_map(|evaluation| evaluation.head.args.iter().cloned())
        .collect()
}
