//! Decoding plans returned by the external solver.
//!
//! The solver answers with one `(action arg ...)` form per step, using the
//! registry names it was given. Decoding maps those names back to references
//! and then to raw values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::values_from_terms;
use crate::error::{IrError, IrResult};
use crate::evaluation::{init_from_evaluations, Evaluation};
use crate::expr::Expr;
use crate::session::Session;
use crate::surface::Surface;
use crate::term::Term;
use crate::value::Value;

/// One plan step: an action name applied to arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanStep<A> {
    pub action: String,
    pub args: Vec<A>,
}

impl<A> PlanStep<A> {
    pub fn new(action: impl Into<String>, args: Vec<A>) -> Self {
        PlanStep {
            action: action.into(),
            args,
        }
    }
}

impl<A: fmt::Display> fmt::Display for PlanStep<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.action)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        write!(f, ")")
    }
}

/// Read the solver's plan text into named steps.
///
/// Comment lines (`; cost = 3 (unit cost)`) are ignored.
pub fn parse_plan(text: &str) -> IrResult<Vec<PlanStep<String>>> {
    Surface::parse_all(text)?
        .iter()
        .map(|form| {
            let items = form.as_list().ok_or_else(|| {
                IrError::structural(format!("plan step must be a list, found {}", form))
            })?;
            let mut atoms = items.iter().map(|item| {
                item.as_atom().map(str::to_string).ok_or_else(|| {
                    IrError::structural(format!("plan step {} has a nested argument", form))
                })
            });
            let action = atoms
                .next()
                .ok_or_else(|| IrError::structural("empty plan step"))??;
            Ok(PlanStep::new(action, atoms.collect::<IrResult<Vec<_>>>()?))
        })
        .collect()
}

/// Cost reported in a `; cost = N` comment, if any.
pub fn parse_plan_cost(text: &str) -> Option<f64> {
    text.lines().find_map(|line| {
        let comment = line.trim().strip_prefix(';')?.trim();
        let rest = comment.strip_prefix("cost")?.trim_start().strip_prefix('=')?;
        rest.split_whitespace().next()?.parse().ok()
    })
}

/// Map every argument name back to the reference it was rendered from.
///
/// Fails with [`IrError::LookupFailure`] on a name this session never handed
/// out.
pub fn decode_plan(session: &Session, plan: &[PlanStep<String>]) -> IrResult<Vec<PlanStep<Term>>> {
    let decoded = plan
        .iter()
        .map(|step| {
            let args = step
                .args
                .iter()
                .map(|name| session.lookup_by_name(name))
                .collect::<IrResult<Vec<_>>>()?;
            Ok(PlanStep::new(step.action.clone(), args))
        })
        .collect::<IrResult<Vec<_>>>()?;
    tracing::debug!(steps = decoded.len(), "decoded plan");
    Ok(decoded)
}

/// Unwrap every plan argument to its raw value.
pub fn value_plan(session: &Session, plan: &[PlanStep<Term>]) -> IrResult<Vec<PlanStep<Value>>> {
    plan.iter()
        .map(|step| {
            Ok(PlanStep::new(
                step.action.clone(),
                values_from_terms(session, &step.args)?,
            ))
        })
        .collect()
}

/// A plan and its initial state, back in raw-value space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// `None` when no plan was found
    pub plan: Option<Vec<PlanStep<Value>>>,
    pub cost: Option<f64>,
    pub init: Vec<Expr<Value>>,
}

pub fn revert_solution(
    session: &Session,
    plan: Option<&[PlanStep<Term>]>,
    cost: Option<f64>,
    evaluations: &[Evaluation],
) -> IrResult<Solution> {
    Ok(Solution {
        plan: plan.map(|plan| value_plan(session, plan)).transpose()?,
        cost,
        init: init_from_evaluations(session, evaluations)?,
    })
}
