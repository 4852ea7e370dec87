//! Conjunction flattening for init and goal expressions.

use crate::error::{IrError, IrResult};
use crate::expr::{Expr, Operator};

/// Decompose a (nested) conjunction into an ordered list of facts.
///
/// `and` nodes are flattened at any depth; an empty conjunction yields no
/// facts. Any other conjunct is kept verbatim, except that `or`, `not`,
/// quantifiers and `=` are refused at the top level of a conjunct.
pub fn flatten_conjunction<A: Clone>(expr: &Expr<A>) -> IrResult<Vec<Expr<A>>> {
    let mut facts = Vec::new();
    collect_conjuncts(expr, &mut facts)?;
    Ok(facts)
}

fn collect_conjuncts<A: Clone>(expr: &Expr<A>, facts: &mut Vec<Expr<A>>) -> IrResult<()> {
    if let Expr::And(children) = expr {
        for child in children {
            collect_conjuncts(child, facts)?;
        }
        return Ok(());
    }
    match expr.operator() {
        Some(
            operator @ (Operator::Or
            | Operator::Not
            | Operator::Exists
            | Operator::Forall
            | Operator::Equal),
        ) => Err(IrError::UnsupportedGoalForm { operator }),
        _ => {
            facts.push(expr.clone());
            Ok(())
        }
    }
}
