//! Structural substitution over reference-space expressions.
//!
//! Used both to instantiate a schema (formal parameters to bound references)
//! and to resolve optimistic objects (placeholder to concrete object) across
//! every live fact and plan step in one pass.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::evaluation::{Evaluation, Head};
use crate::expr::{Expr, Param, Rhs};
use crate::plan::PlanStep;
use crate::term::Term;

/// Reference-to-reference mapping applied by substitution.
pub type Mapping = IndexMap<Term, Term>;

pub fn substitute_term(term: &Term, mapping: &Mapping) -> Term {
    mapping.get(term).cloned().unwrap_or_else(|| term.clone())
}

/// Rewrite every mapped leaf of `expr`.
///
/// Unmapped leaves pass through and every node keeps its arity and child
/// order. Substitution is capture-avoiding: a variable bound by a quantifier
/// shadows any mapping for the same name within its body, and a bound
/// variable that a mapped-in variable would collide with is renamed first.
pub fn substitute(expr: &Expr<Term>, mapping: &Mapping) -> Expr<Term> {
    if mapping.is_empty() {
        return expr.clone();
    }
    match expr {
        Expr::Pred { name, args } => Expr::Pred {
            name: name.clone(),
            args: args.iter().map(|arg| substitute_term(arg, mapping)).collect(),
        },
        Expr::And(children) => Expr::And(substitute_all(children, mapping)),
        Expr::Or(children) => Expr::Or(substitute_all(children, mapping)),
        Expr::Not(e) => Expr::Not(Box::new(substitute(e, mapping))),
        Expr::Exists { params, body } => {
            let (params, body) = substitute_binder(params, body, mapping);
            Expr::Exists { params, body }
        }
        Expr::Forall { params, body } => {
            let (params, body) = substitute_binder(params, body, mapping);
            Expr::Forall { params, body }
        }
        Expr::Implies(l, r) => Expr::Implies(
            Box::new(substitute(l, mapping)),
            Box::new(substitute(r, mapping)),
        ),
        Expr::When(l, r) => Expr::When(
            Box::new(substitute(l, mapping)),
            Box::new(substitute(r, mapping)),
        ),
        Expr::Equal { head, value } => Expr::Equal {
            head: Box::new(substitute(head, mapping)),
            value: match value {
                Rhs::Scalar(v) => Rhs::Scalar(v.clone()),
                Rhs::Expr(e) => Rhs::Expr(Box::new(substitute(e, mapping))),
            },
        },
    }
}

fn substitute_all(children: &[Expr<Term>], mapping: &Mapping) -> Vec<Expr<Term>> {
    children
        .iter()
        .map(|child| substitute(child, mapping))
        .collect()
}

fn shadowed(mapping: &Mapping, params: &[Param]) -> Mapping {
    mapping
        .iter()
        .filter(|(key, _)| match key {
            Term::Var(name) => !params.iter().any(|p| &p.name == name),
            _ => true,
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn substitute_binder(
    params: &[Param],
    body: &Expr<Term>,
    mapping: &Mapping,
) -> (Vec<Param>, Box<Expr<Term>>) {
    let mut inner = shadowed(mapping, params);
    let incoming: HashSet<String> = inner
        .values()
        .filter_map(|term| match term {
            Term::Var(name) => Some(name.clone()),
            _ => None,
        })
        .collect();
    if !params.iter().any(|p| incoming.contains(&p.name)) {
        return (params.to_vec(), Box::new(substitute(body, &inner)));
    }

    let mut used = incoming.clone();
    used.extend(params.iter().map(|p| p.name.clone()));
    collect_var_names(body, &mut used);

    let mut renamed = Vec::with_capacity(params.len());
    for param in params {
        if incoming.contains(&param.name) {
            let fresh = fresh_name(&param.name, &used);
            used.insert(fresh.clone());
            inner.insert(Term::var(param.name.clone()), Term::var(fresh.clone()));
            renamed.push(Param {
                name: fresh,
                ty: param.ty.clone(),
            });
        } else {
            renamed.push(param.clone());
        }
    }
    (renamed, Box::new(substitute(body, &inner)))
}

/// Every variable name mentioned or bound anywhere in `expr`.
fn collect_var_names(expr: &Expr<Term>, names: &mut HashSet<String>) {
    expr.for_each_arg(&mut |term| {
        if let Term::Var(name) = term {
            names.insert(name.clone());
        }
    });
    expr.for_each_binder(&mut |params| {
        names.extend(params.iter().map(|p| p.name.clone()));
    });
}

fn fresh_name(base: &str, used: &HashSet<String>) -> String {
    let mut n = 1;
    loop {
        let candidate = format!("{}{}", base, n);
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Apply one mapping to a whole fact list.
pub fn substitute_all_facts(facts: &[Expr<Term>], mapping: &Mapping) -> Vec<Expr<Term>> {
    let result = substitute_all(facts, mapping);
    tracing::debug!(facts = facts.len(), mapping = mapping.len(), "substituted facts");
    result
}

pub fn substitute_head(head: &Head, mapping: &Mapping) -> Head {
    Head {
        function: head.function.clone(),
        args: head
            .args
            .iter()
            .map(|arg| substitute_term(arg, mapping))
            .collect(),
    }
}

pub fn substitute_evaluation(evaluation: &Evaluation, mapping: &Mapping) -> Evaluation {
    Evaluation {
        head: substitute_head(&evaluation.head, mapping),
        value: evaluation.value.clone(),
    }
}

pub fn substitute_evaluations(evaluations: &[Evaluation], mapping: &Mapping) -> Vec<Evaluation> {
    let result: Vec<_> = evaluations
        .iter()
        .map(|evaluation| substitute_evaluation(evaluation, mapping))
        .collect();
    tracing::debug!(
        evaluations = evaluations.len(),
        mapping = mapping.len(),
        "substituted evaluations"
    );
    result
}

pub fn substitute_plan(plan: &[PlanStep<Term>], mapping: &Mapping) -> Vec<PlanStep<Term>> {
    plan.iter()
        .map(|step| PlanStep {
            action: step.action.clone(),
            args: step
                .args
                .iter()
                .map(|arg| substitute_term(arg, mapping))
                .collect(),
        })
        .collect()
}
