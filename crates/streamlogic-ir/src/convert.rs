//! Conversion between raw-value space and reference space.
//!
//! [`to_reference_space`] wraps every argument value into an interned
//! [`Object`](crate::Object); [`to_raw_space`] unwraps references back to the
//! values they were interned from. Inside a quantifier, a string argument that
//! names a bound parameter is a planning variable, not a value, and is kept as
//! [`Term::Var`].

use crate::error::{IrError, IrResult};
use crate::expr::{Expr, Param, Rhs};
use crate::session::Session;
use crate::term::Term;
use crate::value::Value;

/// Rewrite a raw-value expression into reference space.
///
/// The input is never mutated; the only side effect is registry growth.
pub fn to_reference_space(session: &mut Session, expr: &Expr<Value>) -> IrResult<Expr<Term>> {
    let mut bound = Vec::new();
    let converted = wrap_expr(session, expr, &mut bound)?;
    tracing::trace!(expr = %converted, "converted to reference space");
    Ok(converted)
}

/// Convert a list of raw facts, preserving order.
pub fn facts_to_reference_space(
    session: &mut Session,
    facts: &[Expr<Value>],
) -> IrResult<Vec<Expr<Term>>> {
    facts
        .iter()
        .map(|fact| to_reference_space(session, fact))
        .collect()
}

/// Canonical form of a predicate or function name.
pub fn normalize_name(session: &Session, name: &str) -> IrResult<String> {
    if name.is_empty() {
        return Err(IrError::structural("empty predicate name"));
    }
    if session.config().normalize_case {
        Ok(name.to_lowercase())
    } else {
        Ok(name.to_string())
    }
}

fn wrap_expr(
    session: &mut Session,
    expr: &Expr<Value>,
    bound: &mut Vec<String>,
) -> IrResult<Expr<Term>> {
    match expr {
        Expr::Pred { name, args } => {
            let name = normalize_name(session, name)?;
            let args = args
                .iter()
                .map(|arg| wrap_arg(session, arg, bound))
                .collect();
            Ok(Expr::Pred { name, args })
        }
        Expr::And(children) => Ok(Expr::And(wrap_all(session, children, bound)?)),
        Expr::Or(children) => Ok(Expr::Or(wrap_all(session, children, bound)?)),
        Expr::Not(child) => Ok(Expr::Not(Box::new(wrap_expr(session, child, bound)?))),
        Expr::Exists { params, body } => {
            let body = wrap_quantified(session, params, body, bound)?;
            Ok(Expr::Exists {
                params: params.clone(),
                body: Box::new(body),
            })
        }
        Expr::Forall { params, body } => {
            let body = wrap_quantified(session, params, body, bound)?;
            Ok(Expr::Forall {
                params: params.clone(),
                body: Box::new(body),
            })
        }
        Expr::Implies(premise, conclusion) => Ok(Expr::Implies(
            Box::new(wrap_expr(session, premise, bound)?),
            Box::new(wrap_expr(session, conclusion, bound)?),
        )),
        Expr::When(condition, effect) => Ok(Expr::When(
            Box::new(wrap_expr(session, condition, bound)?),
            Box::new(wrap_expr(session, effect, bound)?),
        )),
        Expr::Equal { head, value } => {
            if !head.is_head() {
                return Err(IrError::structural(format!(
                    "left-hand side of '=' must be a function application, found '{}'",
                    head.prefix()
                )));
            }
            let head = wrap_expr(session, head, bound)?;
            let value = match value {
                Rhs::Scalar(v) => Rhs::Scalar(v.clone()),
                Rhs::Expr(e) => Rhs::Expr(Box::new(wrap_expr(session, e, bound)?)),
            };
            Ok(Expr::Equal {
                head: Box::new(head),
                value,
            })
        }
    }
}

fn wrap_all(
    session: &mut Session,
    children: &[Expr<Value>],
    bound: &mut Vec<String>,
) -> IrResult<Vec<Expr<Term>>> {
    children
        .iter()
        .map(|child| wrap_expr(session, child, bound))
        .collect()
}

fn wrap_quantified(
    session: &mut Session,
    params: &[Param],
    body: &Expr<Value>,
    bound: &mut Vec<String>,
) -> IrResult<Expr<Term>> {
    let depth = bound.len();
    bound.extend(params.iter().map(|p| p.name.clone()));
    let result = wrap_expr(session, body, bound);
    bound.truncate(depth);
    result
}

fn wrap_arg(session: &mut Session, arg: &Value, bound: &[String]) -> Term {
    match arg {
        Value::Str(name) if bound.iter().any(|b| b == name) => Term::Var(name.clone()),
        value => Term::Object(session.intern_object(value.clone())),
    }
}

/// Rewrite a reference-space expression back into raw-value space.
///
/// Bound variables turn back into their names; free variables and
/// unresolved placeholders are errors.
pub fn to_raw_space(session: &Session, expr: &Expr<Term>) -> IrResult<Expr<Value>> {
    let mut bound = Vec::new();
    unwrap_expr(session, expr, &mut bound)
}

fn unwrap_expr(
    session: &Session,
    expr: &Expr<Term>,
    bound: &mut Vec<String>,
) -> IrResult<Expr<Value>> {
    match expr {
        Expr::Pred { name, args } => {
            let args = args
                .iter()
                .map(|arg| match arg {
                    Term::Var(v) if bound.contains(v) => Ok(Value::Str(v.clone())),
                    other => value_of_term(session, other),
                })
                .collect::<IrResult<Vec<_>>>()?;
            Ok(Expr::Pred {
                name: name.clone(),
                args,
            })
        }
        Expr::And(children) => Ok(Expr::And(unwrap_all(session, children, bound)?)),
        Expr::Or(children) => Ok(Expr::Or(unwrap_all(session, children, bound)?)),
        Expr::Not(child) => Ok(Expr::Not(Box::new(unwrap_expr(session, child, bound)?))),
        Expr::Exists { params, body } | Expr::Forall { params, body } => {
            let depth = bound.len();
            bound.extend(params.iter().map(|p| p.name.clone()));
            let body = unwrap_expr(session, body, bound);
            bound.truncate(depth);
            let body = Box::new(body?);
            let params = params.clone();
            Ok(match expr {
                Expr::Exists { .. } => Expr::Exists { params, body },
                _ => Expr::Forall { params, body },
            })
        }
        Expr::Implies(l, r) => Ok(Expr::Implies(
            Box::new(unwrap_expr(session, l, bound)?),
            Box::new(unwrap_expr(session, r, bound)?),
        )),
        Expr::When(l, r) => Ok(Expr::When(
            Box::new(unwrap_expr(session, l, bound)?),
            Box::new(unwrap_expr(session, r, bound)?),
        )),
        Expr::Equal { head, value } => {
            let head = Box::new(unwrap_expr(session, head, bound)?);
            let value = match value {
                Rhs::Scalar(v) => Rhs::Scalar(v.clone()),
                Rhs::Expr(e) => Rhs::Expr(Box::new(unwrap_expr(session, e, bound)?)),
            };
            Ok(Expr::Equal { head, value })
        }
    }
}

fn unwrap_all(
    session: &Session,
    children: &[Expr<Term>],
    bound: &mut Vec<String>,
) -> IrResult<Vec<Expr<Value>>> {
    children
        .iter()
        .map(|child| unwrap_expr(session, child, bound))
        .collect()
}

/// Raw value behind a single reference.
pub fn value_of_term(session: &Session, term: &Term) -> IrResult<Value> {
    match term {
        Term::Object(obj) => session.value_of(*obj).cloned(),
        Term::Optimistic(_) => Err(IrError::Unresolved {
            name: session.name(term)?,
        }),
        Term::Var(name) => Err(IrError::structural(format!(
            "free variable '{}' has no raw value",
            name
        ))),
    }
}

pub fn values_from_terms(session: &Session, terms: &[Term]) -> IrResult<Vec<Value>> {
    terms.iter().map(|term| value_of_term(session, term)).collect()
}
