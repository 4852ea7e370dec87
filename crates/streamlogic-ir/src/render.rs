//! Rendering of reference-space expressions for the external solver.
//!
//! Every reference is written as its stable registry name, so the solver
//! sees `v3` or `#o1` where the caller had a pose or a pending sample.

use indexmap::IndexSet;

use crate::error::IrResult;
use crate::expr::{Expr, Param, Rhs};
use crate::session::Session;
use crate::surface::Surface;
use crate::term::Term;
use crate::value::Value;

/// Render a reference-space expression as a surface tree.
pub fn render_surface(session: &Session, expr: &Expr<Term>) -> IrResult<Surface> {
    match expr {
        Expr::Pred { name, args } => {
            let mut items = Vec::with_capacity(args.len() + 1);
            items.push(Surface::atom(name.clone()));
            for arg in args {
                items.push(Surface::Atom(session.name(arg)?));
            }
            Ok(Surface::List(items))
        }
        Expr::And(children) | Expr::Or(children) => {
            let mut items = vec![Surface::atom(expr.prefix())];
            for child in children {
                items.push(render_surface(session, child)?);
            }
            Ok(Surface::List(items))
        }
        Expr::Not(e) => Ok(Surface::List(vec![
            Surface::atom("not"),
            render_surface(session, e)?,
        ])),
        Expr::Exists { params, body } | Expr::Forall { params, body } => Ok(Surface::List(vec![
            Surface::atom(expr.prefix()),
            render_params(params),
            render_surface(session, body)?,
        ])),
        Expr::Implies(l, r) | Expr::When(l, r) => Ok(Surface::List(vec![
            Surface::atom(expr.prefix()),
            render_surface(session, l)?,
            render_surface(session, r)?,
        ])),
        Expr::Equal { head, value } => Ok(Surface::List(vec![
            Surface::atom("="),
            render_surface(session, head)?,
            match value {
                Rhs::Scalar(v) => v.to_surface(),
                Rhs::Expr(e) => render_surface(session, e)?,
            },
        ])),
    }
}

/// Render a raw-space expression; values are written as-is.
pub fn render_raw(expr: &Expr<Value>) -> Surface {
    match expr {
        Expr::Pred { name, args } => {
            let mut items = vec![Surface::atom(name.clone())];
            items.extend(args.iter().map(Value::to_surface));
            Surface::List(items)
        }
        Expr::And(children) | Expr::Or(children) => {
            let mut items = vec![Surface::atom(expr.prefix())];
            items.extend(children.iter().map(render_raw));
            Surface::List(items)
        }
        Expr::Not(e) => Surface::List(vec![Surface::atom("not"), render_raw(e)]),
        Expr::Exists { params, body } | Expr::Forall { params, body } => Surface::List(vec![
            Surface::atom(expr.prefix()),
            render_params(params),
            render_raw(body),
        ]),
        Expr::Implies(l, r) | Expr::When(l, r) => Surface::List(vec![
            Surface::atom(expr.prefix()),
            render_raw(l),
            render_raw(r),
        ]),
        Expr::Equal { head, value } => Surface::List(vec![
            Surface::atom("="),
            render_raw(head),
            match value {
                Rhs::Scalar(v) => v.to_surface(),
                Rhs::Expr(e) => render_raw(e),
            },
        ]),
    }
}

fn render_params(params: &[Param]) -> Surface {
    let mut items = Vec::new();
    for param in params {
        items.push(Surface::atom(param.name.clone()));
        if let Some(ty) = &param.ty {
            items.push(Surface::atom("-"));
            items.push(Surface::atom(ty.clone()));
        }
    }
    Surface::List(items)
}

/// Emit a complete problem definition.
///
/// The `:objects` section lists every reference mentioned by `init` or
/// `goal`, in first-seen order.
pub fn render_problem(
    session: &Session,
    name: &str,
    domain: &str,
    init: &[Expr<Term>],
    goal: &Expr<Term>,
) -> IrResult<String> {
    let mut objects: IndexSet<Term> = IndexSet::new();
    for fact in init {
        objects.extend(fact.references());
    }
    objects.extend(goal.references());

    let mut out = String::new();
    out.push_str(&format!("(define (problem {})\n", name));
    out.push_str(&format!("  (:domain {})\n", domain));

    out.push_str("  (:objects");
    for object in &objects {
        out.push(' ');
        out.push_str(&session.name(object)?);
    }
    out.push_str(")\n");

    out.push_str("  (:init");
    for fact in init {
        out.push_str("\n    ");
        out.push_str(&render_surface(session, fact)?.to_string());
    }
    out.push_str(")\n");

    out.push_str(&format!("  (:goal {}))\n", render_surface(session, goal)?));
    tracing::debug!(
        problem = name,
        objects = objects.len(),
        facts = init.len(),
        "rendered problem"
    );
    Ok(out)
}
