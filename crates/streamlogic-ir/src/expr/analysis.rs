//! Expression analysis (free variables, referenced terms, predicate collection).

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::term::Term;

use super::{Expr, Param, Rhs};

impl<A> Expr<A> {
    /// Count the arity of every predicate applied in this expression.
    pub fn all_predicates(&self) -> IndexMap<String, usize> {
        let mut preds = IndexMap::new();
        self.collect_predicates(&mut preds);
        preds
    }

    fn collect_predicates(&self, preds: &mut IndexMap<String, usize>) {
        match self {
            Expr::Pred { name, args } => {
                preds.entry(name.clone()).or_insert(args.len());
            }
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.collect_predicates(preds);
                }
            }
            Expr::Not(e) | Expr::Exists { body: e, .. } | Expr::Forall { body: e, .. } => {
                e.collect_predicates(preds);
            }
            Expr::Implies(l, r) | Expr::When(l, r) => {
                l.collect_predicates(preds);
                r.collect_predicates(preds);
            }
            Expr::Equal { head, value } => {
                head.collect_predicates(preds);
                if let Rhs::Expr(e) = value {
                    e.collect_predicates(preds);
                }
            }
        }
    }

    /// Visit the parameter list of every quantifier, outermost first.
    pub fn for_each_binder(&self, f: &mut impl FnMut(&[Param])) {
        match self {
            Expr::Pred { .. } => {}
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.for_each_binder(f);
                }
            }
            Expr::Not(e) => e.for_each_binder(f),
            Expr::Exists { params, body } | Expr::Forall { params, body } => {
                f(params.as_slice());
                body.for_each_binder(f);
            }
            Expr::Implies(l, r) | Expr::When(l, r) => {
                l.for_each_binder(f);
                r.for_each_binder(f);
            }
            Expr::Equal { head, value } => {
                head.for_each_binder(f);
                if let Rhs::Expr(e) = value {
                    e.for_each_binder(f);
                }
            }
        }
    }

    /// Visit every leaf argument in depth-first order.
    pub fn for_each_arg(&self, f: &mut impl FnMut(&A)) {
        match self {
            Expr::Pred { args, .. } => args.iter().for_each(|a| f(a)),
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.for_each_arg(f);
                }
            }
            Expr::Not(e) | Expr::Exists { body: e, .. } | Expr::Forall { body: e, .. } => {
                e.for_each_arg(f)
            }
            Expr::Implies(l, r) | Expr::When(l, r) => {
                l.for_each_arg(f);
                r.for_each_arg(f);
            }
            Expr::Equal { head, value } => {
                head.for_each_arg(f);
                if let Rhs::Expr(e) = value {
                    e.for_each_arg(f);
                }
            }
        }
    }
}

impl Expr<Term> {
    /// Variables not bound by an enclosing quantifier.
    pub fn free_vars(&self) -> HashSet<String> {
        let mut vars = HashSet::new();
        self.collect_free_vars(&mut vars, &HashSet::new());
        vars
    }

    fn collect_free_vars(&self, vars: &mut HashSet<String>, bound: &HashSet<String>) {
        match self {
            Expr::Pred { args, .. } => {
                for arg in args {
                    if let Term::Var(v) = arg {
                        if !bound.contains(v) {
                            vars.insert(v.clone());
                        }
                    }
                }
            }
            Expr::And(children) | Expr::Or(children) => {
                for child in children {
                    child.collect_free_vars(vars, bound);
                }
            }
            Expr::Not(e) => e.collect_free_vars(vars, bound),
            Expr::Exists { params, body } | Expr::Forall { params, body } => {
                let mut inner = bound.clone();
                inner.extend(params.iter().map(|p| p.name.clone()));
                body.collect_free_vars(vars, &inner);
            }
            Expr::Implies(l, r) | Expr::When(l, r) => {
                l.collect_free_vars(vars, bound);
                r.collect_free_vars(vars, bound);
            }
            Expr::Equal { head, value } => {
                head.collect_free_vars(vars, bound);
                if let Rhs::Expr(e) = value {
                    e.collect_free_vars(vars, bound);
                }
            }
        }
    }

    /// Objects and optimistic objects referenced anywhere, in first-seen order.
    pub fn references(&self) -> IndexSet<Term> {
        let mut terms = IndexSet::new();
        self.for_each_arg(&mut |term| {
            if !term.is_var() {
                terms.insert(term.clone());
            }
        });
        terms
    }
}
