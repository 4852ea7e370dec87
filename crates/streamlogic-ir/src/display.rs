//! Display trait implementations for IR types.
//!
//! Provides human-readable string representations for debugging, log events
//! and error messages. Solver-facing text goes through [`crate::render`]
//! instead, which needs the session to name references.

use std::fmt;

use crate::{
    evaluation::{Evaluation, Head},
    expr::{Expr, Param, Rhs},
    object::Reference,
    term::Term,
    value::Value,
};

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::Object(obj) => write!(f, "@{}", obj.index()),
            Term::Optimistic(opt) => write!(f, "#{}", opt.index()),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{} - {}", self.name, ty),
            None => write!(f, "{}", self.name),
        }
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    write!(f, "(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", param)?;
    }
    write!(f, ")")
}

impl<A: fmt::Display> fmt::Display for Expr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Pred { name, args } => {
                write!(f, "({}", name)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Expr::And(children) | Expr::Or(children) => {
                write!(f, "({}", self.prefix())?;
                for child in children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
            Expr::Not(e) => write!(f, "(not {})", e),
            Expr::Exists { params, body } | Expr::Forall { params, body } => {
                write!(f, "({} ", self.prefix())?;
                write_params(f, params)?;
                write!(f, " {})", body)
            }
            Expr::Implies(l, r) | Expr::When(l, r) => {
                write!(f, "({} {} {})", self.prefix(), l, r)
            }
            Expr::Equal { head, value } => match value {
                Rhs::Scalar(v) => write!(f, "(= {} {})", head, v),
                Rhs::Expr(e) => write!(f, "(= {} {})", head, e),
            },
        }
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_atom() {
            write!(f, "{}", self.head)
        } else if self.is_negated_atom() {
            write!(f, "¬{}", self.head)
        } else {
            write!(f, "{} = {}", self.head, self.value)
        }
    }
}
