//! Terms: the leaves of reference-space expressions.

use serde::{Deserialize, Serialize};

use crate::object::{Object, OptimisticObject};

/// A leaf of a reference-space expression.
///
/// Planning parameters (`?q`) stay variables; every value is replaced by an
/// interned reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Var(String),
    Object(Object),
    Optimistic(OptimisticObject),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(name.into())
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }

    pub fn as_object(&self) -> Option<Object> {
        match self {
            Term::Object(obj) => Some(*obj),
            _ => None,
        }
    }

    pub fn as_optimistic(&self) -> Option<OptimisticObject> {
        match self {
            Term::Optimistic(opt) => Some(*opt),
            _ => None,
        }
    }
}

impl From<Object> for Term {
    fn from(obj: Object) -> Self {
        Term::Object(obj)
    }
}

impl From<OptimisticObject> for Term {
    fn from(opt: OptimisticObject) -> Self {
        Term::Optimistic(opt)
    }
}
