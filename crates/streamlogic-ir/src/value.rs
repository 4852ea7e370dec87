//! Raw domain values carried by planning facts.
//!
//! A [`Value`] is whatever the caller puts into an initial fact or receives
//! from a stream: an integer, a pose, a joint configuration. Values are
//! hashable so that equal values always intern to the same [`Object`](crate::Object).

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Str(String),
    /// Tuples such as poses and configurations
    List(Vec<Value>),
}

impl Value {
    pub fn float(value: f64) -> Self {
        Value::Float(OrderedFloat(value))
    }

    pub fn str(value: impl Into<String>) -> Self {
        Value::Str(value.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// False if any float inside is infinite or NaN.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(f) => f.is_finite(),
            Value::List(items) => items.iter().all(Value::is_finite),
            _ => true,
        }
    }

    /// Read a single surface token as a scalar value.
    ///
    /// `true`/`false` become booleans, numeric literals become integers or
    /// finite floats, anything else is kept as a string.
    pub fn parse_atom(token: &str) -> Self {
        match token {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
        let numeric_start = token
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
        if numeric_start {
            if let Ok(f) = token.parse::<f64>() {
                if f.is_finite() {
                    return Value::float(f);
                }
            }
        }
        Value::Str(token.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::List(value.into_iter().map(Value::float).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_atom() {
        assert_eq!(Value::parse_atom("true"), Value::Bool(true));
        assert_eq!(Value::parse_atom("42"), Value::Int(42));
        assert_eq!(Value::parse_atom("-1.5"), Value::float(-1.5));
        assert_eq!(Value::parse_atom("sink"), Value::str("sink"));
        // Not numeric literals even though f64 would accept them
        assert_eq!(Value::parse_atom("inf"), Value::str("inf"));
        assert_eq!(Value::parse_atom("NaN"), Value::str("NaN"));
        assert_eq!(Value::parse_atom("-inf"), Value::str("-inf"));
        assert_eq!(Value::parse_atom("+inf"), Value::str("+inf"));
        assert_eq!(Value::parse_atom("-nan"), Value::str("-nan"));
        assert_eq!(Value::parse_atom("1e999"), Value::str("1e999"));
    }

    #[test]
    fn test_is_finite() {
        assert!(Value::from(vec![0.5, -2.0]).is_finite());
        assert!(Value::str("inf").is_finite());
        assert!(!Value::float(f64::NEG_INFINITY).is_finite());
        assert!(!Value::list([Value::Int(1), Value::float(f64::NAN)]).is_finite());
    }

    #[test]
    fn test_float_values_hash_consistently() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(Value::float(0.25));
        set.insert(Value::float(0.25));
        set.insert(Value::from(vec![0.25, 0.5]));
        set.insert(Value::from(vec![0.25, 0.5]));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_untagged_json() {
        let value = Value::list([Value::Int(1), Value::float(2.5), Value::str("a")]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"[1,2.5,"a"]"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
