//! Error types for the reference layer.

use thiserror::Error;

use crate::expr::Operator;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("Name '{name}' was never interned as an object or optimistic object")]
    LookupFailure { name: String },
    #[error("State contradiction on {head}: already {existing}, now {conflicting}")]
    StateInconsistency {
        head: String,
        existing: String,
        conflicting: String,
    },
    #[error("Unsupported top-level '{operator}' form; only conjunctions of facts can be flattened")]
    UnsupportedGoalForm { operator: Operator },
    #[error("Malformed expression: {message}")]
    Structural { message: String },
    #[error("Optimistic object '{name}' has no raw value until it is resolved")]
    Unresolved { name: String },
    #[error("Invalid session configuration: {message}")]
    InvalidConfig { message: String },
    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },
    #[error("Snapshot format {found} is incompatible with {expected}")]
    IncompatibleSnapshot { found: String, expected: String },
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl IrError {
    pub(crate) fn structural(message: impl Into<String>) -> Self {
        IrError::Structural {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for IrError {
    fn from(err: serde_json::Error) -> Self {
        IrError::Serialization {
            message: err.to_string(),
        }
    }
}

pub type IrResult<T> = Result<T, IrError>;
