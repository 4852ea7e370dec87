//! Session configuration.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};

/// Naming and normalization settings for one planning session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name prefix of resolved objects (`v0`, `v1`, ...)
    pub object_prefix: String,

    /// Name prefix of optimistic objects (`#o0`, `#o1`, ...)
    pub optimistic_prefix: String,

    /// Lowercase predicate and function names during conversion
    pub normalize_case: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            object_prefix: "v".to_string(),
            optimistic_prefix: "#o".to_string(),
            normalize_case: true,
        }
    }
}

impl SessionConfig {
    /// Check that the two name spaces can never produce the same name.
    ///
    /// Names are `prefix + index`, so two names can only coincide if one
    /// prefix starts with the other.
    pub fn validate(&self) -> IrResult<()> {
        for (label, prefix) in [
            ("object_prefix", &self.object_prefix),
            ("optimistic_prefix", &self.optimistic_prefix),
        ] {
            if prefix.is_empty() {
                return Err(IrError::InvalidConfig {
                    message: format!("{} must not be empty", label),
                });
            }
            if prefix
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | ';' | '?'))
            {
                return Err(IrError::InvalidConfig {
                    message: format!("{} '{}' contains a reserved character", label, prefix),
                });
            }
        }

        if self.object_prefix.starts_with(&self.optimistic_prefix)
            || self.optimistic_prefix.starts_with(&self.object_prefix)
        {
            return Err(IrError::InvalidConfig {
                message: format!(
                    "prefixes '{}' and '{}' overlap",
                    self.object_prefix, self.optimistic_prefix
                ),
            });
        }
        Ok(())
    }
}
