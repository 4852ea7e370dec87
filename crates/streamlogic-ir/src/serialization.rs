//! Versioned session snapshots.
//!
//! A snapshot stores both registries in interning order, so a session restored
//! in another process hands out the same names for the same values. This is
//! what lets a plan rendered by one process be decoded by another.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::{IrError, IrResult};
use crate::object::{Placeholder, Reference};
use crate::session::Session;
use crate::value::Value;

/// Current snapshot format version
pub const FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Format version (semver)
    pub version: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: Option<String>,
    pub config: SessionConfig,
    /// Object values; position is the object index
    pub objects: Vec<Value>,
    /// Optimistic placeholders; position is the index
    pub placeholders: Vec<Placeholder>,
}

impl SessionSnapshot {
    /// Fails if a value holds a non-finite float, which JSON cannot represent.
    pub fn to_json_pretty(&self) -> IrResult<String> {
        let placeholder_values = self.placeholders.iter().filter_map(|p| match p {
            Placeholder::Value(value) => Some(value),
            Placeholder::Output(_) => None,
        });
        if let Some(value) = self
            .objects
            .iter()
            .chain(placeholder_values)
            .find(|value| !value.is_finite())
        {
            return Err(IrError::Serialization {
                message: format!("non-finite float in {} has no JSON form", value),
            });
        }
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Major versions must match.
    pub fn is_compatible(&self) -> bool {
        let major = |version: &str| {
            version
                .split('.')
                .next()
                .and_then(|s| s.parse::<u32>().ok())
        };
        major(&self.version).is_some() && major(&self.version) == major(FORMAT_VERSION)
    }
}

impl Session {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: FORMAT_VERSION.to_string(),
            created_at: Some(chrono::Utc::now().to_rfc3339()),
            config: self.config().clone(),
            objects: self.objects().keys().cloned().collect(),
            placeholders: self.optimistic().keys().cloned().collect(),
        }
    }

    /// Rebuild a session, re-interning every entry at its recorded index.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> IrResult<Self> {
        if !snapshot.is_compatible() {
            return Err(IrError::IncompatibleSnapshot {
                found: snapshot.version.clone(),
                expected: FORMAT_VERSION.to_string(),
            });
        }
        let mut session = Session::with_config(snapshot.config.clone())?;
        for (index, value) in snapshot.objects.iter().enumerate() {
            if session.intern_object(value.clone()).index() != index {
                return Err(IrError::Serialization {
                    message: format!("object {} duplicates an earlier value: {}", index, value),
                });
            }
        }
        for (index, placeholder) in snapshot.placeholders.iter().enumerate() {
            let opt = match placeholder {
                Placeholder::Value(value) => session.intern_optimistic(value.clone()),
                Placeholder::Output(call) => session.intern_optimistic_for(call.clone()),
            };
            if opt.index() != index {
                return Err(IrError::Serialization {
                    message: format!("placeholder {} duplicates an earlier entry", index),
                });
            }
        }
        tracing::debug!(
            objects = session.objects().len(),
            optimistic = session.optimistic().len(),
            "restored session snapshot"
        );
        Ok(session)
    }

    pub fn to_json(&self) -> IrResult<String> {
        self.snapshot().to_json_pretty()
    }

    pub fn from_json(json: &str) -> IrResult<Self> {
        Self::from_snapshot(&SessionSnapshot::from_json(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::StreamCall;
    use crate::term::Term;

    fn populated() -> Session {
        let mut session = Session::new();
        let q = session.intern_object(vec![0.0, 1.5]);
        session.intern_object("cup");
        session.intern_object(3);
        session.intern_optimistic("grasp");
        session.intern_optimistic_for(StreamCall::new("ik", vec![Term::Object(q)], 1));
        session
    }

    #[test]
    fn test_snapshot_creation() {
        let snapshot = populated().snapshot();
        assert_eq!(snapshot.version, FORMAT_VERSION);
        assert!(snapshot.created_at.is_some());
        assert_eq!(snapshot.objects.len(), 3);
        assert_eq!(snapshot.placeholders.len(), 2);
    }

    #[test]
    fn test_json_roundtrip_preserves_names() {
        let session = populated();
        let restored = Session::from_json(&session.to_json().unwrap()).unwrap();

        for name in ["v0", "v1", "v2", "#o0", "#o1"] {
            let original = session.lookup_by_name(name).unwrap();
            let term = restored.lookup_by_name(name).unwrap();
            assert_eq!(original, term);
        }
        let obj = restored.lookup_by_name("v0").unwrap().as_object().unwrap();
        assert_eq!(
            restored.value_of(obj).unwrap(),
            &Value::from(vec![0.0, 1.5])
        );
        let opt = restored.lookup_by_name("#o1").unwrap().as_optimistic().unwrap();
        assert_eq!(restored.provenance(opt).unwrap().unwrap().stream, "ik");
    }

    #[test]
    fn test_version_compatibility() {
        let mut snapshot = populated().snapshot();
        assert!(snapshot.is_compatible());

        snapshot.version = "2.0.0".to_string();
        assert!(!snapshot.is_compatible());
        assert!(matches!(
            Session::from_snapshot(&snapshot),
            Err(IrError::IncompatibleSnapshot { .. })
        ));
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let mut snapshot = populated().snapshot();
        snapshot.objects.push(Value::str("cup"));
        assert!(matches!(
            Session::from_snapshot(&snapshot),
            Err(IrError::Serialization { .. })
        ));
    }

    #[test]
    fn test_non_finite_floats_refused() {
        use crate::convert::to_reference_space;
        use crate::expr::Expr;
        use crate::surface::Surface;

        // Signed infinities read from text stay symbols and survive the round trip
        let fact = Expr::<Value>::from_surface(&Surface::parse("(at cup -inf)").unwrap()).unwrap();
        let mut session = Session::new();
        to_reference_space(&mut session, &fact).unwrap();
        let restored = Session::from_json(&session.to_json().unwrap()).unwrap();
        let obj = restored.lookup_by_name("v1").unwrap().as_object().unwrap();
        assert_eq!(restored.value_of(obj).unwrap(), &Value::str("-inf"));

        // A float built in code is refused rather than written as null
        session.intern_object(vec![0.0, f64::INFINITY]);
        assert!(matches!(
            session.to_json(),
            Err(IrError::Serialization { .. })
        ));

        let mut session = Session::new();
        session.intern_optimistic(f64::NAN);
        assert!(matches!(
            session.to_json(),
            Err(IrError::Serialization { .. })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Session::from_json("{not json"),
            Err(IrError::Serialization { .. })
        ));
    }
}
