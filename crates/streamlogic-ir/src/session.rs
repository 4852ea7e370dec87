//! Planning session: the owner of both interning registries.
//!
//! Identity only holds within one session. Two independent planning runs
//! should use two sessions (or [`Session::reset`] in between) so that objects
//! from one problem never leak into another.

use crate::config::SessionConfig;
use crate::error::{IrError, IrResult};
use crate::object::{
    Object, ObjectRegistry, OptimisticObject, OptimisticRegistry, Placeholder,
};
use crate::stream::StreamCall;
use crate::substitution::Mapping;
use crate::term::Term;
use crate::value::Value;

#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    objects: ObjectRegistry,
    optimistic: OptimisticRegistry,
}

impl Session {
    /// Create a session with the default configuration.
    pub fn new() -> Self {
        Self::build(SessionConfig::default())
    }

    /// Create a session after validating `config`.
    pub fn with_config(config: SessionConfig) -> IrResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SessionConfig) -> Self {
        Session {
            objects: ObjectRegistry::new(config.object_prefix.clone()),
            optimistic: OptimisticRegistry::new(config.optimistic_prefix.clone()),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn optimistic(&self) -> &OptimisticRegistry {
        &self.optimistic
    }

    /// Forget every interned reference.
    pub fn reset(&mut self) {
        tracing::debug!(
            objects = self.objects.len(),
            optimistic = self.optimistic.len(),
            "resetting session"
        );
        self.objects.clear();
        self.optimistic.clear();
    }

    pub fn intern_object(&mut self, value: impl Into<Value>) -> Object {
        self.objects.intern(&value.into())
    }

    pub fn objects_from_values(&mut self, values: impl IntoIterator<Item = Value>) -> Vec<Object> {
        values
            .into_iter()
            .map(|value| self.objects.intern(&value))
            .collect()
    }

    pub fn intern_optimistic(&mut self, value: impl Into<Value>) -> OptimisticObject {
        self.optimistic.intern(&Placeholder::Value(value.into()))
    }

    pub fn opt_from_values(
        &mut self,
        values: impl IntoIterator<Item = Value>,
    ) -> Vec<OptimisticObject> {
        values
            .into_iter()
            .map(|value| self.optimistic.intern(&Placeholder::Value(value)))
            .collect()
    }

    /// Placeholder for one output of a pending stream call.
    ///
    /// The same call always yields the same placeholder.
    pub fn intern_optimistic_for(&mut self, call: StreamCall) -> OptimisticObject {
        self.optimistic.intern(&Placeholder::Output(call))
    }

    pub fn value_of(&self, obj: Object) -> IrResult<&Value> {
        self.objects.key(obj)
    }

    pub fn placeholder(&self, opt: OptimisticObject) -> IrResult<&Placeholder> {
        self.optimistic.key(opt)
    }

    /// The stream call an optimistic object stands for, if it has one.
    pub fn provenance(&self, opt: OptimisticObject) -> IrResult<Option<&StreamCall>> {
        Ok(self.optimistic.key(opt)?.provenance())
    }

    /// Solver-facing name of a term. Variables keep their own name.
    pub fn name(&self, term: &Term) -> IrResult<String> {
        match term {
            Term::Var(name) => Ok(name.clone()),
            Term::Object(obj) => self.objects.name(*obj),
            Term::Optimistic(opt) => self.optimistic.name(*opt),
        }
    }

    /// Resolve a name returned by the external solver.
    pub fn lookup_by_name(&self, name: &str) -> IrResult<Term> {
        if let Ok(obj) = self.objects.lookup_by_name(name) {
            return Ok(Term::Object(obj));
        }
        if let Ok(opt) = self.optimistic.lookup_by_name(name) {
            return Ok(Term::Optimistic(opt));
        }
        Err(IrError::LookupFailure {
            name: name.to_string(),
        })
    }

    /// Intern freshly produced values and map each placeholder to its object.
    ///
    /// `placeholders[i]` is resolved to the object interned for `outputs[i]`.
    pub fn resolve_outputs(
        &mut self,
        placeholders: &[OptimisticObject],
        outputs: &[Value],
    ) -> IrResult<Mapping> {
        if placeholders.len() != outputs.len() {
            return Err(IrError::structural(format!(
                "{} placeholders cannot be resolved by {} outputs",
                placeholders.len(),
                outputs.len()
            )));
        }
        let mut mapping = Mapping::new();
        for (placeholder, value) in placeholders.iter().zip(outputs) {
            // Fails for placeholders this session never handed out
            self.optimistic.key(*placeholder)?;
            let obj = self.objects.intern(value);
            mapping.insert(Term::Optimistic(*placeholder), Term::Object(obj));
        }
        tracing::debug!(resolved = mapping.len(), "resolved optimistic outputs");
        Ok(mapping)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
