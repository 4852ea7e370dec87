//! Interned references and the registries that own them.
//!
//! This module provides:
//! - [`Object`]: a resolved reference standing for a raw [`Value`]
//! - [`OptimisticObject`]: a placeholder for a stream output not yet computed
//! - [`Registry`]: an append-only interning table handing out both kinds
//!
//! A reference is a plain index into its registry. Its textual name is the
//! registry prefix followed by that index, so two distinct values with the
//! same human-readable form still get distinct names.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::stream::StreamCall;
use crate::value::Value;

/// Common behaviour of the two reference kinds.
pub trait Reference: Copy + Eq + Hash + fmt::Debug {
    /// Kind label used in log events
    const KIND: &'static str;

    fn from_index(index: usize) -> Self;

    fn index(self) -> usize;
}

/// Resolved reference to an interned raw value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Object(usize);

impl Reference for Object {
    const KIND: &'static str = "object";

    fn from_index(index: usize) -> Self {
        Object(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// Placeholder reference for a value a stream has not produced yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptimisticObject(usize);

impl Reference for OptimisticObject {
    const KIND: &'static str = "optimistic";

    fn from_index(index: usize) -> Self {
        OptimisticObject(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

/// What an optimistic object stands in for.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placeholder {
    /// An opaque optimistic value supplied by the caller
    Value(Value),
    /// The `output_index`-th output of a pending stream call
    Output(StreamCall),
}

impl Placeholder {
    pub fn provenance(&self) -> Option<&StreamCall> {
        match self {
            Placeholder::Output(call) => Some(call),
            Placeholder::Value(_) => None,
        }
    }
}

/// Append-only interning table.
///
/// Keys are interned by equality; the index of a key never changes and no key
/// is ever removed, so a reference stays valid for the lifetime of the
/// registry.
#[derive(Clone, Debug)]
pub struct Registry<R, K> {
    prefix: String,
    keys: IndexSet<K>,
    _reference: PhantomData<R>,
}

pub type ObjectRegistry = Registry<Object, Value>;
pub type OptimisticRegistry = Registry<OptimisticObject, Placeholder>;

impl<R: Reference, K: Eq + Hash + Clone> Registry<R, K> {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            keys: IndexSet::new(),
            _reference: PhantomData,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Return the reference for `key`, registering it on first sight.
    pub fn intern(&mut self, key: &K) -> R {
        if let Some(index) = self.keys.get_index_of(key) {
            return R::from_index(index);
        }
        let (index, _) = self.keys.insert_full(key.clone());
        let reference = R::from_index(index);
        tracing::debug!(kind = R::KIND, name = %self.format_name(index), "interned new reference");
        reference
    }

    /// Reference for `key` if it was interned before.
    pub fn get(&self, key: &K) -> Option<R> {
        self.keys.get_index_of(key).map(R::from_index)
    }

    /// The key a reference was interned from.
    pub fn key(&self, reference: R) -> IrResult<&K> {
        self.keys
            .get_index(reference.index())
            .ok_or_else(|| IrError::LookupFailure {
                name: self.format_name(reference.index()),
            })
    }

    /// Stable textual name of a reference owned by this registry.
    pub fn name(&self, reference: R) -> IrResult<String> {
        if reference.index() < self.keys.len() {
            Ok(self.format_name(reference.index()))
        } else {
            Err(IrError::LookupFailure {
                name: self.format_name(reference.index()),
            })
        }
    }

    pub fn lookup_by_name(&self, name: &str) -> IrResult<R> {
        self.find_by_name(name).ok_or_else(|| IrError::LookupFailure {
            name: name.to_string(),
        })
    }

    fn find_by_name(&self, name: &str) -> Option<R> {
        let index: usize = name.strip_prefix(self.prefix.as_str())?.parse().ok()?;
        // Reject non-canonical spellings such as "v01" or "v+1"
        (index < self.keys.len() && self.format_name(index) == name).then(|| R::from_index(index))
    }

    fn format_name(&self, index: usize) -> String {
        format!("{}{}", self.prefix, index)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over all (reference, key) pairs in interning order.
    pub fn iter(&self) -> impl Iterator<Item = (R, &K)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(index, key)| (R::from_index(index), key))
    }

    /// All keys in interning order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.keys.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }
}
