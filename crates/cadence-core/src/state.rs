//! Structural snapshots of parameter state.
//!
//! A [`StateTree`] is a named, ordered map from parameter id to plain value.
//! It is what presets store, what the live store hands out as a snapshot and
//! what gets restored on load. Trees are plain values: cloning one never
//! aliases the live store.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::param_set::ParameterSet;

/// Default tree identifier used by the parameter store.
pub const DEFAULT_STATE_KIND: &str = "parameters";

/// Snapshot of parameter values keyed by parameter id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateTree {
    /// Tree identifier, e.g. `"parameters"`.
    pub kind: String,
    /// Parameter values keyed by id.
    pub values: BTreeMap<String, f32>,
}

impl StateTree {
    /// Empty tree with the given identifier.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            values: BTreeMap::new(),
        }
    }

    /// Adds or replaces a value.
    pub fn with_value(mut self, id: impl Into<String>, value: f32) -> Self {
        self.values.insert(id.into(), value);
        self
    }

    /// Value stored for `id`.
    pub fn get(&self, id: &str) -> Option<f32> {
        self.values.get(id).copied()
    }

    /// Adds or replaces a value.
    pub fn set(&mut self, id: impl Into<String>, value: f32) {
        self.values.insert(id.into(), value);
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Structural equivalence.
    ///
    /// Two trees are equivalent when they share the same identifier and the
    /// same id set, and every value compares equal under
    /// [`f32::total_cmp`]. Key order never matters. Using the total order
    /// keeps the relation reflexive even for NaN payloads.
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.total_cmp(vb) == Ordering::Equal)
    }

    /// Compares this tree against a parameter catalog.
    pub fn validate(&self, parameters: &ParameterSet) -> StateReport {
        let missing = parameters
            .ids()
            .filter(|id| !self.values.contains_key(*id))
            .map(str::to_string)
            .collect();
        let unknown = self
            .values
            .keys()
            .filter(|id| !parameters.contains(id))
            .cloned()
            .collect();
        let out_of_range = self
            .values
            .iter()
            .filter(|(id, value)| {
                parameters
                    .get(id)
                    .is_some_and(|desc| !desc.range.contains(**value))
            })
            .map(|(id, _)| id.clone())
            .collect();

        StateReport {
            missing,
            unknown,
            out_of_range,
        }
    }
}

/// Result of checking a [`StateTree`] against a [`ParameterSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateReport {
    /// Catalog ids absent from the tree, in catalog order.
    pub missing: Vec<String>,
    /// Tree ids that the catalog does not know.
    pub unknown: Vec<String>,
    /// Known ids whose value lies outside the declared range.
    pub out_of_range: Vec<String>,
}

impl StateReport {
    /// Tree covers exactly the catalog with in-range values.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.unknown.is_empty() && self.out_of_range.is_empty()
    }
}
