//! Live parameter state.
//!
//! [`ParameterStore`] holds the current plain value of every parameter in a
//! [`ParameterSet`]. Values live in lock-free atomics (bit-cast `f32`), so the
//! audio thread may read them while the control thread writes. Every write
//! made through the store is forwarded to the [`ParameterHost`] so automation
//! hosts observe it.
//!
//! Structural operations ([`snapshot`](ParameterStore::snapshot),
//! [`restore`](ParameterStore::restore), [`reset`](ParameterStore::reset))
//! belong on the control thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::host::{NullHost, ParameterHost};
use crate::param_info::ParamDescriptor;
use crate::param_set::ParameterSet;
use crate::state::{DEFAULT_STATE_KIND, StateTree};

/// Mutable mapping from parameter id to current value.
pub struct ParameterStore {
    parameters: ParameterSet,
    identifier: String,
    values: Vec<AtomicU32>,
    host: Arc<dyn ParameterHost>,
}

impl ParameterStore {
    /// Builds a store at default values and registers every parameter with `host`.
    pub fn new(parameters: ParameterSet, host: Arc<dyn ParameterHost>) -> Self {
        Self::with_identifier(parameters, host, DEFAULT_STATE_KIND)
    }

    /// Builds a store whose snapshots carry `identifier` as tree kind.
    pub fn with_identifier(
        parameters: ParameterSet,
        host: Arc<dyn ParameterHost>,
        identifier: impl Into<String>,
    ) -> Self {
        let values = parameters
            .iter()
            .map(|desc| {
                host.register_parameter(desc);
                AtomicU32::new(desc.default.to_bits())
            })
            .collect();

        Self {
            parameters,
            identifier: identifier.into(),
            values,
            host,
        }
    }

    /// Store without an automation host.
    pub fn detached(parameters: ParameterSet) -> Self {
        Self::new(parameters, Arc::new(NullHost))
    }

    /// The parameter catalog.
    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    /// Tree kind used by snapshots.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Current value of `id`.
    #[inline]
    pub fn get(&self, id: &str) -> Option<f32> {
        self.parameters
            .index_of(id)
            .map(|i| f32::from_bits(self.values[i].load(Ordering::Acquire)))
    }

    /// Current value normalized to `[0.0, 1.0]`.
    pub fn get_normalized(&self, id: &str) -> Option<f32> {
        let desc = self.parameters.get(id)?;
        self.get(id).map(|v| desc.normalize(v))
    }

    /// Sets `id` to `value`, snapped to the parameter's step and range.
    ///
    /// Returns `false` for unknown ids.
    pub fn set(&self, id: &str, value: f32) -> bool {
        let (Some(index), Some(desc)) = (self.parameters.index_of(id), self.parameters.get(id))
        else {
            return false;
        };
        self.store_at(index, desc, value);
        true
    }

    /// Sets `id` from a normalized value.
    pub fn set_normalized(&self, id: &str, normalized: f32) -> bool {
        let Some(desc) = self.parameters.get(id) else {
            return false;
        };
        self.set(id, desc.denormalize(normalized))
    }

    /// Returns every parameter to its default, notifying the host per parameter.
    pub fn reset(&self) {
        for (index, desc) in self.parameters.iter().enumerate() {
            self.store_at(index, desc, desc.default);
        }
    }

    /// Deep copy of the current values.
    pub fn snapshot(&self) -> StateTree {
        let mut tree = StateTree::new(self.identifier.clone());
        for (index, desc) in self.parameters.iter().enumerate() {
            let value = f32::from_bits(self.values[index].load(Ordering::Acquire));
            tree.set(desc.id.clone(), value);
        }
        tree
    }

    /// Replaces the current values with those in `tree`.
    ///
    /// The tree is not required to match the catalog. Ids the catalog does
    /// not know are skipped and catalog ids absent from the tree fall back
    /// to their default; both cases are logged. Use
    /// [`StateTree::validate`] beforehand to reject such trees instead.
    pub fn restore(&self, tree: &StateTree) {
        if tree.kind != self.identifier {
            tracing::warn!(
                expected = %self.identifier,
                found = %tree.kind,
                "restoring state tree with foreign identifier"
            );
        }

        for id in tree.values.keys().filter(|id| !self.parameters.contains(id)) {
            tracing::warn!(id = %id, "ignoring unknown parameter in restored state");
        }

        for (index, desc) in self.parameters.iter().enumerate() {
            let value = match tree.get(&desc.id) {
                Some(value) => value,
                None => {
                    tracing::warn!(id = %desc.id, "restored state lacks parameter, using default");
                    desc.default
                }
            };
            self.store_at(index, desc, value);
        }
    }

    fn store_at(&self, index: usize, desc: &ParamDescriptor, value: f32) {
        let value = if value.is_nan() {
            desc.default
        } else {
            desc.legalize(value)
        };
        self.values[index].store(value.to_bits(), Ordering::Release);
        self.host.set_value_notifying_observers(&desc.id, value);
    }
}

impl std::fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterStore")
            .field("identifier", &self.identifier)
            .field("values", &self.snapshot().values)
            .finish_non_exhaustive()
    }
}
