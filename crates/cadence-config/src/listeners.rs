//! Change listeners for presets and settings.
//!
//! Listeners are held as `Arc` handles in registration order. Dispatch is
//! synchronous on the calling thread and works on a snapshot of the handle
//! list, so a listener removed while a dispatch is running still receives
//! that dispatch but no later ones.
//!
//! Listeners must not call back into the mutating operations of the object
//! that notifies them. Such reentrant calls are not supported.

use std::fmt;
use std::sync::Arc;

use crate::preset::Preset;
use crate::settings::SettingValue;

/// Receives the current preset whenever it changes.
pub trait PresetListener: Send + Sync {
    /// Called after a load, a save or a drift flip.
    fn preset_changed(&self, preset: &Preset);
}

impl<F> PresetListener for F
where
    F: Fn(&Preset) + Send + Sync,
{
    fn preset_changed(&self, preset: &Preset) {
        self(preset)
    }
}

/// Receives one call per changed setting.
pub trait SettingListener: Send + Sync {
    /// Called with the key and its new value.
    fn setting_changed(&self, key: &str, value: &SettingValue);
}

impl<F> SettingListener for F
where
    F: Fn(&str, &SettingValue) + Send + Sync,
{
    fn setting_changed(&self, key: &str, value: &SettingValue) {
        self(key, value)
    }
}

/// Handle returned by [`ListenerList::add`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Ordered collection of listeners.
pub struct ListenerList<L: ?Sized> {
    entries: Vec<(ListenerId, Arc<L>)>,
    next_id: u64,
}

impl<L: ?Sized> ListenerList<L> {
    /// Empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Appends a listener.
    pub fn add(&mut self, listener: Arc<L>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls `f` on every listener in registration order.
    pub fn call(&self, mut f: impl FnMut(&L)) {
        let snapshot: Vec<Arc<L>> = self.entries.iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in &snapshot {
            f(&**listener);
        }
    }
}

impl<L: ?Sized> Default for ListenerList<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for ListenerList<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.entries.len())
            .finish()
    }
}
