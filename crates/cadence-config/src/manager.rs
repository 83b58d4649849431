//! The preset coordinator.
//!
//! [`PresetManager`] owns the current preset and its position in the preset
//! catalog. It applies presets to the live [`ParameterStore`], stores the
//! live values back into preset files, walks the catalog and tracks whether
//! the live values have drifted from the current preset.
//!
//! # States
//!
//! - **Default**: the unbound in-memory "Default" preset, index `None`
//! - **Loaded**: a catalog preset, `modified == false`
//! - **Dirty**: a catalog preset whose live values diverged, `modified == true`
//!
//! Loads always leave the manager in Loaded. Only
//! [`check_preset_changed`](PresetManager::check_preset_changed) moves
//! between Loaded and Dirty.
//!
//! # Threading
//!
//! Every method runs on the control thread and may block on file I/O. When
//! drift is polled from another thread with
//! [`PresetChecker`](crate::PresetChecker), share the manager as
//! `Arc<parking_lot::Mutex<PresetManager>>` and hold the lock for each call.

use std::path::Path;
use std::sync::Arc;

use cadence_core::ParameterStore;

use crate::catalog::PresetCatalog;
use crate::document::{ManagerBody, ManagerDocument, PRESET_MANAGER_KEY};
use crate::error::ConfigError;
use crate::identity::PluginIdentity;
use crate::listeners::{ListenerId, ListenerList, PresetListener};
use crate::paths::{self, PresetLocations};
use crate::preset::Preset;

/// Name of the in-memory preset holding the default parameter values.
pub const DEFAULT_PRESET_NAME: &str = "Default";

/// Coordinates the current preset with the live parameter state.
pub struct PresetManager {
    identity: PluginIdentity,
    catalog: PresetCatalog,
    parameters: Arc<ParameterStore>,
    current: Preset,
    current_index: Option<usize>,
    listeners: ListenerList<dyn PresetListener>,
}

impl PresetManager {
    /// Manager over `parameters`, starting from the default preset.
    ///
    /// The live parameters are reset to their defaults.
    pub fn new(
        identity: PluginIdentity,
        locations: PresetLocations,
        parameters: Arc<ParameterStore>,
    ) -> Self {
        let mut manager = Self {
            identity,
            catalog: PresetCatalog::new(locations),
            parameters,
            current: Preset::unbound(DEFAULT_PRESET_NAME),
            current_index: None,
            listeners: ListenerList::new(),
        };
        manager.load_default();
        manager
    }

    /// Manager using the platform preset roots of `identity`.
    pub fn for_identity(identity: PluginIdentity, parameters: Arc<ParameterStore>) -> Self {
        let locations = PresetLocations::for_identity(&identity);
        Self::new(identity, locations, parameters)
    }

    /// Identity stamped into and checked against preset files.
    pub fn identity(&self) -> &PluginIdentity {
        &self.identity
    }

    /// The live parameter store.
    pub fn parameters(&self) -> &Arc<ParameterStore> {
        &self.parameters
    }

    /// The preset catalog.
    pub fn catalog(&self) -> &PresetCatalog {
        &self.catalog
    }

    /// Factory preset root.
    pub fn factory_presets_location(&self) -> &Path {
        self.catalog.locations().factory()
    }

    /// User preset root, created if missing.
    pub fn user_presets_location(&self) -> Result<&Path, ConfigError> {
        self.catalog.locations().ensure_user()
    }

    /// Presets below the factory root.
    pub fn factory_presets(&self) -> Vec<Preset> {
        self.catalog.factory_presets()
    }

    /// Presets below the user root.
    pub fn user_presets(&self) -> Vec<Preset> {
        self.catalog.user_presets()
    }

    /// Factory presets followed by user presets.
    pub fn all_presets(&self) -> Vec<Preset> {
        self.catalog.all_presets()
    }

    /// See [`PresetCatalog::factory_preset`].
    pub fn factory_preset(&self, name: &str, bank: &str) -> Preset {
        self.catalog.factory_preset(name, bank)
    }

    /// See [`PresetCatalog::user_preset`].
    pub fn user_preset(&self, name: &str, bank: &str) -> Preset {
        self.catalog.user_preset(name, bank)
    }

    /// The current preset.
    pub fn current_preset(&self) -> &Preset {
        &self.current
    }

    /// Position of the current preset in [`all_presets`](Self::all_presets),
    /// or `None` if it is not in the catalog.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Resets the live parameters and makes the unbound default preset current.
    pub fn load_default(&mut self) {
        self.parameters.reset();

        let mut preset = Preset::unbound(DEFAULT_PRESET_NAME);
        preset.replace_state(self.parameters.snapshot());
        self.current = preset;
        self.refresh_index();

        tracing::info!("loaded default preset");
        self.notify();
    }

    /// Loads `preset` from its file and applies it to the live parameters.
    ///
    /// The current preset then holds the values as applied, clamped and
    /// snapped by the parameter ranges, so it starts out unmodified even when
    /// the file holds values the ranges do not allow.
    ///
    /// On failure nothing changes and no listener is called. This is a
    /// blocking call.
    pub fn load_preset(&mut self, preset: &Preset) -> Result<(), ConfigError> {
        let mut loaded = preset.clone();
        if let Err(e) = loaded.load_from_file(&self.identity) {
            tracing::warn!(preset = %preset.name, error = %e, "preset rejected");
            return Err(e);
        }

        self.parameters.restore(loaded.state());
        loaded.replace_state(self.parameters.snapshot());
        self.current = loaded;
        self.refresh_index();

        tracing::info!(
            preset = %self.current.name,
            bank = %self.current.bank,
            index = ?self.current_index,
            "loaded preset"
        );
        self.notify();
        Ok(())
    }

    /// Loads the catalog entry before the current one.
    ///
    /// Clamped to the first entry. From the default preset this loads the
    /// first entry. An empty catalog is a no-op.
    pub fn load_previous_preset(&mut self) -> Result<(), ConfigError> {
        self.load_preset_at(self.signed_index() - 1)
    }

    /// Loads the catalog entry after the current one.
    ///
    /// Clamped to the last entry. From the default preset this loads the
    /// first entry. An empty catalog is a no-op.
    pub fn load_next_preset(&mut self) -> Result<(), ConfigError> {
        self.load_preset_at(self.signed_index() + 1)
    }

    /// Returns `true` if a catalog entry precedes the current preset.
    pub fn can_load_previous_preset(&self) -> bool {
        self.current_index.is_some_and(|i| i > 0)
    }

    /// Returns `true` if a catalog entry follows the current preset.
    ///
    /// Rescans the catalog.
    pub fn can_load_next_preset(&self) -> bool {
        let count = self.all_presets().len() as i64;
        self.signed_index() < count - 1
    }

    /// Stores the live parameters as user preset `name` in `bank` and makes
    /// it current.
    ///
    /// An existing user preset with that name and bank is overwritten. An
    /// empty `name` cannot be saved, and names or banks that would leave the
    /// user root fail with [`ConfigError::InvalidPresetName`]. This is a
    /// blocking call.
    pub fn save_current_preset(
        &mut self,
        name: &str,
        bank: &str,
        author: &str,
        comments: &str,
    ) -> Result<(), ConfigError> {
        paths::check_preset_name(name, bank)?;
        let mut preset = self.user_preset(name, bank);
        preset.author = author.to_string();
        preset.comments = comments.to_string();
        preset.replace_state(self.parameters.snapshot());

        if let Err(e) = preset.save_to_file(&self.identity) {
            tracing::warn!(preset = %name, bank = %bank, error = %e, "failed to save preset");
            return Err(e);
        }
        tracing::info!(preset = %name, bank = %bank, "saved preset");

        self.load_preset(&preset)
    }

    /// Compares the live parameters with the current preset.
    ///
    /// Flips the `modified` flag of the current preset and notifies
    /// listeners when the comparison result differs from it. Returns `true`
    /// if the flag flipped.
    pub fn check_preset_changed(&mut self) -> bool {
        let live = self.parameters.snapshot();
        let different = !self.current.check_state(&live);
        if different == self.current.modified {
            return false;
        }

        self.current.modified = different;
        tracing::debug!(preset = %self.current.name, modified = different, "preset drift changed");
        self.notify();
        true
    }

    /// Serializes the current preset inside a `preset-manager` table.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let doc = ManagerDocument {
            manager: Some(ManagerBody {
                preset: Some(self.current.to_record(&self.identity)),
            }),
        };
        Ok(toml::to_string_pretty(&doc)?)
    }

    /// Replaces the current preset record from a document written by
    /// [`to_toml`](Self::to_toml).
    ///
    /// Only the record changes: the live parameters are restored separately
    /// by the host, e.g. with [`parameters_from_toml`](crate::parameters_from_toml).
    /// On failure nothing changes.
    pub fn from_toml(&mut self, doc: &str) -> Result<(), ConfigError> {
        let doc: ManagerDocument = toml::from_str(doc)?;
        let body = doc
            .manager
            .ok_or(ConfigError::MissingAttribute(PRESET_MANAGER_KEY))?;
        let record = body.preset.ok_or(ConfigError::MissingAttribute("preset"))?;

        self.current.apply_record(record, &self.identity)?;
        self.refresh_index();
        self.notify();
        Ok(())
    }

    /// Registers a listener called after every change of the current preset.
    pub fn add_listener(&mut self, listener: Arc<dyn PresetListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Unregisters a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn signed_index(&self) -> i64 {
        self.current_index.map_or(-1, |i| i as i64)
    }

    fn load_preset_at(&mut self, index: i64) -> Result<(), ConfigError> {
        let presets = self.all_presets();
        let Some(last) = presets.len().checked_sub(1) else {
            tracing::debug!("no presets to navigate");
            return Ok(());
        };
        let index = index.clamp(0, last as i64) as usize;
        self.load_preset(&presets[index])
    }

    // Catalog handles carry version 1, so a file saved with a later version
    // never matches an entry and leaves the index at `None`.
    fn refresh_index(&mut self) {
        self.current_index = self.all_presets().iter().position(|p| *p == self.current);
    }

    fn notify(&self) {
        self.listeners.call(|l| l.preset_changed(&self.current));
    }
}

impl std::fmt::Debug for PresetManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetManager")
            .field("identity", &self.identity)
            .field("current", &self.current.name)
            .field("current_index", &self.current_index)
            .field("modified", &self.current.modified)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
