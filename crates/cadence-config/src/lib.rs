//! Preset files, preset browsing and settings for cadence plugins.
//!
//! This crate persists the live parameter state of
//! [`cadence_core::ParameterStore`] as named presets, finds presets under a
//! factory and a user root, walks them in a stable order and tracks whether
//! the live values have drifted from the loaded preset.
//!
//! # Features
//!
//! - **Preset Files**: One TOML file per preset, stamped with the plugin identity
//! - **Catalog**: Factory and user roots, banks from the first subdirectory
//! - **Manager**: Load, save, previous/next navigation and change notification
//! - **Drift Polling**: A background thread flags presets whose values changed
//! - **Settings**: Non-automatable key/value settings with their own document
//! - **Paths**: Platform-specific preset directories
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cadence_config::{PluginIdentity, PresetManager, fourcc};
//! use cadence_core::{ParamDescriptor, ParameterSet, ParameterStore};
//!
//! let identity = PluginIdentity::new("Acme", "Widget", fourcc(b"Acme"), fourcc(b"Wdgt"));
//! let parameters = ParameterSet::new(vec![
//!     ParamDescriptor::gain_db("gain", "Gain", -60.0, 12.0, 0.0),
//! ])
//! .unwrap();
//! let store = Arc::new(ParameterStore::detached(parameters));
//!
//! let mut manager = PresetManager::for_identity(identity, Arc::clone(&store));
//! store.set("gain", -6.0);
//! manager.save_current_preset("Lead", "Basses", "Jane", "Round low end").unwrap();
//!
//! manager.load_next_preset().unwrap();
//! println!("now on {}", manager.current_preset().name);
//! ```

mod catalog;
mod checker;
mod config;
mod document;
mod error;
mod identity;
mod listeners;
mod manager;
mod preset;
mod settings;

/// Platform-specific preset directories and preset file discovery.
pub mod paths;

pub use catalog::PresetCatalog;
pub use checker::{DEFAULT_CHECK_INTERVAL, PresetChecker};
pub use config::{IdentityConfig, PresetConfig, PresetsConfig};
pub use document::{PRESET_MANAGER_KEY, parameters_from_toml, parameters_to_toml};
pub use error::ConfigError;
pub use identity::{PluginIdentity, fourcc};
pub use listeners::{ListenerId, ListenerList, PresetListener, SettingListener};
pub use manager::{DEFAULT_PRESET_NAME, PresetManager};
pub use paths::{PRESET_EXTENSION, PresetLocations, factory_presets_dir, user_presets_dir};
pub use preset::Preset;
pub use settings::{DEFAULT_SETTINGS_IDENTIFIER, SettingDescriptor, SettingManager, SettingValue};
