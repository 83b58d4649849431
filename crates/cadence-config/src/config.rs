//! Runtime configuration for the preset system.
//!
//! # TOML Format
//!
//! ```toml
//! [identity]
//! manufacturer = "Cadence"
//! product = "Widget"
//! manufacturer_code = "Cdnc"
//! plugin_code = "Wdgt"
//!
//! [presets]
//! user_dir = "/home/me/widget-presets"
//! check_interval_ms = 50
//! ```
//!
//! Every key is optional. Preset roots without an override resolve to the
//! platform directories of the identity.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::checker::DEFAULT_CHECK_INTERVAL;
use crate::error::ConfigError;
use crate::identity::PluginIdentity;
use crate::paths::{self, PresetLocations};

/// Names and codes of the plugin, as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Vendor name.
    pub manufacturer: String,
    /// Product name.
    pub product: String,
    /// Vendor four-character code.
    pub manufacturer_code: String,
    /// Product four-character code.
    pub plugin_code: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            manufacturer: "Cadence".to_string(),
            product: "Cadence".to_string(),
            manufacturer_code: "Cdnc".to_string(),
            plugin_code: "Cdnc".to_string(),
        }
    }
}

/// Preset roots and drift polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    /// Factory root override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_dir: Option<PathBuf>,
    /// User root override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_dir: Option<PathBuf>,
    /// Drift polling interval in milliseconds.
    pub check_interval_ms: u64,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            factory_dir: None,
            user_dir: None,
            check_interval_ms: DEFAULT_CHECK_INTERVAL.as_millis() as u64,
        }
    }
}

/// Configuration of the preset system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    /// Plugin identity.
    pub identity: IdentityConfig,
    /// Preset roots and polling.
    pub presets: PresetsConfig,
}

impl PresetConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The configured identity. Fails on malformed four-character codes.
    pub fn identity(&self) -> Result<PluginIdentity, ConfigError> {
        let id = &self.identity;
        PluginIdentity::from_codes(
            id.manufacturer.clone(),
            id.product.clone(),
            &id.manufacturer_code,
            &id.plugin_code,
        )
    }

    /// Preset roots, overrides first, then platform directories.
    pub fn locations(&self) -> Result<PresetLocations, ConfigError> {
        let identity = self.identity()?;
        let factory = self
            .presets
            .factory_dir
            .clone()
            .unwrap_or_else(|| paths::factory_presets_dir(&identity));
        let user = self
            .presets
            .user_dir
            .clone()
            .unwrap_or_else(|| paths::user_presets_dir(&identity));
        Ok(PresetLocations::new(factory, user))
    }

    /// Drift polling interval.
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.presets.check_interval_ms)
    }
}
