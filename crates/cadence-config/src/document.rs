//! TOML document layouts for presets and parameter state.
//!
//! Three layouts share the same state encoding:
//!
//! # Preset File
//!
//! One file per preset on disk. The `state` table holds exactly one
//! sub-table named after the state tree's kind.
//!
//! ```toml
//! manufacturer = "41636d65"
//! plugin = "57646774"
//! version = 1
//! author = "Jane"
//! comments = "Round low end"
//!
//! [state.parameters]
//! cutoff = 420.0
//! gain = -6.0
//! ```
//!
//! # Preset Record
//!
//! The preset file fields plus `file`, `name`, `bank` and `modified`. Hosts
//! embed it in their own session data through the preset manager document:
//!
//! ```toml
//! [preset-manager.preset]
//! file = "/home/jane/.config/Acme/Widget/presets/Basses/Lead.toml"
//! name = "Lead"
//! bank = "Basses"
//! # ... preset file fields ...
//! modified = false
//!
//! [preset-manager.preset.state.parameters]
//! gain = -6.0
//! ```
//!
//! # Parameter State
//!
//! The live parameter values on their own, as one table named after the
//! store identifier. See [`parameters_to_toml`].

use std::collections::BTreeMap;

use cadence_core::{ParameterStore, StateTree};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Encoded state: one table keyed by tree kind.
pub(crate) type StateSection = BTreeMap<String, BTreeMap<String, f32>>;

/// Top-level key of the preset manager document.
pub const PRESET_MANAGER_KEY: &str = "preset-manager";

/// On-disk preset file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PresetFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateSection>,
}

/// Preset file fields plus binding and drift information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PresetRecord {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub modified: bool,
    #[serde(flatten)]
    pub body: PresetFile,
}

/// Body of the `preset-manager` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ManagerBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<PresetRecord>,
}

/// The whole preset manager document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ManagerDocument {
    #[serde(rename = "preset-manager", default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<ManagerBody>,
}

/// Encodes a state tree as a single-entry section.
pub(crate) fn state_section(tree: &StateTree) -> StateSection {
    let mut section = StateSection::new();
    section.insert(tree.kind.clone(), tree.values.clone());
    section
}

/// Decodes a section back into a state tree.
///
/// An absent or empty section is [`ConfigError::MissingState`]. A section
/// with several trees keeps the first one in key order.
pub(crate) fn tree_from_section(section: Option<StateSection>) -> Result<StateTree, ConfigError> {
    let section = section.ok_or(ConfigError::MissingState)?;
    if section.len() > 1 {
        tracing::warn!(
            trees = section.len(),
            "preset state holds several trees, keeping the first"
        );
    }
    let (kind, values) = section.into_iter().next().ok_or(ConfigError::MissingState)?;
    Ok(StateTree { kind, values })
}

/// Converts a document version into a preset version.
pub(crate) fn checked_version(version: Option<i64>) -> Result<u32, ConfigError> {
    let version = version.ok_or(ConfigError::MissingAttribute("version"))?;
    match u32::try_from(version) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(ConfigError::InvalidVersion(version)),
    }
}

/// Serializes the live parameter values as a table named after the store
/// identifier.
///
/// # Example
///
/// ```rust
/// use cadence_config::parameters_to_toml;
/// use cadence_core::{ParamDescriptor, ParamRange, ParameterSet, ParameterStore};
///
/// let parameters = ParameterSet::new(vec![
///     ParamDescriptor::new("mix", "Mix", ParamRange::new(0.0, 1.0), 0.5),
/// ])
/// .unwrap();
/// let store = ParameterStore::detached(parameters);
///
/// let doc = parameters_to_toml(&store).unwrap();
/// assert!(doc.starts_with("[parameters]"));
/// ```
pub fn parameters_to_toml(store: &ParameterStore) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&state_section(&store.snapshot()))?)
}

/// Restores live parameter values from a document written by
/// [`parameters_to_toml`].
///
/// The document must hold one table named after the store identifier.
/// Missing and unknown parameters are handled as in
/// [`ParameterStore::restore`].
pub fn parameters_from_toml(store: &ParameterStore, doc: &str) -> Result<(), ConfigError> {
    let section: StateSection = toml::from_str(doc)?;
    let tree = tree_from_section(Some(section))?;
    if tree.kind != store.identifier() {
        return Err(ConfigError::StateKindMismatch {
            expected: store.identifier().to_string(),
            found: tree.kind,
        });
    }
    store.restore(&tree);
    Ok(())
}
