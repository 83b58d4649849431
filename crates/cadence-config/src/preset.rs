//! The preset entity.

use std::path::{Path, PathBuf};

use cadence_core::StateTree;

use crate::document::{self, PresetFile, PresetRecord};
use crate::error::ConfigError;
use crate::identity::PluginIdentity;
use crate::paths::preset_name_from_path;

/// A named, authored, versioned snapshot of parameter state.
///
/// A preset is usually bound to a file (its `file`) inside a bank (the first
/// directory below a preset root). Presets found by the catalog start out as
/// handles: only `file`, `name` and `bank` are meaningful until
/// [`load_from_file`](Self::load_from_file) reads the rest.
///
/// # Identity
///
/// Two presets are equal when their `file`, `name` and `version` match.
/// Author, comments, bank, the modified flag and the stored state do not
/// take part, so a loaded preset still equals the catalog handle it came
/// from.
///
/// # Blocking I/O
///
/// [`load_from_file`](Self::load_from_file) and
/// [`save_to_file`](Self::save_to_file) read and write synchronously and
/// must not be called from the audio thread.
#[derive(Debug, Clone)]
pub struct Preset {
    /// Backing file, if any.
    pub file: Option<PathBuf>,
    /// Display name. Defaults to the file stem.
    pub name: String,
    /// Bank name, empty for presets at the root.
    pub bank: String,
    /// Author credit.
    pub author: String,
    /// Free-form comments.
    pub comments: String,
    /// Format version, always at least 1.
    pub version: u32,
    /// Whether the live state has drifted from this preset.
    pub modified: bool,
    state: StateTree,
}

impl Preset {
    /// Handle for the preset file at `file` in `bank`.
    pub fn new(file: impl Into<PathBuf>, bank: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            name: preset_name_from_path(&file).unwrap_or_default(),
            file: Some(file),
            bank: bank.into(),
            ..Self::default()
        }
    }

    /// Preset with no backing file, such as the in-memory default.
    pub fn unbound(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the author credit.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the comments.
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Backing file, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Returns `true` if the preset is backed by a file.
    pub fn is_file_backed(&self) -> bool {
        self.file.is_some()
    }

    /// Stored parameter state.
    pub fn state(&self) -> &StateTree {
        &self.state
    }

    /// Independent copy of the stored state.
    pub fn copy_state(&self) -> StateTree {
        self.state.clone()
    }

    /// Replaces the stored state.
    pub fn replace_state(&mut self, state: StateTree) {
        self.state = state;
    }

    /// Structural equivalence between the stored state and `candidate`.
    ///
    /// See [`StateTree::is_equivalent_to`].
    pub fn check_state(&self, candidate: &StateTree) -> bool {
        self.state.is_equivalent_to(candidate)
    }

    /// Reads version, author, comments and state from the backing file.
    ///
    /// The document must carry the manufacturer and plugin tags of
    /// `identity`, a positive version and a state table. On any failure the
    /// preset is left exactly as it was. On success `modified` is cleared.
    ///
    /// This is a blocking call.
    pub fn load_from_file(&mut self, identity: &PluginIdentity) -> Result<(), ConfigError> {
        let path = self
            .file
            .as_deref()
            .ok_or_else(|| ConfigError::NotFileBacked(self.name.clone()))?;

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let doc: PresetFile = toml::from_str(&content)?;
        let (version, state) = validate_body(&doc, identity)?;

        self.version = version;
        self.modified = false;
        self.author = doc.author;
        self.comments = doc.comments;
        self.state = state;
        Ok(())
    }

    /// Writes identity, version, author, comments and state to the backing
    /// file, creating its directory if needed.
    ///
    /// This is a blocking call.
    pub fn save_to_file(&self, identity: &PluginIdentity) -> Result<(), ConfigError> {
        let path = self
            .file
            .as_deref()
            .ok_or_else(|| ConfigError::NotFileBacked(self.name.clone()))?;

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(&self.file_body(identity))?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serializes the preset in the on-disk single-preset format.
    pub fn to_toml(&self, identity: &PluginIdentity) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.file_body(identity))?)
    }

    /// Record carrying everything, including binding and drift flag.
    pub(crate) fn to_record(&self, identity: &PluginIdentity) -> PresetRecord {
        PresetRecord {
            file: self
                .file
                .as_deref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            name: self.name.clone(),
            bank: self.bank.clone(),
            modified: self.modified,
            body: self.file_body(identity),
        }
    }

    /// Replaces every field from a record.
    ///
    /// The record must name a file and a preset besides passing the checks
    /// of [`load_from_file`](Self::load_from_file). On failure the preset is
    /// unchanged.
    pub(crate) fn apply_record(
        &mut self,
        record: PresetRecord,
        identity: &PluginIdentity,
    ) -> Result<(), ConfigError> {
        if record.file.is_empty() {
            return Err(ConfigError::MissingAttribute("file"));
        }
        if record.name.is_empty() {
            return Err(ConfigError::MissingAttribute("name"));
        }
        let (version, state) = validate_body(&record.body, identity)?;

        self.file = Some(PathBuf::from(record.file));
        self.name = record.name;
        self.bank = record.bank;
        self.author = record.body.author;
        self.comments = record.body.comments;
        self.version = version;
        self.modified = record.modified;
        self.state = state;
        Ok(())
    }

    /// Serializes the preset as an embeddable record.
    pub fn to_document(&self, identity: &PluginIdentity) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&self.to_record(identity))?)
    }

    /// Reads a record written by [`to_document`](Self::to_document).
    ///
    /// Leaves the preset unchanged on failure.
    pub fn from_document(
        &mut self,
        doc: &str,
        identity: &PluginIdentity,
    ) -> Result<(), ConfigError> {
        let record: PresetRecord = toml::from_str(doc)?;
        self.apply_record(record, identity)
    }

    fn file_body(&self, identity: &PluginIdentity) -> PresetFile {
        PresetFile {
            manufacturer: Some(identity.manufacturer_tag()),
            plugin: Some(identity.plugin_tag()),
            version: Some(i64::from(self.version)),
            author: self.author.clone(),
            comments: self.comments.clone(),
            state: Some(document::state_section(&self.state)),
        }
    }
}

/// Checks tags, version and state of a parsed preset body.
fn validate_body(
    body: &PresetFile,
    identity: &PluginIdentity,
) -> Result<(u32, StateTree), ConfigError> {
    identity.verify_tags(
        body.manufacturer.as_deref().unwrap_or_default(),
        body.plugin.as_deref().unwrap_or_default(),
    )?;
    let version = document::checked_version(body.version)?;
    let state = document::tree_from_section(body.state.clone())?;
    Ok((version, state))
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            file: None,
            name: String::new(),
            bank: String::new(),
            author: String::new(),
            comments: String::new(),
            version: 1,
            modified: false,
            state: StateTree::default(),
        }
    }
}

impl PartialEq for Preset {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file && self.name == other.name && self.version == other.version
    }
}

impl Eq for Preset {}
