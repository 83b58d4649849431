//! Platform-specific preset locations and preset file discovery.
//!
//! Presets live under two roots, both scoped by manufacturer and product:
//!
//! - **Factory presets**: shipped with the plugin, shared by all users, read-only in practice
//! - **User presets**: per user, read-write, created on first access
//!
//! # Directory Structure
//!
//! - **Factory**: `/usr/share/<vendor>/<product>/presets/` (Linux), `/Library/Application Support/<vendor>/<product>/presets/` (macOS), `%PROGRAMDATA%\<vendor>\<product>\presets\` (Windows)
//! - **User**: `~/.config/<vendor>/<product>/presets/` (Linux), `~/Library/Application Support/<vendor>/<product>/presets/` (macOS), `%APPDATA%\<vendor>\<product>\presets\` (Windows)
//!
//! Inside a root, the first directory level is the preset *bank*. Deeper
//! directories are allowed but still belong to their first-level bank.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_config::{PluginIdentity, PresetLocations, fourcc};
//!
//! let identity = PluginIdentity::new("Acme", "Widget", fourcc(b"Acme"), fourcc(b"Wdgt"));
//! let locations = PresetLocations::for_identity(&identity);
//! println!("Factory presets: {:?}", locations.factory());
//! ```

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ConfigError;
use crate::identity::PluginIdentity;

/// Extension of preset files.
pub const PRESET_EXTENSION: &str = "toml";

/// Subdirectory name for presets.
const PRESETS_SUBDIR: &str = "presets";

/// Returns the per-user presets directory for `identity`.
///
/// # Platform Paths
///
/// - Linux: `~/.config/<vendor>/<product>/presets/`
/// - macOS: `~/Library/Application Support/<vendor>/<product>/presets/`
/// - Windows: `%APPDATA%\<vendor>\<product>\presets\`
///
/// Returns a path relative to the working directory if the config directory
/// cannot be determined.
pub fn user_presets_dir(identity: &PluginIdentity) -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(&identity.manufacturer)
        .join(&identity.product)
        .join(PRESETS_SUBDIR)
}

/// Returns the shared factory presets directory for `identity`.
///
/// # Platform Paths
///
/// - Linux: `/usr/share/<vendor>/<product>/presets/`
/// - macOS: `/Library/Application Support/<vendor>/<product>/presets/`
/// - Windows: `%PROGRAMDATA%\<vendor>\<product>\presets\`
pub fn factory_presets_dir(identity: &PluginIdentity) -> PathBuf {
    shared_data_dir()
        .join(&identity.manufacturer)
        .join(&identity.product)
        .join(PRESETS_SUBDIR)
}

fn shared_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        PathBuf::from("/Library").join("Application Support")
    }
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("ProgramData")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("/usr/share")
    }
}

/// The two preset roots of a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetLocations {
    factory: PathBuf,
    user: PathBuf,
}

impl PresetLocations {
    /// Explicit roots, e.g. from configuration or a test fixture.
    pub fn new(factory: impl Into<PathBuf>, user: impl Into<PathBuf>) -> Self {
        Self {
            factory: factory.into(),
            user: user.into(),
        }
    }

    /// Platform default roots for `identity`.
    pub fn for_identity(identity: &PluginIdentity) -> Self {
        Self::new(factory_presets_dir(identity), user_presets_dir(identity))
    }

    /// Factory root. Never created by this crate.
    pub fn factory(&self) -> &Path {
        &self.factory
    }

    /// User root, without touching the filesystem.
    pub fn user(&self) -> &Path {
        &self.user
    }

    /// User root, created with its parents if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_user(&self) -> Result<&Path, ConfigError> {
        if !self.user.exists() {
            std::fs::create_dir_all(&self.user)
                .map_err(|e| ConfigError::create_dir(&self.user, e))?;
            tracing::debug!(path = %self.user.display(), "created user presets directory");
        }
        Ok(&self.user)
    }
}

/// Recursively lists preset files below `root`.
///
/// Entries are sorted by file name within each directory so repeated scans
/// of an unchanged tree yield the same order. Symbolic links are not
/// followed. A missing or unreadable root yields an empty list; unreadable
/// subdirectories are skipped.
pub fn find_preset_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == PRESET_EXTENSION)
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Bank of a preset file: the first directory below `root`.
///
/// Files directly under the root, and files outside it, belong to no bank
/// (empty string).
///
/// # Example
///
/// ```rust
/// use cadence_config::paths::preset_bank;
/// use std::path::Path;
///
/// let root = Path::new("/presets");
/// assert_eq!(preset_bank(Path::new("/presets/init.toml"), root), "");
/// assert_eq!(preset_bank(Path::new("/presets/Bass/Sub/deep.toml"), root), "Bass");
/// ```
pub fn preset_bank(file: &Path, root: &Path) -> String {
    let Some(parent) = file.parent() else {
        return String::new();
    };
    let Ok(relative) = parent.strip_prefix(root) else {
        return String::new();
    };

    relative
        .components()
        .find_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .unwrap_or_default()
}

/// Path a preset named `name` in `bank` would have under `root`.
///
/// Does not check its inputs; see [`check_preset_name`].
pub fn preset_path(root: &Path, bank: &str, name: &str) -> PathBuf {
    let dir = if bank.is_empty() || bank == "." {
        root.to_path_buf()
    } else {
        root.join(bank)
    };
    dir.join(format!("{name}.{PRESET_EXTENSION}"))
}

/// Checks that `name` and `bank` each name a single entry directly below
/// the preset root.
///
/// Separators, `..` and absolute paths are rejected. An empty bank or `"."`
/// means the root itself. An empty name is accepted here; it resolves to an
/// unbound preset.
///
/// # Example
///
/// ```rust
/// use cadence_config::paths::check_preset_name;
///
/// assert!(check_preset_name("Lead", "Basses").is_ok());
/// assert!(check_preset_name("Lead", ".").is_ok());
/// assert!(check_preset_name("../Lead", "").is_err());
/// assert!(check_preset_name("Lead", "a/b").is_err());
/// ```
pub fn check_preset_name(name: &str, bank: &str) -> Result<(), ConfigError> {
    let is_single_segment = |segment: &str| {
        !segment.contains(['/', '\\'])
            && Path::new(segment)
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
    };

    if !name.is_empty() && (name == "." || !is_single_segment(name)) {
        return Err(ConfigError::InvalidPresetName(name.to_string()));
    }
    if !bank.is_empty() && bank != "." && !is_single_segment(bank) {
        return Err(ConfigError::InvalidPresetName(bank.to_string()));
    }
    Ok(())
}

/// Get the preset name from a file path.
///
/// Extracts the file stem (filename without extension).
///
/// # Example
///
/// ```rust
/// use cadence_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/Warm Pad.toml"));
/// assert_eq!(name, Some("Warm Pad".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
