//! Error types for preset and settings operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, writing or applying presets and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The document was written by another manufacturer or plugin.
    #[error("preset belongs to manufacturer '{manufacturer}', plugin '{plugin}'")]
    ForeignPreset {
        /// Manufacturer tag found in the document.
        manufacturer: String,
        /// Plugin tag found in the document.
        plugin: String,
    },

    /// Preset version must be a positive integer.
    #[error("invalid preset version: {0}")]
    InvalidVersion(i64),

    /// The document carries no parameter state.
    #[error("preset document has no state")]
    MissingState,

    /// A required attribute is absent or empty.
    #[error("missing attribute: {0}")]
    MissingAttribute(&'static str),

    /// A state document is keyed by another identifier.
    #[error("expected state '{expected}', found '{found}'")]
    StateKindMismatch {
        /// Identifier this reader accepts.
        expected: String,
        /// Identifier found in the document.
        found: String,
    },

    /// The preset has no backing file to read or write.
    #[error("preset '{0}' is not bound to a file")]
    NotFileBacked(String),

    /// A four-character code in the configuration is malformed.
    #[error("invalid four-character code: '{0}'")]
    InvalidCode(String),

    /// A preset name or bank would leave the preset root.
    #[error("invalid preset name or bank: '{0}'")]
    InvalidPresetName(String),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by the document content rather than I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConfigError::TomlParse(_)
                | ConfigError::ForeignPreset { .. }
                | ConfigError::InvalidVersion(_)
                | ConfigError::MissingState
                | ConfigError::MissingAttribute(_)
                | ConfigError::StateKindMismatch { .. }
        )
    }
}
