//! Error types for loading settings.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file.
    #[error("Failed to read settings file '{}': {source}", path.display())]
    FileRead {
        /// Path to the settings file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML settings.
    #[error("Failed to parse TOML settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Indentation out of range.
    #[error("Invalid indent {value}: must be at most {max}")]
    InvalidIndent {
        /// The configured value
        value: usize,
        /// Largest accepted value
        max: usize,
    },

    /// The descriptor suffix cannot form a filename.
    #[error("Invalid tool descriptor suffix '{0}': must be non-empty and contain no path separator")]
    InvalidSuffix(String),
}
