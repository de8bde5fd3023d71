//! TOML settings file parsing.

use std::path::Path;

use serde::Deserialize;

use super::{SettingsError, defaults};
use crate::restriction::RestrictionPolicy;

/// Root settings structure.
///
/// All fields are optional; [`Settings::validate`] checks the ones that are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Restriction handling
    #[serde(default)]
    pub restrictions: RestrictionsSection,

    /// Document output
    #[serde(default)]
    pub documents: DocumentsSection,
}

/// Restriction handling section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestrictionsSection {
    /// "warn" (default) or "reject"
    pub policy: Option<RestrictionPolicy>,
}

/// Document output section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentsSection {
    /// Indentation in spaces; 0 writes a single line
    pub indent: Option<usize>,

    /// Suffix of the default tool descriptor filename
    pub tool_descriptor_suffix: Option<String>,
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value is out of range.
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the values that are set.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(indent) = self.documents.indent {
            if indent > defaults::MAX_INDENT {
                return Err(SettingsError::InvalidIndent {
                    value: indent,
                    max: defaults::MAX_INDENT,
                });
            }
        }
        if let Some(suffix) = &self.documents.tool_descriptor_suffix {
            if suffix.is_empty() || suffix.contains(['/', '\\']) {
                return Err(SettingsError::InvalidSuffix(suffix.clone()));
            }
        }
        Ok(())
    }

    /// Returns the restriction policy.
    #[must_use]
    pub fn policy(&self) -> RestrictionPolicy {
        self.restrictions.policy.unwrap_or(defaults::POLICY)
    }

    /// Returns the document indentation.
    #[must_use]
    pub fn indent(&self) -> usize {
        self.documents.indent.unwrap_or(defaults::INDENT)
    }

    /// Returns the default tool descriptor suffix.
    #[must_use]
    pub fn tool_descriptor_suffix(&self) -> &str {
        self.documents
            .tool_descriptor_suffix
            .as_deref()
            .unwrap_or(defaults::TOOL_DESCRIPTOR_SUFFIX)
    }
}
