//! Lineage names: the cross-surface key of every parameter.
//!
//! A parameter nested as `subparams > subsubsetting > param_3` is known as
//! `subparams:subsubsetting:param_3` everywhere: as the command-line flag
//! `-subparams:subsubsetting:param_3`, as the key the parser reports values
//! under, and as the path reconstructed while loading a document.
//! The synthetic root group never contributes a segment.

use std::fmt;

/// Separator between lineage segments.
pub const SEPARATOR: char = ':';

/// Prefix that turns a lineage name into a command-line flag token.
pub const FLAG_PREFIX: &str = "-";

/// The ordered path of group names from the root (exclusive) down to a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Lineage(Vec<String>);

impl Lineage {
    /// The lineage of the synthetic root group (no segments).
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the lineage of a child named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// Parses a flag token or lineage name (`-a:b`, `--a:b` or `a:b`).
    ///
    /// Returns `None` if any segment is empty.
    #[must_use]
    pub fn from_flag(token: &str) -> Option<Self> {
        let name = token.trim_start_matches('-');
        if name.is_empty() {
            return None;
        }
        let segments: Vec<String> = name.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self(segments))
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` for the synthetic root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the last segment (the node's own name).
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns the colon-joined name, e.g. `subparams:param_1`.
    #[must_use]
    pub fn flag_name(&self) -> String {
        self.0.join(&SEPARATOR.to_string())
    }

    /// Returns the command-line token, e.g. `-subparams:param_1`.
    #[must_use]
    pub fn flag_token(&self) -> String {
        format!("{FLAG_PREFIX}{}", self.flag_name())
    }
}

impl fmt::Display for Lineage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flag_name())
    }
}

/// Checks that `name` can be used as a lineage segment.
///
/// Returns the reason it cannot.
pub(crate) fn check_segment(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name is empty");
    }
    if name.contains(SEPARATOR) {
        return Err("name contains the lineage separator ':'");
    }
    if name.starts_with('-') {
        return Err("name starts with '-'");
    }
    if name.chars().any(char::is_whitespace) {
        return Err("name contains whitespace");
    }
    Ok(())
}
