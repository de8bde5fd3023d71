//! Turns a loaded parameter-value document back into command-line tokens.
//!
//! The tokens are placed in front of the literal command line, so anything
//! typed by hand overrides what the document recorded.

use std::collections::HashSet;

use crate::document::LoadedEntry;
use crate::param::ArgumentGroup;
use crate::table::FlatTable;

/// Synthesizes tokens for the parameters declared under one group.
#[derive(Debug, Clone)]
pub struct Translator {
    known: HashSet<String>,
}

impl Translator {
    /// Creates a translator accepting every leaf below `root`.
    #[must_use]
    pub fn for_group(root: &ArgumentGroup) -> Self {
        let known = root
            .items()
            .into_iter()
            .map(|item| item.lineage().flag_token())
            .collect();
        Self { known }
    }

    /// Produces the token sequence for a loaded table, in table order.
    ///
    /// Flags contribute only their token. Parameters with no values are
    /// left out entirely so a later literal token can still satisfy a
    /// required parameter. Entries for undeclared parameters are skipped.
    #[must_use]
    pub fn translate(&self, loaded: &FlatTable<LoadedEntry>) -> Vec<String> {
        let mut tokens = Vec::new();
        for (flag, entry) in loaded.iter() {
            if !self.known.contains(flag) {
                tracing::warn!("Ignoring unknown parameter `{flag}` in loaded document");
                continue;
            }
            match entry {
                LoadedEntry::Flag => tokens.push(flag.to_string()),
                LoadedEntry::Values(values) if values.is_empty() => {
                    tracing::debug!(parameter = flag, "No recorded values, leaving to command line");
                }
                LoadedEntry::Values(values) => {
                    tokens.push(flag.to_string());
                    tokens.extend(values.iter().cloned());
                }
            }
        }
        tracing::debug!(count = tokens.len(), "Synthesized tokens from loaded document");
        tokens
    }
}
