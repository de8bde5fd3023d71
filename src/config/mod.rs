//! Settings for the command-line bridge.
//!
//! Settings come from an optional TOML file; every value has a built-in
//! default ([`defaults`]):
//!
//! ```toml
//! [restrictions]
//! policy = "warn"        # or "reject"
//!
//! [documents]
//! indent = 2
//! tool_descriptor_suffix = ".ctd"
//! ```

pub mod defaults;
mod error;
mod settings;

#[cfg(test)]
mod settings_tests;

pub use error::SettingsError;
pub use settings::{DocumentsSection, RestrictionsSection, Settings};
