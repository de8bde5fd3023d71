//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use std::path::Path;

use ctdopts::bridge::BridgeError;
use ctdopts::config::{Settings, SettingsError, defaults};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0), including help and describe-and-exit.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Usage error (exit code 1) - rejected parameters, bad settings, broken declaration.
    pub const USAGE_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - unreadable or unwritable documents, tool failure.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common bridge errors.
pub fn print_bridge_hint(error: &BridgeError) {
    match error {
        BridgeError::MissingDirectiveValue { .. } => {
            eprintln!("\nRun with --help to list the descriptor document options.");
        }
        BridgeError::Document(_) => {
            eprintln!("\nRun with --write_tool_ctd to generate a descriptor template.");
        }
        BridgeError::Parse(_) => {}
    }
}

/// Loads settings from the file named by the settings environment variable.
pub fn load_settings() -> Result<Settings, SettingsError> {
    match std::env::var_os(defaults::SETTINGS_ENV) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Ok(Settings::default()),
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Logs go to standard error so they never mix with the tool's output.
pub fn setup_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
