//! Error types for running the command-line bridge.

use thiserror::Error;

use crate::document::DocumentError;

/// Error type for [`CommandLineBridge::run`](super::CommandLineBridge::run).
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A directive that needs a filename was given none.
    #[error("Directive --{flag} expects a filename")]
    MissingDirectiveValue {
        /// Directive name
        flag: String,
    },

    /// Reading or writing a descriptor document failed.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The parameter tokens were rejected, or help was requested.
    ///
    /// clap renders usage and help through this error's `Display`.
    #[error("{0}")]
    Parse(#[from] clap::Error),
}

impl BridgeError {
    /// Returns `true` if the error carries help output rather than a failure.
    #[must_use]
    pub fn is_help(&self) -> bool {
        use clap::error::ErrorKind;
        matches!(
            self,
            Self::Parse(e) if matches!(
                e.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            )
        )
    }
}
