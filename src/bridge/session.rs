//! The result of a successful parse.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::document::{self, DocumentError, Emission, LogRecord};
use crate::param::{ArgumentItem, ParamValue, ToolDescriptor, Value};
use crate::time::Clock;

use super::capture::{StreamCapture, TeeWriter};

/// What the tool reports when it finishes.
///
/// Fields left `None` fall back to captured streams, or empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOutcome {
    /// Standard output text
    pub stdout: Option<String>,
    /// Standard error text
    pub stderr: Option<String>,
    /// Exit status
    pub exit_status: Option<i32>,
}

impl LogOutcome {
    /// An outcome carrying only an exit status.
    #[must_use]
    pub fn status(exit_status: i32) -> Self {
        Self {
            exit_status: Some(exit_status),
            ..Self::default()
        }
    }

    /// Sets the standard output text.
    #[must_use]
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = Some(stdout.into());
        self
    }

    /// Sets the standard error text.
    #[must_use]
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = Some(stderr.into());
        self
    }
}

/// A log record waiting for the tool to finish.
struct PendingLog {
    path: PathBuf,
    started: chrono::DateTime<chrono::Utc>,
    capture: Option<StreamCapture>,
}

/// Resolved parameters of one run.
///
/// When an execution log was requested, the parameter-value document is
/// written by [`finalize_log`](Self::finalize_log), at most once. With
/// stream capture on, dropping an unfinalized invocation finalizes it.
pub struct Invocation {
    tool: ToolDescriptor,
    written: Option<PathBuf>,
    pending: Option<PendingLog>,
    finalized: bool,
    clock: Arc<dyn Clock>,
    indent: usize,
}

impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("tool", &self.tool.info().name)
            .field("log", &self.pending.as_ref().map(|p| &p.path))
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}

impl Invocation {
    pub(crate) fn new(tool: ToolDescriptor, clock: Arc<dyn Clock>, indent: usize) -> Self {
        Self {
            tool,
            written: None,
            pending: None,
            finalized: false,
            clock,
            indent,
        }
    }

    /// Records that the parameter-value document was already written.
    pub(crate) fn with_written(mut self, path: PathBuf) -> Self {
        self.written = Some(path);
        self
    }

    /// Arms the execution log; the document is written on finalize.
    pub(crate) fn with_log(mut self, path: PathBuf, capture: Option<StreamCapture>) -> Self {
        self.pending = Some(PendingLog {
            path,
            started: self.clock.now(),
            capture,
        });
        self
    }

    /// Returns the tool with call values stored.
    #[must_use]
    pub const fn tool(&self) -> &ToolDescriptor {
        &self.tool
    }

    /// Looks up a parameter by lineage name (`a:b`) or flag token (`-a:b`).
    #[must_use]
    pub fn item(&self, name: &str) -> Option<&ArgumentItem> {
        self.tool.root().find(name)
    }

    /// Returns a parameter's call value, or its default.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.item(name).and_then(ArgumentItem::value)
    }

    fn scalar(&self, name: &str) -> Option<&Value> {
        self.value(name).and_then(ParamValue::as_scalar)
    }

    /// Returns an integer parameter.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.scalar(name).and_then(Value::as_i64)
    }

    /// Returns a float parameter.
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.scalar(name).and_then(Value::as_f64)
    }

    /// Returns a string parameter.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.scalar(name).and_then(Value::as_str)
    }

    /// Returns a boolean parameter; unknown names read as `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.scalar(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns the values of a list parameter.
    #[must_use]
    pub fn list(&self, name: &str) -> Option<&[Value]> {
        self.value(name).and_then(ParamValue::as_list)
    }

    /// Returns the parameter-value document written right after parsing.
    #[must_use]
    pub fn written_path(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    /// Returns the file the execution log will be written to.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|p| p.path.as_path())
    }

    /// Returns `true` once the execution log has been written.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Standard output, copied into the log when stream capture is on.
    #[must_use]
    pub fn stdout(&self) -> TeeWriter<io::Stdout> {
        TeeWriter::new(io::stdout(), self.capture().map(|c| c.stdout.clone()))
    }

    /// Standard error, copied into the log when stream capture is on.
    #[must_use]
    pub fn stderr(&self) -> TeeWriter<io::Stderr> {
        TeeWriter::new(io::stderr(), self.capture().map(|c| c.stderr.clone()))
    }

    fn capture(&self) -> Option<&StreamCapture> {
        self.pending.as_ref().and_then(|p| p.capture.as_ref())
    }

    /// Writes the parameter-value document with a completed log record.
    ///
    /// Returns the written path, or `None` if no log was requested or it was
    /// already finalized.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written. The invocation
    /// counts as finalized either way.
    pub fn finalize_log(&mut self, outcome: LogOutcome) -> Result<Option<PathBuf>, DocumentError> {
        if self.finalized {
            return Ok(None);
        }
        let Some(pending) = &self.pending else {
            return Ok(None);
        };
        self.finalized = true;

        let captured = |select: fn(&StreamCapture) -> String| {
            pending.capture.as_ref().map(select).unwrap_or_default()
        };
        let record = LogRecord {
            stopped: Some(self.clock.now()),
            exit_status: outcome.exit_status,
            errors: Some(outcome.stderr.unwrap_or_else(|| captured(|c| c.stderr.contents()))),
            message: Some(outcome.stdout.unwrap_or_else(|| captured(|c| c.stdout.contents()))),
            ..LogRecord::started(pending.started)
        };

        let document = document::describe(&self.tool, Emission::ParameterValues, Some(&record));
        document::write(&pending.path, &document, self.indent)?;
        tracing::info!(path = %pending.path.display(), "Parameter and log container written");
        Ok(Some(pending.path.clone()))
    }

    /// Runs the tool body and finalizes the log on every exit path.
    ///
    /// An error from `body` is written to [`stderr`](Self::stderr), so it is
    /// captured too, and yields exit status 1. Returns the exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the log document cannot be written.
    pub fn scoped<F, E>(&mut self, body: F) -> Result<i32, DocumentError>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
        E: fmt::Display,
    {
        let status = match body(&mut *self) {
            Ok(()) => 0,
            Err(error) => {
                use io::Write;
                let _ = writeln!(self.stderr(), "Error: {error}");
                1
            }
        };
        self.finalize_log(LogOutcome::status(status))?;
        Ok(status)
    }
}

impl Drop for Invocation {
    fn drop(&mut self) {
        if self.finalized || self.capture().is_none() {
            return;
        }
        if let Err(e) = self.finalize_log(LogOutcome::default()) {
            tracing::error!("Failed to write execution log: {e}");
        }
    }
}
