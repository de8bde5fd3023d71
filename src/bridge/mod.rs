//! Command-line bridge.
//!
//! Runs one pass per process:
//!
//! 1. Pull run-mode directives out of the arguments ([`Directives`]).
//! 2. Describe the tool and stop, or
//! 3. build the token list: tokens synthesized from `--input_ctd` first,
//!    literal tokens after, so the command line overrides the document and
//!    the document overrides declared defaults;
//! 4. register every parameter with clap, parse, and store call values;
//! 5. write the parameter-value document now, or arm the execution log.

mod capture;
mod clap_sink;
mod directive;
mod error;
mod session;
mod sink;

#[cfg(test)]
mod mod_tests;

pub use capture::{CaptureBuffer, StreamCapture, TeeWriter};
pub use clap_sink::ClapSink;
pub use directive::{Directives, LogMode, ParamOutput, RunMode, flag};
pub use error::BridgeError;
pub use session::{Invocation, LogOutcome};
pub use sink::{ArgDeclaration, ArgSink, Arity};

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::document::{self, Emission};
use crate::invocation::Translator;
use crate::param::ToolDescriptor;
use crate::restriction::RestrictionPolicy;
use crate::time::{Clock, SystemClock};

/// What a run produced.
#[derive(Debug)]
pub enum Outcome {
    /// The tool descriptor was written; the tool should exit successfully.
    ToolDescribed(PathBuf),
    /// Parameters were resolved; the tool should do its work.
    Invoked(Invocation),
}

/// Connects a declared tool to the command line and descriptor documents.
pub struct CommandLineBridge {
    tool: ToolDescriptor,
    settings: Settings,
    policy: Option<RestrictionPolicy>,
    clock: Arc<dyn Clock>,
}

impl CommandLineBridge {
    /// Creates a bridge with default settings and the system clock.
    #[must_use]
    pub fn new(tool: ToolDescriptor) -> Self {
        Self {
            tool,
            settings: Settings::default(),
            policy: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Uses the given settings.
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Overrides the restriction policy from the settings.
    #[must_use]
    pub const fn with_policy(mut self, policy: RestrictionPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Uses the given clock for log timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the declared tool.
    #[must_use]
    pub const fn tool(&self) -> &ToolDescriptor {
        &self.tool
    }

    /// Builds the clap command for this tool, e.g. to render help.
    #[must_use]
    pub fn command(&self) -> clap::Command {
        self.sink().into_command()
    }

    fn policy(&self) -> RestrictionPolicy {
        self.policy.unwrap_or_else(|| self.settings.policy())
    }

    fn sink(&self) -> ClapSink {
        let mut sink = ClapSink::new(self.tool.info());
        self.tool.root().declare(&mut sink, self.policy());
        sink
    }

    /// Runs the bridge over the arguments (without the program name).
    ///
    /// # Errors
    ///
    /// Returns an error for a directive without its filename, an unreadable
    /// or malformed input document, rejected parameter tokens (including a
    /// help request), or a document that cannot be written.
    pub fn run<I, T>(self, args: I) -> Result<Outcome, BridgeError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let (directives, rest) = Directives::scan(&args)?;

        match directives.resolve() {
            RunMode::DescribeTool { output } => self.describe_tool(output),
            RunMode::Invoke { input, output } => self.invoke(input, output, &rest),
        }
    }

    fn describe_tool(self, output: Option<PathBuf>) -> Result<Outcome, BridgeError> {
        let path = output.unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}{}",
                self.tool.info().name,
                self.settings.tool_descriptor_suffix()
            ))
        });

        let tree = document::describe(&self.tool, Emission::ToolDescriptor, None);
        document::write(&path, &tree, self.settings.indent())?;
        tracing::info!(path = %path.display(), "Tool descriptor written");
        Ok(Outcome::ToolDescribed(path))
    }

    fn invoke(
        mut self,
        input: Option<PathBuf>,
        output: Option<ParamOutput>,
        rest: &[String],
    ) -> Result<Outcome, BridgeError> {
        let mut tokens = match &input {
            Some(path) => {
                let loaded = document::load(path)?;
                tracing::debug!(path = %path.display(), entries = loaded.len(), "Loaded parameter values");
                Translator::for_group(self.tool.root()).translate(&loaded)
            }
            None => Vec::new(),
        };
        tokens.extend_from_slice(rest);

        let values = self.sink().parse(&tokens)?;
        self.tool.root_mut().store(&values);

        let indent = self.settings.indent();
        let invocation = Invocation::new(self.tool, self.clock, indent);

        let Some(ParamOutput { path, log }) = output else {
            return Ok(Outcome::Invoked(invocation));
        };
        let invocation = match log {
            LogMode::Off => {
                let tree = document::describe(invocation.tool(), Emission::ParameterValues, None);
                document::write(&path, &tree, indent)?;
                tracing::info!(path = %path.display(), "Parameter container written");
                invocation.with_written(path)
            }
            LogMode::Manual => invocation.with_log(path, None),
            LogMode::CaptureStreams => invocation.with_log(path, Some(StreamCapture::new())),
        };
        Ok(Outcome::Invoked(invocation))
    }
}

impl std::fmt::Debug for CommandLineBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLineBridge")
            .field("tool", &self.tool.info().name)
            .field("settings", &self.settings)
            .field("policy", &self.policy())
            .finish_non_exhaustive()
    }
}
