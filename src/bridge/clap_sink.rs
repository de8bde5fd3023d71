//! Command-line parsing backed by clap.
//!
//! The parameter tree registers itself through [`ArgSink`]; this module turns
//! those registrations into a `clap::Command` built at run time.
//!
//! Lineage flags are written with a single dash (`-group:param`), which clap
//! reserves for short options. Tokens that exactly match a registered
//! lineage flag are rewritten to the long form before parsing.

use std::collections::HashSet;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::param::{ParamValue, ToolInfo, Value};
use crate::table::FlatTable;

use super::directive::flag;
use super::sink::{ArgDeclaration, ArgSink, Arity};

const DIRECTIVE_HEADING: &str = "Descriptor documents";

/// A parser under construction.
#[derive(Debug)]
pub struct ClapSink {
    command: Command,
    registered: Vec<(String, Arity)>,
    flags: HashSet<String>,
}

impl ClapSink {
    /// Starts a parser for the given tool.
    ///
    /// Directive flags are registered for help output only; they are removed
    /// from the tokens before parsing.
    #[must_use]
    pub fn new(info: &ToolInfo) -> Self {
        let mut command = Command::new(info.name.clone())
            .no_binary_name(true)
            .args_override_self(true);
        if let Some(description) = &info.description {
            command = command.about(description.clone());
        }

        command = command
            .arg(
                Arg::new(flag::WRITE_TOOL_CTD)
                    .long(flag::WRITE_TOOL_CTD)
                    .value_name("FILENAME")
                    .num_args(0..=1)
                    .help("Write the tool descriptor and exit")
                    .help_heading(DIRECTIVE_HEADING),
            )
            .arg(
                Arg::new(flag::INPUT_CTD)
                    .long(flag::INPUT_CTD)
                    .value_name("FILENAME")
                    .help("Load parameter values from a descriptor")
                    .help_heading(DIRECTIVE_HEADING),
            )
            .arg(
                Arg::new(flag::WRITE_PARAM_CTD)
                    .long(flag::WRITE_PARAM_CTD)
                    .value_name("FILENAME")
                    .help("Write the parameter values of this run")
                    .help_heading(DIRECTIVE_HEADING),
            )
            .arg(
                Arg::new(flag::LOG_OUTPUT)
                    .long(flag::LOG_OUTPUT)
                    .action(ArgAction::SetTrue)
                    .help("Add an execution log to the parameter descriptor")
                    .help_heading(DIRECTIVE_HEADING),
            )
            .arg(
                Arg::new(flag::LOG_STD_STREAMS)
                    .long(flag::LOG_STD_STREAMS)
                    .action(ArgAction::SetTrue)
                    .help("Capture standard output and error into the execution log")
                    .help_heading(DIRECTIVE_HEADING),
            );

        Self {
            command,
            registered: Vec::new(),
            flags: HashSet::new(),
        }
    }

    /// Returns the command built so far.
    #[must_use]
    pub const fn command(&self) -> &Command {
        &self.command
    }

    /// Consumes the sink and returns the finished command.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command
    }

    /// Rewrites single-dash lineage flags to clap's long form.
    #[must_use]
    pub fn normalize(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .map(|token| match token.strip_prefix('-') {
                Some(name) if !name.starts_with('-') && self.flags.contains(name) => {
                    format!("--{name}")
                }
                _ => token.clone(),
            })
            .collect()
    }

    /// Parses tokens and returns the values that were supplied.
    ///
    /// Parameters absent from the tokens are absent from the table; their
    /// defaults are applied by the tree, not the parser.
    ///
    /// # Errors
    ///
    /// Returns clap's error for unknown flags, missing required parameters,
    /// invalid values, or a help request.
    pub fn parse(self, tokens: &[String]) -> Result<FlatTable<ParamValue>, clap::Error> {
        let tokens = self.normalize(tokens);
        tracing::debug!(?tokens, "Parsing parameter tokens");

        let matches = self.command.try_get_matches_from(tokens)?;
        let mut table = FlatTable::new();
        for (name, arity) in &self.registered {
            if let Some(value) = extract(&matches, name, *arity) {
                table.insert(name.clone(), value);
            }
        }
        Ok(table)
    }
}

fn extract(matches: &ArgMatches, name: &str, arity: Arity) -> Option<ParamValue> {
    if matches.value_source(name) != Some(ValueSource::CommandLine) {
        return None;
    }
    match arity {
        Arity::Flag => Some(ParamValue::Scalar(Value::Bool(matches.get_flag(name)))),
        Arity::Single => matches.get_one::<Value>(name).cloned().map(ParamValue::Scalar),
        Arity::List => matches
            .get_many::<Value>(name)
            .map(|values| ParamValue::List(values.cloned().collect())),
    }
}

impl ArgSink for ClapSink {
    fn add_argument(&mut self, declaration: ArgDeclaration) {
        let ArgDeclaration {
            flag,
            heading,
            help,
            value_name,
            arity,
            required,
            coercion,
        } = declaration;

        let mut arg = Arg::new(flag.clone()).long(flag.clone()).help(help);
        if let Some(heading) = heading {
            arg = arg.help_heading(heading);
        }

        arg = match arity {
            Arity::Flag => arg.action(ArgAction::SetTrue),
            Arity::Single | Arity::List => {
                let numeric = coercion.param_type().is_numeric();
                let arg = arg
                    .action(ArgAction::Set)
                    .value_name(value_name)
                    .required(required)
                    .allow_negative_numbers(numeric)
                    .value_parser(move |raw: &str| coercion.parse(raw));
                if arity == Arity::List {
                    arg.num_args(1..)
                } else {
                    arg.num_args(1)
                }
            }
        };

        self.command = std::mem::take(&mut self.command).arg(arg);
        self.flags.insert(flag.clone());
        self.registered.push((flag, arity));
    }
}
