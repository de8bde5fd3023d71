//! Run-mode directives.
//!
//! Directives are pulled out of the raw arguments before the parameter
//! parser sees them, then resolved into a single [`RunMode`]. Describing the
//! tool wins over everything else.

use std::path::PathBuf;

use super::BridgeError;

/// Directive flag names, without the leading `--`.
pub mod flag {
    /// Write the tool descriptor and stop.
    pub const WRITE_TOOL_CTD: &str = "write_tool_ctd";
    /// Load parameter values from a document.
    pub const INPUT_CTD: &str = "input_ctd";
    /// Write the parameter values of this run.
    pub const WRITE_PARAM_CTD: &str = "write_param_ctd";
    /// Add an execution log to the written values.
    pub const LOG_OUTPUT: &str = "log_output";
    /// Capture standard streams into the execution log.
    pub const LOG_STD_STREAMS: &str = "log_std_streams";
    /// Clap's built-in help flag.
    pub const HELP: &str = "help";

    /// Long flags a top-level parameter cannot take.
    pub const RESERVED: [&str; 6] = [
        HELP,
        WRITE_TOOL_CTD,
        INPUT_CTD,
        WRITE_PARAM_CTD,
        LOG_OUTPUT,
        LOG_STD_STREAMS,
    ];
}

/// Directives found on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// `--write_tool_ctd`, with its optional filename
    pub write_tool_ctd: Option<Option<PathBuf>>,
    /// `--input_ctd FILENAME`
    pub input_ctd: Option<PathBuf>,
    /// `--write_param_ctd FILENAME`
    pub write_param_ctd: Option<PathBuf>,
    /// `--log_output`
    pub log_output: bool,
    /// `--log_std_streams`
    pub log_std_streams: bool,
}

/// How the execution log is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// No log record.
    Off,
    /// The tool reports its own output through `finalize_log`.
    Manual,
    /// Standard streams are captured and finalized automatically.
    CaptureStreams,
}

/// Where and how to write the parameter values of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamOutput {
    /// Target file
    pub path: PathBuf,
    /// Log handling
    pub log: LogMode,
}

/// The resolved run mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Write the tool descriptor and stop.
    DescribeTool {
        /// Explicit target, or `None` for the tool-name default
        output: Option<PathBuf>,
    },
    /// Parse parameters and hand control to the tool.
    Invoke {
        /// Document supplying base values
        input: Option<PathBuf>,
        /// Values document to write
        output: Option<ParamOutput>,
    },
}

impl Directives {
    /// Splits directives from the remaining parameter tokens.
    ///
    /// Both `--flag value` and `--flag=value` are accepted. Everything after
    /// a bare `--` is passed through untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::MissingDirectiveValue`] when a directive that
    /// needs a filename has none.
    pub fn scan(args: &[String]) -> Result<(Self, Vec<String>), BridgeError> {
        let mut directives = Self::default();
        let mut rest = Vec::with_capacity(args.len());
        let mut iter = args.iter().peekable();

        while let Some(arg) = iter.next() {
            if arg == "--" {
                rest.push(arg.clone());
                rest.extend(iter.by_ref().cloned());
                break;
            }
            let Some(body) = arg.strip_prefix("--") else {
                rest.push(arg.clone());
                continue;
            };
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };

            let mut value = |required: bool| -> Result<Option<PathBuf>, BridgeError> {
                let value = inline
                    .clone()
                    .or_else(|| iter.next_if(|next| !next.starts_with('-')).cloned());
                match value {
                    Some(value) => Ok(Some(PathBuf::from(value))),
                    None if required => Err(BridgeError::MissingDirectiveValue {
                        flag: name.to_string(),
                    }),
                    None => Ok(None),
                }
            };

            match name {
                flag::WRITE_TOOL_CTD => directives.write_tool_ctd = Some(value(false)?),
                flag::INPUT_CTD => directives.input_ctd = value(true)?,
                flag::WRITE_PARAM_CTD => directives.write_param_ctd = value(true)?,
                flag::LOG_OUTPUT if inline.is_none() => directives.log_output = true,
                flag::LOG_STD_STREAMS if inline.is_none() => directives.log_std_streams = true,
                _ => rest.push(arg.clone()),
            }
        }

        tracing::debug!(?directives, "Scanned directives");
        Ok((directives, rest))
    }

    /// Picks the run mode.
    #[must_use]
    pub fn resolve(self) -> RunMode {
        if let Some(output) = self.write_tool_ctd {
            return RunMode::DescribeTool { output };
        }

        let log = match (self.log_output, self.log_std_streams) {
            (true, true) => LogMode::CaptureStreams,
            (true, false) => LogMode::Manual,
            (false, capture) => {
                if capture {
                    tracing::debug!("--log_std_streams has no effect without --log_output");
                }
                LogMode::Off
            }
        };

        let output = match self.write_param_ctd {
            Some(path) => Some(ParamOutput { path, log }),
            None => {
                if log != LogMode::Off {
                    tracing::debug!("--log_output has no effect without --write_param_ctd");
                }
                None
            }
        };

        RunMode::Invoke {
            input: self.input_ctd,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    mod scan {
        use super::*;

        #[test]
        fn directives_are_removed_from_tokens() {
            let (directives, rest) = Directives::scan(&args(&[
                "-n",
                "3",
                "--input_ctd",
                "in.ctd",
                "--write_param_ctd=out.ctd",
                "--log_output",
                "-files",
                "a",
            ]))
            .unwrap();

            assert_eq!(directives.input_ctd, Some(PathBuf::from("in.ctd")));
            assert_eq!(directives.write_param_ctd, Some(PathBuf::from("out.ctd")));
            assert!(directives.log_output);
            assert!(!directives.log_std_streams);
            assert_eq!(rest, ["-n", "3", "-files", "a"]);
        }

        #[test]
        fn write_tool_ctd_filename_is_optional() {
            let (directives, rest) = Directives::scan(&args(&["--write_tool_ctd", "-n", "1"])).unwrap();

            assert_eq!(directives.write_tool_ctd, Some(None));
            assert_eq!(rest, ["-n", "1"]);

            let (directives, _) = Directives::scan(&args(&["--write_tool_ctd", "tool.ctd"])).unwrap();
            assert_eq!(directives.write_tool_ctd, Some(Some(PathBuf::from("tool.ctd"))));
        }

        #[test]
        fn missing_filename_is_an_error() {
            let result = Directives::scan(&args(&["--input_ctd", "-n", "1"]));

            assert!(matches!(
                result,
                Err(BridgeError::MissingDirectiveValue { flag }) if flag == "input_ctd"
            ));
            assert!(Directives::scan(&args(&["--write_param_ctd"])).is_err());
        }

        #[test]
        fn other_long_flags_pass_through() {
            let (directives, rest) = Directives::scan(&args(&["--help", "--input"])).unwrap();

            assert_eq!(directives, Directives::default());
            assert_eq!(rest, ["--help", "--input"]);
        }

        #[test]
        fn tokens_after_separator_are_untouched() {
            let (directives, rest) = Directives::scan(&args(&["--", "--log_output"])).unwrap();

            assert!(!directives.log_output);
            assert_eq!(rest, ["--", "--log_output"]);
        }
    }

    mod resolve {
        use super::*;

        #[test]
        fn describe_tool_wins() {
            let directives = Directives {
                write_tool_ctd: Some(None),
                input_ctd: Some("in.ctd".into()),
                write_param_ctd: Some("out.ctd".into()),
                log_output: true,
                log_std_streams: true,
            };

            assert_eq!(directives.resolve(), RunMode::DescribeTool { output: None });
        }

        #[test]
        fn logging_modes() {
            let base = Directives {
                write_param_ctd: Some("out.ctd".into()),
                ..Directives::default()
            };
            let mode = |log_output, log_std_streams| {
                let directives = Directives {
                    log_output,
                    log_std_streams,
                    ..base.clone()
                };
                match directives.resolve() {
                    RunMode::Invoke {
                        output: Some(output),
                        ..
                    } => output.log,
                    other => panic!("unexpected mode {other:?}"),
                }
            };

            assert_eq!(mode(false, false), LogMode::Off);
            assert_eq!(mode(true, false), LogMode::Manual);
            assert_eq!(mode(true, true), LogMode::CaptureStreams);
            assert_eq!(mode(false, true), LogMode::Off);
        }

        #[test]
        fn logging_without_output_is_ignored() {
            let directives = Directives {
                log_output: true,
                input_ctd: Some("in.ctd".into()),
                ..Directives::default()
            };

            assert_eq!(
                directives.resolve(),
                RunMode::Invoke {
                    input: Some("in.ctd".into()),
                    output: None
                }
            );
        }
    }
}
