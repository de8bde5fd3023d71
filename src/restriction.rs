//! Advisory restrictions on parameter values.
//!
//! A restriction is either a numeric range or a file-extension allow-list.
//! Both are advisory by default: a violating value is reported with a
//! warning and still accepted. [`RestrictionPolicy::Reject`] turns
//! violations into parse errors for callers that want strict checking.
//!
//! [`Coercion`] bundles type conversion, enumerated choices and the
//! restriction check into the single function the command-line parser
//! calls for every raw value.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

use crate::param::{ParamType, Value};

#[cfg(test)]
#[path = "restriction_tests.rs"]
mod tests;

/// What to do with a value that violates its restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictionPolicy {
    /// Log a warning and accept the value.
    #[default]
    Warn,
    /// Fail parsing of the offending parameter.
    Reject,
}

/// A value that falls outside its parameter's restriction.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Lineage name of the parameter
    pub parameter: String,
    /// What was violated
    pub kind: ViolationKind,
}

/// The specific restriction a value violated.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// The value is smaller than the declared minimum.
    BelowMinimum {
        /// Offending value
        value: Value,
        /// Declared minimum
        min: Value,
    },
    /// The value is larger than the declared maximum.
    AboveMaximum {
        /// Offending value
        value: Value,
        /// Declared maximum
        max: Value,
    },
    /// The file name ends in none of the allowed extensions.
    UnsupportedFormat {
        /// Offending file name
        filename: String,
        /// Allowed extensions, without the leading dot
        allowed: Vec<String>,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameter = &self.parameter;
        match &self.kind {
            ViolationKind::BelowMinimum { value, min } => {
                write!(f, "Parameter {parameter} value {value} is below minimum {min}")
            }
            ViolationKind::AboveMaximum { value, max } => {
                write!(f, "Parameter {parameter} value {value} is above maximum {max}")
            }
            ViolationKind::UnsupportedFormat { filename, allowed } => write!(
                f,
                "Parameter {parameter}'s file extension not in allowed list. Allowed: {}. Actual: {filename}",
                allowed.join("/")
            ),
        }
    }
}

// ============================================================================
// NumericRange
// ============================================================================

/// An inclusive numeric range; either bound may be open.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRange {
    parameter: String,
    min: Option<Value>,
    max: Option<Value>,
}

impl NumericRange {
    /// Creates a range check for the named parameter.
    #[must_use]
    pub fn new(parameter: impl Into<String>, min: Option<Value>, max: Option<Value>) -> Self {
        Self {
            parameter: parameter.into(),
            min,
            max,
        }
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    /// Returns the upper bound.
    #[must_use]
    pub const fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }

    /// Checks `value` against the bounds.
    ///
    /// Non-numeric values are never reported.
    #[must_use]
    pub fn check(&self, value: &Value) -> Option<Violation> {
        if let Some(min) = &self.min {
            if compare(value, min) == Some(Ordering::Less) {
                return Some(self.violation(ViolationKind::BelowMinimum {
                    value: value.clone(),
                    min: min.clone(),
                }));
            }
        }
        if let Some(max) = &self.max {
            if compare(value, max) == Some(Ordering::Greater) {
                return Some(self.violation(ViolationKind::AboveMaximum {
                    value: value.clone(),
                    max: max.clone(),
                }));
            }
        }
        None
    }

    /// Returns the descriptor form `min:max`, with empty text for an open bound.
    #[must_use]
    pub fn ctd_string(&self) -> String {
        let bound = |b: &Option<Value>| b.as_ref().map(ToString::to_string).unwrap_or_default();
        format!("{}:{}", bound(&self.min), bound(&self.max))
    }

    fn violation(&self, kind: ViolationKind) -> Violation {
        Violation {
            parameter: self.parameter.clone(),
            kind,
        }
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

// ============================================================================
// FileFormats
// ============================================================================

/// An allow-list of file extensions, e.g. `fastq` and `fastq.gz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFormats {
    parameter: String,
    formats: Vec<String>,
}

impl FileFormats {
    /// Creates an extension check for the named parameter.
    ///
    /// Extensions are given without the leading dot.
    #[must_use]
    pub fn new<I, S>(parameter: impl Into<String>, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameter: parameter.into(),
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the allowed extensions.
    #[must_use]
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Checks that `filename` ends in one of the allowed extensions.
    ///
    /// Matching is a case-sensitive literal suffix test against `.<ext>`,
    /// so multi-part extensions such as `fastq.gz` work.
    #[must_use]
    pub fn check(&self, filename: &str) -> Option<Violation> {
        let matched = self
            .formats
            .iter()
            .any(|format| filename.ends_with(&format!(".{format}")));
        if matched {
            return None;
        }
        Some(Violation {
            parameter: self.parameter.clone(),
            kind: ViolationKind::UnsupportedFormat {
                filename: filename.to_string(),
                allowed: self.formats.clone(),
            },
        })
    }

    /// Returns the descriptor form `*.a,*.b`.
    #[must_use]
    pub fn ctd_string(&self) -> String {
        self.formats
            .iter()
            .map(|format| format!("*.{format}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ============================================================================
// Restriction
// ============================================================================

/// The restriction attached to a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    /// Numeric bounds.
    Range(NumericRange),
    /// File-extension allow-list.
    Formats(FileFormats),
}

impl Restriction {
    /// Checks a coerced value.
    #[must_use]
    pub fn check(&self, value: &Value) -> Option<Violation> {
        match self {
            Self::Range(range) => range.check(value),
            Self::Formats(formats) => value.as_str().and_then(|name| formats.check(name)),
        }
    }

    /// Returns the descriptor attribute name and value for this restriction.
    #[must_use]
    pub fn ctd_attribute(&self) -> (&'static str, String) {
        match self {
            Self::Range(range) => ("restrictions", range.ctd_string()),
            Self::Formats(formats) => ("supported_formats", formats.ctd_string()),
        }
    }
}

// ============================================================================
// Coercion
// ============================================================================

/// The coercion-and-check function registered with the command-line parser.
///
/// Cheap to clone and safe to share with the parser's value-parser machinery.
#[derive(Debug, Clone)]
pub struct Coercion {
    parameter: String,
    param_type: ParamType,
    choices: Option<Vec<Value>>,
    restriction: Option<Restriction>,
    policy: RestrictionPolicy,
}

impl Coercion {
    /// Creates a coercion for the named parameter.
    #[must_use]
    pub const fn new(
        parameter: String,
        param_type: ParamType,
        choices: Option<Vec<Value>>,
        restriction: Option<Restriction>,
        policy: RestrictionPolicy,
    ) -> Self {
        Self {
            parameter,
            param_type,
            choices,
            restriction,
            policy,
        }
    }

    /// Returns the type values are coerced to.
    #[must_use]
    pub const fn param_type(&self) -> ParamType {
        self.param_type
    }

    /// Coerces `raw`, enforces choices and checks the restriction.
    ///
    /// A restriction violation is logged once as a warning and the value is
    /// returned unchanged, unless the policy is [`RestrictionPolicy::Reject`].
    ///
    /// # Errors
    ///
    /// Returns a message if `raw` has the wrong type, is not one of the
    /// declared choices, or violates the restriction under `Reject`.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        let value = self.param_type.coerce(raw)?;

        if let Some(choices) = &self.choices {
            if !choices.contains(&value) {
                let allowed: Vec<String> = choices.iter().map(ToString::to_string).collect();
                return Err(format!(
                    "'{raw}' is not one of the allowed values: {}",
                    allowed.join(", ")
                ));
            }
        }

        if let Some(violation) = self.restriction.as_ref().and_then(|r| r.check(&value)) {
            match self.policy {
                RestrictionPolicy::Warn => {
                    tracing::warn!(parameter = %self.parameter, "{violation}");
                }
                RestrictionPolicy::Reject => return Err(violation.to_string()),
            }
        }

        Ok(value)
    }
}
