//! Error types for parameter declaration.

use thiserror::Error;

use super::ParamType;

/// A mistake in the tool's own parameter declaration.
///
/// These are programming errors: they are reported when the tree is built,
/// before any command line is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// The name cannot be used as a lineage segment.
    #[error("Invalid parameter name '{name}': {reason}")]
    InvalidName {
        /// The rejected name
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A top-level parameter named like a built-in flag.
    #[error("Parameter name '{name}' is reserved for a built-in flag")]
    ReservedName {
        /// The rejected name
        name: String,
    },

    /// A required parameter was given a default value.
    #[error("Required parameter '{name}' has a default value")]
    RequiredWithDefault {
        /// Lineage name of the parameter
        name: String,
    },

    /// An optional parameter has no default value.
    #[error("Optional parameter '{name}' has no default value")]
    OptionalWithoutDefault {
        /// Lineage name of the parameter
        name: String,
    },

    /// A boolean parameter was declared as a list.
    #[error("Boolean parameter '{name}' cannot be a list")]
    BooleanList {
        /// Lineage name of the parameter
        name: String,
    },

    /// A boolean parameter was declared as required.
    #[error("Boolean parameter '{name}' cannot be required")]
    BooleanRequired {
        /// Lineage name of the parameter
        name: String,
    },

    /// A list default on a scalar parameter, or the other way round.
    #[error("Default of parameter '{name}' must be {expected}")]
    DefaultShape {
        /// Lineage name of the parameter
        name: String,
        /// The expected shape ("a list" or "a single value")
        expected: &'static str,
    },

    /// The default value does not convert to the parameter type.
    #[error("Invalid default for parameter '{name}': {reason}")]
    InvalidDefault {
        /// Lineage name of the parameter
        name: String,
        /// Conversion failure
        reason: String,
    },

    /// A choice does not convert to the parameter type.
    #[error("Invalid choice for parameter '{name}': {reason}")]
    InvalidChoice {
        /// Lineage name of the parameter
        name: String,
        /// Conversion failure
        reason: String,
    },

    /// A range bound does not convert to the parameter type.
    #[error("Invalid range bound for parameter '{name}': {reason}")]
    InvalidRange {
        /// Lineage name of the parameter
        name: String,
        /// Conversion failure
        reason: String,
    },

    /// Both a numeric range and a file-format list were given.
    #[error("Parameter '{name}' declares both a numeric range and file formats")]
    ConflictingRestrictions {
        /// Lineage name of the parameter
        name: String,
    },

    /// A numeric range on a non-numeric parameter.
    #[error("Parameter '{name}' of type {param_type} cannot have a numeric range")]
    RangeOnNonNumeric {
        /// Lineage name of the parameter
        name: String,
        /// Declared type
        param_type: ParamType,
    },

    /// A file-format list on a non-string parameter.
    #[error("Parameter '{name}' of type {param_type} cannot have file formats")]
    FormatsOnNonString {
        /// Lineage name of the parameter
        name: String,
        /// Declared type
        param_type: ParamType,
    },
}
