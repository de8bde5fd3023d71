//! The seam between the parameter tree and the command-line parser.

use crate::restriction::Coercion;

/// How many value tokens a parameter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Presence flag, no value.
    Flag,
    /// Exactly one value.
    Single,
    /// One or more values.
    List,
}

/// Everything a parser needs to register one parameter.
#[derive(Debug, Clone)]
pub struct ArgDeclaration {
    /// Lineage name, without leading dash
    pub flag: String,
    /// Help section (flattened group lineage), `None` for root parameters
    pub heading: Option<String>,
    /// Help text, including choices and the default value
    pub help: String,
    /// Placeholder shown in usage
    pub value_name: String,
    /// Value count
    pub arity: Arity,
    /// Whether the parameter must be supplied
    pub required: bool,
    /// Converts and checks every raw value
    pub coercion: Coercion,
}

/// Receives parameter registrations.
///
/// Implemented by the clap-backed parser; tests record declarations instead.
pub trait ArgSink {
    /// Registers one parameter.
    fn add_argument(&mut self, declaration: ArgDeclaration);
}
