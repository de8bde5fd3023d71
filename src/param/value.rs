//! Parameter types and typed values.
//!
//! [`ParamType`] is the dispatch table for everything that depends on a
//! parameter's type: how raw tokens are coerced and how the type is named
//! in descriptor documents.

use std::fmt;

/// The type of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Free text (also used for file names).
    Str,
    /// Presence flag.
    Bool,
}

impl ParamType {
    /// Returns the type name used in descriptor documents.
    #[must_use]
    pub const fn ctd_name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
            Self::Bool => "boolean",
        }
    }

    /// Parses a descriptor type name.
    #[must_use]
    pub fn from_ctd_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(Self::Int),
            "float" | "double" => Some(Self::Float),
            "string" => Some(Self::Str),
            "boolean" | "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Returns `true` for types a numeric range applies to.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Coerces a raw command-line token into a value of this type.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message if the token is not a valid
    /// representation of this type.
    pub fn coerce(self, raw: &str) -> Result<Value, String> {
        match self {
            Self::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| format!("'{raw}' is not an integer: {e}")),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| format!("'{raw}' is not a number: {e}")),
            Self::Str => Ok(Value::Str(raw.to_string())),
            Self::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                _ => Err(format!("'{raw}' is not a boolean")),
            },
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ctd_name())
    }
}

/// A single typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Str(String),
    /// Boolean value.
    Bool(bool),
}

impl Value {
    /// Returns the type this value belongs to.
    #[must_use]
    pub const fn param_type(&self) -> ParamType {
        match self {
            Self::Int(_) => ParamType::Int,
            Self::Float(_) => ParamType::Float,
            Self::Str(_) => ParamType::Str,
            Self::Bool(_) => ParamType::Bool,
        }
    }

    /// Converts this value to `target`.
    ///
    /// Integers widen to floats, floats narrow to integers only when they
    /// carry no fractional part, and text is coerced like a command-line
    /// token.
    ///
    /// # Errors
    ///
    /// Returns a message describing why the conversion is impossible.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn cast_to(&self, target: ParamType) -> Result<Self, String> {
        match (self, target) {
            (Self::Str(raw), _) => target.coerce(raw),
            (_, ParamType::Str) => Ok(Self::Str(self.to_string())),
            (Self::Int(i), ParamType::Int) => Ok(Self::Int(*i)),
            (Self::Int(i), ParamType::Float) => Ok(Self::Float(*i as f64)),
            (Self::Float(x), ParamType::Float) => Ok(Self::Float(*x)),
            (Self::Float(x), ParamType::Int)
                if x.fract() == 0.0 && x.abs() < i64::MAX as f64 =>
            {
                Ok(Self::Int(*x as i64))
            }
            (Self::Bool(b), ParamType::Bool) => Ok(Self::Bool(*b)),
            _ => Err(format!(
                "cannot convert {} value '{self}' to {target}",
                self.param_type()
            )),
        }
    }

    /// Returns the value as a float if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the integer payload.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the text payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean payload.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Formats the value the way descriptor documents store it.
///
/// Floats always keep a decimal point (`5.0`, not `5`) so the document
/// reads back as the same type.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A parameter's value: one element, or an ordered list for list parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Value of a scalar parameter.
    Scalar(Value),
    /// Values of a list parameter, in command-line order.
    List(Vec<Value>),
}

impl ParamValue {
    /// Returns the scalar payload.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// Returns the list payload.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            Self::Scalar(_) => None,
        }
    }

    /// Returns all elements, treating a scalar as a one-element list.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::List(values) => values,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::List(values) => {
                let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}
