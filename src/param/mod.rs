//! The declarative parameter tree.
//!
//! A tool author declares parameters once, as a tree of groups
//! ([`ArgumentGroup`]) and leaves ([`ArgumentItem`]) under a
//! [`ToolDescriptor`]. Everything else in the crate is derived from this
//! tree: parser registration, descriptor documents and token synthesis.
//!
//! # Declaration rules
//!
//! - A required parameter has no default; an optional one must have one.
//! - Boolean parameters are presence flags: never required, never lists,
//!   always defaulting to `false`.
//! - A parameter has at most one restriction: a numeric range (numeric types)
//!   or a file-format list (string type).
//!
//! Violations are reported as [`DeclarationError`] when the parameter is added.

mod error;
mod group;
mod item;
pub mod lineage;
mod tool;
mod value;


pub use error::DeclarationError;
pub use group::{ArgumentGroup, ParameterNode};
pub use item::{ArgumentItem, ItemSpec};
pub use lineage::Lineage;
pub use tool::{ROOT_NODE_NAME, ToolDescriptor, ToolInfo};
pub use value::{ParamType, ParamValue, Value};
