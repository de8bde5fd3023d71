//! CTDopts: Common Tool Descriptor options
//!
//! A library for declaring a tool's typed, nested parameters once and
//! exposing them as a command line, a tool-describing document and a
//! replayable parameter-value document.

pub mod bridge;
pub mod config;
pub mod document;
pub mod invocation;
pub mod param;
pub mod restriction;
pub mod table;
pub mod time;

pub use bridge::{CommandLineBridge, Invocation, LogOutcome, Outcome};
pub use param::{ArgumentGroup, ArgumentItem, ItemSpec, ParamType, ToolDescriptor, ToolInfo};
