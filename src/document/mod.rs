//! Descriptor documents.
//!
//! One parameter tree is rendered in two modes:
//!
//! - **Tool descriptor** ([`Emission::ToolDescriptor`]): the full declaration
//!   with defaults, restrictions, choices and tags.
//! - **Parameter-value descriptor** ([`Emission::ParameterValues`]): the same
//!   shape, with each value reflecting what the run was invoked with. It can
//!   be fed back with `--input_ctd` to replay the run.
//!
//! Both may carry an execution log record.
//!
//! # Layout
//!
//! ```text
//! tool (name, version, schema locators, docurl?, category?)
//! ├── manual / description / executableName / executablePath
//! ├── logs/log (executionTimeStart, executionTimeStop, executionStatus)
//! │   ├── executionErrors
//! │   └── executionMessage
//! └── PARAMETERS
//!     └── NODE name=<tool>
//!         ├── ITEM name="version"
//!         └── NODE name="1"          (root group)
//!             ├── ITEM / ITEMLIST(LISTITEM…)
//!             └── NODE …             (nested groups)
//! ```
//!
//! Loading also accepts the legacy layout where `PARAMETERS` is the root.

mod element;
mod error;


pub use element::Element;
pub use error::DocumentError;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::param::{Lineage, ParamType, ToolDescriptor};
use crate::table::FlatTable;

/// Element names used in descriptor documents.
pub mod tag {
    /// Document root of a tool descriptor.
    pub const TOOL: &str = "tool";
    /// Wrapper of the parameter tree.
    pub const PARAMETERS: &str = "PARAMETERS";
    /// A group.
    pub const NODE: &str = "NODE";
    /// A scalar parameter.
    pub const ITEM: &str = "ITEM";
    /// A list parameter.
    pub const ITEMLIST: &str = "ITEMLIST";
    /// One element of a list parameter.
    pub const LISTITEM: &str = "LISTITEM";
    /// Wrapper of log records.
    pub const LOGS: &str = "logs";
    /// One execution log record.
    pub const LOG: &str = "log";
}

/// Schema locations written into documents.
pub mod schema {
    /// XML Schema instance namespace.
    pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
    /// Schema of the tool wrapper.
    pub const CTD: &str =
        "https://github.com/genericworkflownodes/CTDopts/raw/master/schemas/CTD_0_3.xsd";
    /// Version of the parameter schema.
    pub const PARAM_VERSION: &str = "1.6.2";
    /// Schema of the parameter tree.
    pub const PARAM: &str =
        "https://github.com/genericworkflownodes/CTDopts/raw/master/schemas/Param_1_6_2.xsd";
}

/// Which values a rendered tree carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Declared defaults, independent of any run.
    ToolDescriptor,
    /// Call values of this run, falling back to defaults.
    ParameterValues,
}

/// An execution log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// When parameter resolution finished and the tool started working
    pub started: DateTime<Utc>,
    /// When the log was finalized
    pub stopped: Option<DateTime<Utc>>,
    /// Exit status reported by the tool
    pub exit_status: Option<i32>,
    /// Captured standard error
    pub errors: Option<String>,
    /// Captured standard output
    pub message: Option<String>,
}

impl LogRecord {
    /// Creates a record scaffold with only a start time.
    #[must_use]
    pub const fn started(at: DateTime<Utc>) -> Self {
        Self {
            started: at,
            stopped: None,
            exit_status: None,
            errors: None,
            message: None,
        }
    }

    fn to_element(&self) -> Element {
        let timestamp = |t: &DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Micros, false);

        let mut log = Element::new(tag::LOG).with_attr("executionTimeStart", timestamp(&self.started));
        if let Some(stopped) = &self.stopped {
            log.set_attr("executionTimeStop", timestamp(stopped));
        }
        if let Some(status) = self.exit_status {
            log.set_attr("executionStatus", status.to_string());
        }
        if let Some(errors) = &self.errors {
            log.push(Element::new("executionErrors").with_text(errors));
        }
        if let Some(message) = &self.message {
            log.push(Element::new("executionMessage").with_text(message));
        }
        log
    }
}

/// A parameter as recorded in a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedEntry {
    /// A boolean parameter stored as `true`.
    Flag,
    /// Raw values of any other parameter, in document order.
    Values(Vec<String>),
}

/// Renders the whole tool as a document tree.
#[must_use]
pub fn describe(tool: &ToolDescriptor, emission: Emission, log: Option<&LogRecord>) -> Element {
    let info = tool.info();

    let mut root = Element::new(tag::TOOL)
        .with_attr("version", &info.version)
        .with_attr("name", &info.name)
        .with_attr("xmlns:xsi", schema::XSI_NAMESPACE)
        .with_attr("xsi:schemaLocation", schema::CTD);
    if let Some(docurl) = &info.docurl {
        root.set_attr("docurl", docurl);
    }
    if let Some(category) = &info.category {
        root.set_attr("category", category);
    }

    let texts = [
        ("manual", &info.manual),
        ("description", &info.description),
        ("executableName", &info.executable_name),
        ("executablePath", &info.executable_path),
    ];
    for (name, text) in texts {
        if let Some(text) = text {
            root.push(Element::new(name).with_text(text));
        }
    }

    if let Some(log) = log {
        root.push(Element::new(tag::LOGS).with_child(log.to_element()));
    }

    let version_item = Element::new(tag::ITEM)
        .with_attr("name", "version")
        .with_attr("value", &info.version)
        .with_attr("type", ParamType::Str.ctd_name())
        .with_attr("description", "Version of the tool that generated this parameters file.")
        .with_attr("tags", "advanced");

    let tool_node = Element::new(tag::NODE)
        .with_attr("name", &info.name)
        .with_attr("description", info.description.as_deref().unwrap_or_default())
        .with_child(version_item)
        .with_child(tool.root().serialize(emission));

    root.with_child(
        Element::new(tag::PARAMETERS)
            .with_attr("version", schema::PARAM_VERSION)
            .with_attr("xmlns:xsi", schema::XSI_NAMESPACE)
            .with_attr("xsi:noNamespaceSchemaLocation", schema::PARAM)
            .with_child(tool_node),
    )
}

/// Writes a document to `path`.
///
/// The file is written to `{path}.tmp` first and renamed into place, so a
/// crash never leaves a half-written descriptor behind.
///
/// # Errors
///
/// Returns an error if rendering or any file operation fails.
pub fn write(path: &Path, document: &Element, indent: usize) -> Result<(), DocumentError> {
    let content = document.to_xml(indent)?;
    let write_error = |source| DocumentError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
    }

    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&temp_path, content).map_err(write_error)?;
    std::fs::rename(&temp_path, path).map_err(write_error)?;

    tracing::debug!(path = %path.display(), "Document written");
    Ok(())
}

/// Loads a parameter-value document from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid document.
pub fn load(path: &Path) -> Result<FlatTable<LoadedEntry>, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    load_str(&content)
}

/// Loads a parameter-value document from text.
///
/// Returns a table keyed by flag token (`-group:param`), in document order.
/// Boolean parameters appear only when stored as `true`; list parameters
/// carry all their elements; scalar parameters carry one value. A scalar of
/// a non-string type with an empty value carries none.
///
/// # Errors
///
/// Returns an error for malformed markup or a document without the
/// `PARAMETERS/NODE/NODE` structure.
pub fn load_str(content: &str) -> Result<FlatTable<LoadedEntry>, DocumentError> {
    let root = Element::parse(content)?;
    let parameters = if root.tag() == tag::PARAMETERS {
        &root
    } else {
        root.required_child(tag::PARAMETERS)?
    };
    let tool_node = parameters.required_child(tag::NODE)?;
    let root_group = tool_node.required_child(tag::NODE)?;

    let mut table = FlatTable::new();
    for child in root_group.children() {
        register(child, &Lineage::root(), &mut table)?;
    }
    Ok(table)
}

fn register(
    element: &Element,
    parent: &Lineage,
    table: &mut FlatTable<LoadedEntry>,
) -> Result<(), DocumentError> {
    let lineage = parent.child(element.required_attr("name")?);

    match element.tag() {
        tag::ITEM => {
            let value = element.required_attr("value")?;
            let param_type = element
                .attribute("type")
                .and_then(ParamType::from_ctd_name)
                .unwrap_or(ParamType::Str);
            match param_type {
                ParamType::Bool => {
                    if value == "true" {
                        table.insert(lineage.flag_token(), LoadedEntry::Flag);
                    }
                }
                ParamType::Str => {
                    table.insert(lineage.flag_token(), LoadedEntry::Values(vec![value.to_string()]));
                }
                ParamType::Int | ParamType::Float => {
                    let values = if value.is_empty() {
                        Vec::new()
                    } else {
                        vec![value.to_string()]
                    };
                    table.insert(lineage.flag_token(), LoadedEntry::Values(values));
                }
            }
        }
        tag::ITEMLIST => {
            let values = element
                .children()
                .iter()
                .filter(|child| child.tag() == tag::LISTITEM)
                .map(|child| child.required_attr("value").map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            table.insert(lineage.flag_token(), LoadedEntry::Values(values));
        }
        tag::NODE => {
            for child in element.children() {
                register(child, &lineage, table)?;
            }
        }
        other => {
            return Err(DocumentError::UnexpectedElement {
                element: other.to_string(),
                path: parent.flag_name(),
            });
        }
    }
    Ok(())
}
