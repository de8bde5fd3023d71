//! Error types for reading and writing descriptor documents.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for document operations.
///
/// Loading never returns a partial result: any of these aborts the load.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a document file.
    #[error("Failed to read document '{}': {source}", path.display())]
    FileRead {
        /// Path to the document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a document file.
    #[error("Failed to write document '{}': {source}", path.display())]
    FileWrite {
        /// Path to the document
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The markup is malformed.
    #[error("Malformed document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An attribute is malformed.
    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Text or attribute content could not be decoded.
    #[error("Malformed document content: {0}")]
    Syntax(String),

    /// The writer failed.
    #[error("Failed to render document: {0}")]
    Render(#[from] std::io::Error),

    /// Rendered output is not valid UTF-8.
    #[error("Rendered document is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The document has no root element.
    #[error("Document is empty")]
    Empty,

    /// Start and end tags do not pair up.
    #[error("Document has unbalanced elements")]
    Unbalanced,

    /// More than one top-level element.
    #[error("Document has more than one root element")]
    MultipleRoots,

    /// A required element is missing.
    #[error("Missing <{element}> inside <{parent}>")]
    MissingElement {
        /// Expected element
        element: &'static str,
        /// Element it was expected in
        parent: String,
    },

    /// A required attribute is missing.
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute {
        /// Element lacking the attribute
        element: String,
        /// Expected attribute
        attribute: &'static str,
    },

    /// An element that cannot appear inside a parameter tree.
    #[error("Unexpected <{element}> in parameter tree at '{path}'")]
    UnexpectedElement {
        /// Offending element
        element: String,
        /// Lineage of the enclosing node
        path: String,
    },
}

impl DocumentError {
    /// Wraps a decoding failure reported by the markup reader.
    pub(crate) fn syntax(error: impl fmt::Display) -> Self {
        Self::Syntax(error.to_string())
    }
}
