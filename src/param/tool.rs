//! Tool identity and the root of the parameter tree.

use super::ArgumentGroup;

/// Name given to the synthetic root group in documents.
pub const ROOT_NODE_NAME: &str = "1";

/// A tool's name, version and optional descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Tool version
    pub version: String,
    /// Free-text description
    pub description: Option<String>,
    /// Manual text
    pub manual: Option<String>,
    /// Documentation URL
    pub docurl: Option<String>,
    /// Tool category
    pub category: Option<String>,
    /// Name of the executable
    pub executable_name: Option<String>,
    /// Path to the executable
    pub executable_path: Option<String>,
}

impl ToolInfo {
    /// Creates tool metadata with only a name and version.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            manual: None,
            docurl: None,
            category: None,
            executable_name: None,
            executable_path: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the manual text.
    #[must_use]
    pub fn manual(mut self, manual: impl Into<String>) -> Self {
        self.manual = Some(manual.into());
        self
    }

    /// Sets the documentation URL.
    #[must_use]
    pub fn docurl(mut self, docurl: impl Into<String>) -> Self {
        self.docurl = Some(docurl.into());
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the executable name.
    #[must_use]
    pub fn executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = Some(name.into());
        self
    }

    /// Sets the executable path.
    #[must_use]
    pub fn executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }
}

/// A tool and its parameter tree.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    info: ToolInfo,
    root: ArgumentGroup,
}

impl ToolDescriptor {
    /// Creates a tool with an empty root group.
    #[must_use]
    pub fn new(info: ToolInfo) -> Self {
        let description = format!("Instance \"{ROOT_NODE_NAME}\" section for {}", info.name);
        Self {
            root: ArgumentGroup::root(ROOT_NODE_NAME, description),
            info,
        }
    }

    /// Returns the tool metadata.
    #[must_use]
    pub const fn info(&self) -> &ToolInfo {
        &self.info
    }

    /// Returns the root group.
    #[must_use]
    pub const fn root(&self) -> &ArgumentGroup {
        &self.root
    }

    /// Returns the root group for declaring parameters.
    pub const fn root_mut(&mut self) -> &mut ArgumentGroup {
        &mut self.root
    }
}
