//! Parameter groups and the item/group node union.

use crate::bridge::{ArgSink, flag};
use crate::document::{Element, Emission, tag};
use crate::restriction::RestrictionPolicy;
use crate::table::FlatTable;

use super::item::{ArgumentItem, ItemSpec};
use super::lineage::{Lineage, check_segment};
use super::{DeclarationError, ParamValue};

/// A node of the parameter tree.
#[derive(Debug, Clone)]
pub enum ParameterNode {
    /// A leaf parameter.
    Item(ArgumentItem),
    /// A nested group.
    Group(ArgumentGroup),
}

impl ParameterNode {
    /// Returns the node's own name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Item(item) => item.name(),
            Self::Group(group) => group.name(),
        }
    }

    /// Returns the node's lineage.
    #[must_use]
    pub const fn lineage(&self) -> &Lineage {
        match self {
            Self::Item(item) => item.lineage(),
            Self::Group(group) => group.lineage(),
        }
    }

    /// Registers the node (recursively for groups) with the parser.
    pub fn declare(&self, sink: &mut dyn ArgSink, heading: Option<&str>, policy: RestrictionPolicy) {
        match self {
            Self::Item(item) => item.declare(sink, heading, policy),
            Self::Group(group) => group.declare(sink, policy),
        }
    }

    /// Renders the node.
    #[must_use]
    pub fn serialize(&self, emission: Emission) -> Element {
        match self {
            Self::Item(item) => item.serialize(emission),
            Self::Group(group) => group.serialize(emission),
        }
    }

    /// Stores parsed values into the node (recursively for groups).
    pub fn store(&mut self, values: &FlatTable<ParamValue>) {
        match self {
            Self::Item(item) => item.store(values),
            Self::Group(group) => group.store(values),
        }
    }
}

/// A named group of parameters and nested groups.
///
/// Children keep their declaration order, which is also the order of
/// document nodes and help sections.
#[derive(Debug, Clone)]
pub struct ArgumentGroup {
    name: String,
    lineage: Lineage,
    description: String,
    children: Vec<ParameterNode>,
}

impl ArgumentGroup {
    /// Creates the synthetic root group.
    pub(crate) fn root(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lineage: Lineage::root(),
            description: description.into(),
            children: Vec::new(),
        }
    }

    /// Returns the group's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the group's lineage (empty for the root).
    #[must_use]
    pub const fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    /// Returns the group's description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the direct children in declaration order.
    #[must_use]
    pub fn children(&self) -> &[ParameterNode] {
        &self.children
    }

    /// Returns the direct child called `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&ParameterNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Declares a leaf parameter in this group.
    ///
    /// Re-declaring an existing name replaces the earlier node with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable or the spec is inconsistent
    /// (see [`DeclarationError`]). Top-level parameters cannot take the name
    /// of a directive or of `help`.
    pub fn add(&mut self, name: &str, spec: ItemSpec) -> Result<&mut ArgumentItem, DeclarationError> {
        if self.lineage.is_root() && flag::RESERVED.contains(&name) {
            return Err(DeclarationError::ReservedName {
                name: name.to_string(),
            });
        }
        let lineage = self.child_lineage(name)?;
        let item = ArgumentItem::new(lineage, spec)?;
        let index = self.insert(ParameterNode::Item(item));
        match &mut self.children[index] {
            ParameterNode::Item(item) => Ok(item),
            ParameterNode::Group(_) => unreachable!("node inserted as an item"),
        }
    }

    /// Declares a nested group and returns it for further declarations.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable.
    pub fn add_group(
        &mut self,
        name: &str,
        description: impl Into<String>,
    ) -> Result<&mut Self, DeclarationError> {
        let group = Self {
            name: name.to_string(),
            lineage: self.child_lineage(name)?,
            description: description.into(),
            children: Vec::new(),
        };
        let index = self.insert(ParameterNode::Group(group));
        match &mut self.children[index] {
            ParameterNode::Group(group) => Ok(group),
            ParameterNode::Item(_) => unreachable!("node inserted as a group"),
        }
    }

    /// Returns every leaf below this group, depth first in declaration order.
    #[must_use]
    pub fn items(&self) -> Vec<&ArgumentItem> {
        let mut items = Vec::new();
        self.collect_items(&mut items);
        items
    }

    /// Looks up a leaf by lineage name (`a:b`) or flag token (`-a:b`).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ArgumentItem> {
        let lineage = Lineage::from_flag(name)?;
        let (last, groups) = lineage.segments().split_last()?;

        let mut group = self;
        for segment in groups {
            match group.child(segment)? {
                ParameterNode::Group(next) => group = next,
                ParameterNode::Item(_) => return None,
            }
        }
        match group.child(last)? {
            ParameterNode::Item(item) => Some(item),
            ParameterNode::Group(_) => None,
        }
    }

    /// Registers every descendant with the parser.
    ///
    /// All groups are registered against the top-level parser under a
    /// flattened heading (the group's lineage name), since parser help
    /// sections do not nest.
    pub fn declare(&self, sink: &mut dyn ArgSink, policy: RestrictionPolicy) {
        let heading = (!self.lineage.is_root()).then(|| self.lineage.flag_name());
        for child in &self.children {
            child.declare(sink, heading.as_deref(), policy);
        }
    }

    /// Renders the group as a `NODE` containing its children in order.
    #[must_use]
    pub fn serialize(&self, emission: Emission) -> Element {
        let mut element = Element::new(tag::NODE)
            .with_attr("name", &self.name)
            .with_attr("description", &self.description);
        for child in &self.children {
            element.push(child.serialize(emission));
        }
        element
    }

    /// Stores parsed values into every descendant.
    pub fn store(&mut self, values: &FlatTable<ParamValue>) {
        for child in &mut self.children {
            child.store(values);
        }
    }

    fn child_lineage(&self, name: &str) -> Result<Lineage, DeclarationError> {
        check_segment(name).map_err(|reason| DeclarationError::InvalidName {
            name: name.to_string(),
            reason,
        })?;
        Ok(self.lineage.child(name))
    }

    fn insert(&mut self, node: ParameterNode) -> usize {
        if let Some(index) = self.children.iter().position(|c| c.name() == node.name()) {
            tracing::warn!(
                "Name `{}` in group `{}` defined twice, overriding the first definition",
                node.name(),
                self.name
            );
            self.children[index] = node;
            return index;
        }
        self.children.push(node);
        self.children.len() - 1
    }

    fn collect_items<'a>(&'a self, items: &mut Vec<&'a ArgumentItem>) {
        for child in &self.children {
            match child {
                ParameterNode::Item(item) => items.push(item),
                ParameterNode::Group(group) => group.collect_items(items),
            }
        }
    }
}
