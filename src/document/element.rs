//! A minimal element tree for descriptor documents.
//!
//! Documents are small, so they are built and read as a whole tree.
//! Attribute order is preserved so documents stay readable, with the
//! parameter name always first.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::DocumentError;

/// One markup element: tag, ordered attributes, optional text and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Adds or replaces an attribute (builder form).
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Sets the text content (builder form).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Appends a child (builder form).
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Adds or replaces an attribute, keeping its position on replace.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Appends a child.
    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Returns the tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    /// Returns an attribute value or a [`DocumentError::MissingAttribute`].
    ///
    /// # Errors
    ///
    /// Fails if the attribute is absent.
    pub fn required_attr(&self, key: &'static str) -> Result<&str, DocumentError> {
        self.attribute(key)
            .ok_or_else(|| DocumentError::MissingAttribute {
                element: self.tag.clone(),
                attribute: key,
            })
    }

    /// Returns the text content.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the children in document order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Returns the first child with the given tag.
    #[must_use]
    pub fn find(&self, tag: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Returns the first child with the given tag or a [`DocumentError::MissingElement`].
    ///
    /// # Errors
    ///
    /// Fails if no such child exists.
    pub fn required_child(&self, tag: &'static str) -> Result<&Self, DocumentError> {
        self.find(tag).ok_or_else(|| DocumentError::MissingElement {
            element: tag,
            parent: self.tag.clone(),
        })
    }

    /// Renders the element as a complete UTF-8 document with an XML declaration.
    ///
    /// An `indent` of zero produces a single line.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn to_xml(&self, indent: usize) -> Result<String, DocumentError> {
        let mut writer = if indent == 0 {
            Writer::new(Vec::new())
        } else {
            Writer::new_with_indent(Vec::new(), b' ', indent)
        };
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_to(&mut writer)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        Ok(String::from_utf8(bytes)?)
    }

    /// Parses a document and returns its root element.
    ///
    /// Whitespace-only text is dropped; comments, processing instructions
    /// and the declaration are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed markup, an empty document, or more
    /// than one root element.
    pub fn parse(content: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::attach(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(DocumentError::Unbalanced)?;
                    Self::attach(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        let text = text.unescape().map_err(DocumentError::syntax)?;
                        top.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&data);
                        top.text.get_or_insert_with(String::new).push_str(&text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(DocumentError::Unbalanced);
        }
        root.ok_or(DocumentError::Empty)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, DocumentError> {
        let mut element = Self::new(String::from_utf8_lossy(start.name().as_ref()));
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(DocumentError::syntax)?
                .into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(
        element: Self,
        stack: &mut [Self],
        root: &mut Option<Self>,
    ) -> Result<(), DocumentError> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
            return Ok(());
        }
        if root.is_some() {
            return Err(DocumentError::MultipleRoots);
        }
        *root = Some(element);
        Ok(())
    }

    fn write_to(&self, writer: &mut Writer<Vec<u8>>) -> Result<(), DocumentError> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.tag.as_str())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("NODE")
            .with_attr("name", "1")
            .with_attr("description", "Instance \"1\" <root> & more")
            .with_child(Element::new("ITEM").with_attr("name", "a").with_attr("value", "x"))
            .with_child(Element::new("manual").with_text("Use it & love it"))
    }

    #[test]
    fn render_then_parse_preserves_structure() {
        let xml = sample().to_xml(2).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(Element::parse(&xml).unwrap(), sample());
    }

    #[test]
    fn special_characters_are_escaped() {
        let xml = sample().to_xml(0).unwrap();

        assert!(xml.contains("&lt;root&gt; &amp; more"));
        assert!(xml.contains("Use it &amp; love it"));
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut element = Element::new("ITEM").with_attr("name", "a").with_attr("value", "1");
        element.set_attr("name", "b");

        assert_eq!(
            element.attributes(),
            &[
                ("name".to_string(), "b".to_string()),
                ("value".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn required_lookups_report_context() {
        let element = Element::new("PARAMETERS");

        assert!(matches!(
            element.required_child("NODE"),
            Err(DocumentError::MissingElement { element: "NODE", parent }) if parent == "PARAMETERS"
        ));
        assert!(matches!(
            element.required_attr("name"),
            Err(DocumentError::MissingAttribute { attribute: "name", .. })
        ));
    }

    #[test]
    fn empty_document_is_an_error() {
        assert!(matches!(Element::parse(""), Err(DocumentError::Empty)));
    }

    #[test]
    fn unclosed_element_is_an_error() {
        assert!(Element::parse("<tool><PARAMETERS>").is_err());
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        assert!(Element::parse("<a></b>").is_err());
    }

    #[test]
    fn comments_and_declaration_are_ignored() {
        let element =
            Element::parse("<?xml version=\"1.0\"?><!-- hi --><root a=\"1\"/>").unwrap();

        assert_eq!(element.tag(), "root");
        assert_eq!(element.attribute("a"), Some("1"));
    }
}
