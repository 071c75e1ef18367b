//! Node types: NodeId, NodeData, Element.

use std::collections::BTreeMap;

use slotmap::new_key_type;

new_key_type! {
    /// Unique identifier for a markup node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// A markup node: an element or a run of text.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(Element),
    /// Text content with JSX whitespace rules already applied.
    Text(String),
}

impl NodeData {
    /// The element payload, if this is an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    /// The text payload, if this is a text run.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }
}

/// A tagged element with string attributes.
///
/// Attribute values that were not string literals in the source (event
/// handlers, arbitrary expressions) are not recorded, with one exception:
/// `className` expressions referencing a style module (`styles.card`) are
/// reduced to the referenced class names.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Lowercased tag name. Member-expression tags (`Foo.Bar`) become `div`.
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The raw class attribute (`className`, else `class`).
    pub fn class_attr(&self) -> Option<&str> {
        self.attr("className")
            .or_else(|| self.attr("class"))
            .filter(|c| !c.trim().is_empty())
    }

    /// Whether the tag is `name`.
    pub fn is(&self, name: &str) -> bool {
        self.tag == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_attr_prefers_class_name() {
        let el = Element::new("div")
            .with_attr("class", "b")
            .with_attr("className", "a");
        assert_eq!(el.class_attr(), Some("a"));
        assert_eq!(Element::new("div").with_attr("class", "b").class_attr(), Some("b"));
    }

    #[test]
    fn blank_class_is_absent() {
        let el = Element::new("div").with_attr("className", "  ");
        assert_eq!(el.class_attr(), None);
    }

    #[test]
    fn node_data_accessors() {
        let text = NodeData::Text("hi".into());
        assert_eq!(text.as_text(), Some("hi"));
        assert!(text.as_element().is_none());
        let el = NodeData::Element(Element::new("img"));
        assert!(el.as_element().is_some_and(|e| e.is("img")));
    }
}
