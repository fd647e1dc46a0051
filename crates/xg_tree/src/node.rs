use serde::{Deserialize, Serialize};

// -----------------------------------------------------------------------------
// XNode

/// A labeled element of the hierarchical document structure.
///
/// Attributes keep insertion order, which is significant for humans
/// diffing documents but never for the engine. Source locations are
/// filled in by whatever parser produced the tree and flow into
/// serialization errors; a programmatically built node reports `0:0`.
///
/// # Example
///
/// ```
/// use xg_tree::XNode;
///
/// let mut node = XNode::new("Point");
/// node.set_attribute("type", "type_0");
/// node.add_child(XNode::with_text("x", "1"));
/// node.add_child(XNode::with_text("y", "2"));
///
/// assert_eq!(node.attribute("type"), Some("type_0"));
/// assert_eq!(node.child("y").unwrap().text(), Some("2"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XNode {
    tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<XNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    line: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    column: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_uri: Option<String>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl XNode {
    /// Create an empty node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            line: 0,
            column: 0,
            source_uri: None,
        }
    }

    /// Create a node carrying only text content.
    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        let mut node = Self::new(tag);
        node.text = Some(text.into());
        node
    }

    /// Returns the tag.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Replace the tag, e.g. to rename a value node after a property
    /// it was written for.
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.tag = tag.into();
    }

    /// Returns the text content, if any.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Set or clear the text content.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Returns the value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value under the same
    /// name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Iterate over `(name, value)` attribute pairs in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Append a child node.
    pub fn add_child(&mut self, child: XNode) {
        self.children.push(child);
    }

    /// Insert a child node at the front.
    pub fn prepend_child(&mut self, child: XNode) {
        self.children.insert(0, child);
    }

    /// Returns the first child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&XNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Returns the child nodes.
    #[inline]
    pub fn children(&self) -> &[XNode] {
        &self.children
    }

    /// Returns the child nodes mutably.
    #[inline]
    pub fn children_mut(&mut self) -> &mut Vec<XNode> {
        &mut self.children
    }

    /// Returns `(line, column)` of the node in its source document.
    #[inline]
    pub fn location(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    /// Set the source location.
    pub fn set_location(&mut self, line: u32, column: u32) {
        self.line = line;
        self.column = column;
    }

    /// Returns the uri of the source document, if known.
    #[inline]
    pub fn source_uri(&self) -> Option<&str> {
        self.source_uri.as_deref()
    }

    /// Set the uri of the source document.
    pub fn set_source_uri(&mut self, uri: Option<String>) {
        self.source_uri = uri;
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::XNode;

    #[test]
    fn attribute_replace_keeps_order() {
        let mut node = XNode::new("A");
        node.set_attribute("x", "1");
        node.set_attribute("y", "2");
        node.set_attribute("x", "3");

        let pairs: Vec<_> = node.attributes().collect();
        assert_eq!(pairs, vec![("x", "3"), ("y", "2")]);
    }

    #[test]
    fn child_lookup_finds_first() {
        let mut node = XNode::new("A");
        node.add_child(XNode::with_text("B", "first"));
        node.add_child(XNode::with_text("B", "second"));

        assert_eq!(node.child("B").unwrap().text(), Some("first"));
        assert!(node.child("C").is_none());
    }

    #[test]
    fn prepend_orders_before_existing() {
        let mut node = XNode::new("A");
        node.add_child(XNode::new("B"));
        node.prepend_child(XNode::new("C"));

        assert_eq!(node.children()[0].tag(), "C");
        assert_eq!(node.children()[1].tag(), "B");
    }

    #[test]
    fn serde_round_trip() {
        let mut node = XNode::new("Point");
        node.set_attribute("type", "type_0");
        node.add_child(XNode::with_text("x", "1"));

        let json = serde_json::to_string(&node).unwrap();
        let back: XNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);

        let text = ron::to_string(&node).unwrap();
        let back: XNode = ron::from_str(&text).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn default_location_is_origin() {
        let node = XNode::new("A");
        assert_eq!(node.location(), (0, 0));
        assert_eq!(node.source_uri(), None);
    }
}
