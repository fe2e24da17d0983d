//! Element type - HTML elements with ordered attributes and children
//!
//! The core building block of the HTML tree.

use crate::attr::{AttrKey, Attrs, Tag};

use super::{Children, Node};

/// Elements that never have children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

// =============================================================================
// Element
// =============================================================================

/// HTML element with attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// HTML tag name (lowercase)
    pub tag: Tag,
    /// Element attributes
    pub attrs: Attrs,
    /// Child nodes in document order
    pub children: Children,
}

impl Element {
    /// Create an element with no attributes or children
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attrs::new(),
            children: Children::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Set an attribute (builder)
    pub fn attr(mut self, key: AttrKey, value: impl Into<String>) -> Self {
        self.attrs.set(key, value);
        self
    }

    /// Set the id attribute (builder)
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.attr(AttrKey::Id, id)
    }

    /// Append a class token (builder)
    pub fn with_class(mut self, class: &str) -> Self {
        self.attrs.add_class(class);
        self
    }

    /// Append a child element (builder)
    pub fn child(mut self, elem: Element) -> Self {
        self.children.push(Node::element(elem));
        self
    }

    /// Append a text child (builder)
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(Node::text(content));
        self
    }

    /// Append a child node
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by key
    pub fn get_attr(&self, key: &AttrKey) -> Option<&str> {
        self.attrs.get(key)
    }

    /// Set attribute value (update if exists, add if not)
    pub fn set_attr(&mut self, key: AttrKey, value: impl Into<String>) {
        self.attrs.set(key, value);
    }

    /// Check if attribute exists
    pub fn has_attr(&self, key: &AttrKey) -> bool {
        self.attrs.has(key)
    }

    /// The id attribute, if any
    pub fn id(&self) -> Option<&str> {
        self.attrs.get(&AttrKey::Id)
    }

    /// Check if the class list contains `name`
    pub fn has_class(&self, name: &str) -> bool {
        self.attrs.has_class(name)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Other helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Check the tag name
    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.tag.as_str() == tag
    }

    /// Void element (no children, no closing tag)
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Heading level parsed from the tag: "h2" → 2
    pub fn heading_level(&self) -> Option<u8> {
        match self.tag.as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children (all node types)
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// First child node, whatever its kind
    pub fn first_child(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Get text content of this element (concatenated from all text nodes)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    pub(crate) fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }
}
