//! Node types: `Element`, `Node`, `Text` and the phase-typed `Document`.
//!
//! The tree is exclusively owned by the pipeline call that built it. There
//! are no parent pointers; passes that need sibling context work on a
//! parent's `children` slice.

mod document;
mod element;
mod text;

pub use document::{Document, ElementIterator};
pub use element::{Element, VOID_ELEMENTS};
pub use text::Text;

use smallvec::SmallVec;

/// Node in an HTML tree - either Element or Text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

impl Node {
    // Generates for each variant (element -> Element, text -> Text):
    //   - is_xxx(&self) -> bool
    //   - as_xxx(&self) -> Option<&Type>
    //   - as_xxx_mut(&mut self) -> Option<&mut Type>
    impl_enum_accessors!(element: Element, text: Text);

    /// Wrap an element
    #[inline]
    pub fn element(elem: Element) -> Self {
        Node::Element(Box::new(elem))
    }

    /// Create a text node
    #[inline]
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(Text::new(content))
    }

    /// Whitespace-only text (the separators between block siblings)
    pub fn is_whitespace_text(&self) -> bool {
        self.as_text().is_some_and(Text::is_whitespace)
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::element(elem)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 4]>;

/// Concatenated text of a node list.
pub fn text_content(nodes: &[Node]) -> String {
    let mut result = String::new();
    for node in nodes {
        match node {
            Node::Text(t) => result.push_str(&t.content),
            Node::Element(e) => e.collect_text(&mut result),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Raw;

    #[test]
    fn test_node_accessors() {
        let mut node = Node::element(Element::new("p"));
        assert!(node.is_element());
        assert!(!node.is_text());
        assert!(node.as_element().is_some_and(|e| e.is("p")));

        if let Some(elem) = node.as_element_mut() {
            elem.push(Node::text("x"));
        }
        assert_eq!(text_content(std::slice::from_ref(&node)), "x");

        let text = Node::text(" \n ");
        assert!(text.is_whitespace_text());
        assert!(!node.is_whitespace_text());
    }

    #[test]
    fn test_document_basic() {
        let doc: Document<Raw> = Document::new(
            [
                Node::element(Element::new("h1").text("Title")),
                Node::text("\n"),
                Node::element(Element::new("p").child(Element::new("em").text("hi"))),
            ]
            .into_iter()
            .collect(),
        );

        assert_eq!(doc.phase_name(), "raw");
        assert_eq!(doc.element_count(), 3);
        assert_eq!(doc.text_content(), "Title\nhi");
    }

    #[test]
    fn test_document_find() {
        let doc: Document<Raw> = Document::new(
            [
                Node::element(Element::new("span").with_class("highlight")),
                Node::element(Element::new("p")),
            ]
            .into_iter()
            .collect(),
        );

        let span = doc.find_element(|e| e.is("span")).unwrap();
        assert!(span.has_class("highlight"));

        assert!(doc.find_element(|e| e.is("missing")).is_none());
        assert!(doc.has_element(|e| e.is("p")));
    }

    #[test]
    fn test_document_elements_iterator() {
        let doc: Document<Raw> = Document::new(
            [
                Node::element(Element::new("div").child(Element::new("span"))),
                Node::element(Element::new("p")),
            ]
            .into_iter()
            .collect(),
        );

        let tags: Vec<_> = doc.iter_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["div", "span", "p"]);
        assert_eq!(doc.find_all(|e| e.is("span")).len(), 1);
    }

    #[test]
    fn test_for_each_element_mut() {
        let mut doc: Document<Raw> = Document::new(
            [Node::element(Element::new("div").child(Element::new("p")))]
                .into_iter()
                .collect(),
        );

        doc.for_each_element_mut(|e| e.attrs.add_class("seen"));
        assert_eq!(doc.find_all(|e| e.has_class("seen")).len(), 2);
    }
}
