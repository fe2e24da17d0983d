//! HTML rendering
//!
//! Serializes a tree to an HTML string. This is the only place text is
//! escaped: text nodes hold decoded content everywhere else.

use crate::attr::Attrs;
use crate::node::{Document, Element, Node};
use crate::phase::Phase;

// =============================================================================
// Document Rendering
// =============================================================================

/// Render a document to an HTML string.
pub fn render_document<P: Phase>(doc: &Document<P>) -> String {
    render_nodes(&doc.children)
}

/// Render a node list to an HTML string.
pub fn render_nodes(nodes: &[Node]) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(node, &mut output);
    }
    output
}

/// Render a single element to an HTML string.
pub fn render_element_to_string(elem: &Element) -> String {
    let mut output = String::new();
    render_element(elem, &mut output);
    output
}

fn render_element(elem: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&elem.tag);
    render_attrs(&elem.attrs, output);
    output.push('>');

    // Void elements have no closing tag
    if elem.is_void() {
        return;
    }

    for child in &elem.children {
        render_node(child, output);
    }

    output.push_str("</");
    output.push_str(&elem.tag);
    output.push('>');
}

fn render_node(node: &Node, output: &mut String) {
    match node {
        Node::Element(elem) => render_element(elem, output),
        Node::Text(text) => {
            html_escape::encode_text_to_string(&text.content, output);
        }
    }
}

/// Render attributes; empty boolean attributes as a bare name.
fn render_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs.iter() {
        output.push(' ');
        output.push_str(name.as_str());
        if value.is_empty() && name.is_boolean() {
            continue;
        }
        output.push_str("=\"");
        html_escape::encode_double_quoted_attribute_to_string(value, output);
        output.push('"');
    }
}
