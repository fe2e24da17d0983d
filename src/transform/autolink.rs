//! Heading self-links: wraps each anchored heading's content in
//! `<a href="#id" class="anchor">`.
//!
//! Links cannot nest, so a link already inside the heading is replaced by
//! its content before wrapping.

use log::debug;

use crate::attr::AttrKey;
use crate::node::{Children, Document, Element, Node};
use crate::phase::Enriched;

use super::Transform;

/// Class on the injected self-link.
pub const ANCHOR_CLASS: &str = "anchor";

/// Wraps heading content in a link to the heading's own id.
///
/// Runs after [`HeadingSlugger`](super::HeadingSlugger); headings without
/// an id are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingAutolinker;

impl Transform<Enriched> for HeadingAutolinker {
    type To = Enriched;

    fn transform(self, mut doc: Document<Enriched>) -> Document<Enriched> {
        let mut wrapped = 0usize;
        doc.for_each_element_mut(|elem| {
            if elem.heading_level().is_none() {
                return;
            }
            let Some(id) = elem.id().map(str::to_string) else {
                return;
            };
            let mut link = Element::new("a")
                .attr(AttrKey::Href, format!("#{id}"))
                .attr(AttrKey::Class, ANCHOR_CLASS);
            link.children = unwrap_links(std::mem::take(&mut elem.children));
            elem.push(link.into());
            wrapped += 1;
        });
        debug!("autolink: wrapped {wrapped} headings");
        doc
    }
}

/// Replace every `<a>` in `children` (at any depth) by its content.
fn unwrap_links(children: Children) -> Children {
    let mut out = Children::new();
    for node in children {
        match node {
            Node::Element(elem) if elem.is("a") => {
                let Element { children, .. } = *elem;
                out.extend(unwrap_links(children));
            }
            Node::Element(mut elem) => {
                elem.children = unwrap_links(std::mem::take(&mut elem.children));
                out.push(Node::Element(elem));
            }
            text => out.push(text),
        }
    }
    out
}
