//! Sanitizer: `Raw` → `Sanitized`.
//!
//! A single depth-first walk. Elements whose tag is not allowed are removed
//! together with their whole subtree; surviving elements lose every
//! attribute the schema does not allow, and URL-valued attributes lose
//! values with a forbidden protocol. Nothing is ever added or reordered.
//!
//! Drops are the normal case for raw HTML, so they are logged at `trace`.
//!
//! Moving a document from `Raw` to `Sanitized` also removes presentation
//! hint classes (`callout`, `toc`, ...) written by the author; those names
//! belong to the classifier, which attaches them later.

mod schema;

pub use schema::{Schema, ValuePolicy, protocol_of};

use log::{debug, trace};

use crate::attr::AttrKey;
use crate::node::{Children, Document, Element, Node};
use crate::phase::{Raw, Sanitized};
use crate::transform::{Transform, is_hint_class};

/// What the sanitizer removed from one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    /// Elements removed (each counts once, regardless of subtree size)
    pub dropped_elements: usize,
    /// Attributes removed by name or value policy
    pub dropped_attrs: usize,
    /// URL attributes removed for their protocol
    pub dropped_urls: usize,
    /// Class attributes that claimed a presentation hint
    pub reserved_classes: usize,
}

impl SanitizeStats {
    pub fn total(&self) -> usize {
        self.dropped_elements + self.dropped_attrs + self.dropped_urls + self.reserved_classes
    }

    /// Nothing was removed.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }
}

enum Verdict {
    Keep,
    /// Keep with a filtered value (class token filtering)
    Rewrite(String),
    Drop,
    DropUrl,
}

// =============================================================================
// Sanitizer
// =============================================================================

/// Allowlist sanitizer over a [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct Sanitizer<'s> {
    schema: &'s Schema,
}

impl Sanitizer<'static> {
    /// Sanitizer over the default post schema.
    pub fn new() -> Self {
        Self {
            schema: Schema::default_schema(),
        }
    }
}

impl Default for Sanitizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s> Sanitizer<'s> {
    pub fn with_schema(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Sanitize a node list in place.
    pub fn sanitize_children(&self, children: &mut Children) -> SanitizeStats {
        let mut stats = SanitizeStats::default();
        self.walk(children, &mut stats);
        stats
    }

    fn walk(&self, children: &mut Children, stats: &mut SanitizeStats) {
        children.retain(|node| match node {
            Node::Text(_) => true,
            Node::Element(elem) => {
                if !self.schema.is_tag_allowed(&elem.tag) {
                    trace!("sanitize: dropped <{}> subtree", elem.tag);
                    stats.dropped_elements += 1;
                    return false;
                }
                self.sanitize_attrs(elem, stats);
                self.walk(&mut elem.children, stats);
                true
            }
        });
    }

    fn sanitize_attrs(&self, elem: &mut Element, stats: &mut SanitizeStats) {
        let tag = &elem.tag;
        elem.attrs.retain_mut(|key, value| match self.verdict(tag, key, value) {
            Verdict::Keep => true,
            Verdict::Rewrite(filtered) => {
                *value = filtered;
                true
            }
            Verdict::Drop => {
                trace!("sanitize: dropped {key} on <{tag}>");
                stats.dropped_attrs += 1;
                false
            }
            Verdict::DropUrl => {
                trace!("sanitize: dropped {key}={value:?} on <{tag}>");
                stats.dropped_urls += 1;
                false
            }
        });
    }

    fn verdict(&self, tag: &str, key: &AttrKey, value: &str) -> Verdict {
        let Some(policy) = self.schema.attr_policy(tag, key) else {
            return Verdict::Drop;
        };

        if *key == AttrKey::Class {
            let filtered = value
                .split_ascii_whitespace()
                .filter(|token| policy.allows(token))
                .collect::<Vec<_>>()
                .join(" ");
            return if filtered.is_empty() {
                Verdict::Drop
            } else if filtered == value {
                Verdict::Keep
            } else {
                Verdict::Rewrite(filtered)
            };
        }

        if !policy.allows(value) {
            Verdict::Drop
        } else if !self.schema.is_url_allowed(key, value) {
            Verdict::DropUrl
        } else {
            Verdict::Keep
        }
    }

    /// Remove hint class tokens from every element; returns the number of
    /// class attributes changed.
    pub fn strip_hint_classes(&self, children: &mut Children) -> usize {
        let mut stripped = 0;
        for node in children.iter_mut() {
            let Some(elem) = node.as_element_mut() else {
                continue;
            };
            if let Some(value) = elem.attrs.get(&AttrKey::Class)
                && value.split_ascii_whitespace().any(is_hint_class)
            {
                let kept = value
                    .split_ascii_whitespace()
                    .filter(|token| !is_hint_class(token))
                    .collect::<Vec<_>>()
                    .join(" ");
                trace!("sanitize: reserved hint class {value:?} on <{}>", elem.tag);
                if kept.is_empty() {
                    elem.attrs.remove(&AttrKey::Class);
                } else {
                    elem.attrs.set(AttrKey::Class, kept);
                }
                stripped += 1;
            }
            stripped += self.strip_hint_classes(&mut elem.children);
        }
        stripped
    }

    /// Check that a tree already conforms, without changing it.
    pub fn is_clean(&self, nodes: &[Node]) -> bool {
        nodes.iter().all(|node| match node {
            Node::Text(_) => true,
            Node::Element(elem) => {
                self.schema.is_tag_allowed(&elem.tag)
                    && elem
                        .attrs
                        .iter()
                        .all(|(key, value)| matches!(self.verdict(&elem.tag, key, value), Verdict::Keep))
                    && self.is_clean(&elem.children)
            }
        })
    }
}

impl Transform<Raw> for Sanitizer<'_> {
    type To = Sanitized;

    fn transform(self, doc: Document<Raw>) -> Document<Sanitized> {
        let mut children = doc.children;
        let mut stats = self.sanitize_children(&mut children);
        stats.reserved_classes = self.strip_hint_classes(&mut children);
        debug!(
            "sanitize: {} raw fragments, dropped {} elements, {} attrs, {} urls, {} hint classes",
            doc.ext.raw_fragments,
            stats.dropped_elements,
            stats.dropped_attrs,
            stats.dropped_urls,
            stats.reserved_classes
        );
        Document::with_ext(children, stats)
    }
}

// =============================================================================
// Tests
// =============================================================================
