//! Heading anchors: `Sanitized` → `Enriched`.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::attr::AttrKey;
use crate::node::Document;
use crate::phase::{Enriched, Sanitized};

use super::Transform;

/// Fallback slug for headings without any alphanumeric text.
pub const EMPTY_SLUG: &str = "section";

// =============================================================================
// Outline
// =============================================================================

/// One anchored heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingAnchor {
    pub level: u8,
    /// Unique within the document
    pub id: String,
    /// Trimmed text content
    pub text: String,
}

/// Anchored headings in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Outline {
    pub headings: Vec<HeadingAnchor>,
}

impl Outline {
    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeadingAnchor> {
        self.headings.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.headings.iter().map(|h| h.id.as_str())
    }
}

// =============================================================================
// Slugs
// =============================================================================

/// URL-safe slug: lowercase alphanumerics, every other run collapsed to a
/// single `-`, no leading or trailing `-`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        slug
    }
}

/// Hands out unique slugs for one document.
#[derive(Debug, Clone, Default)]
pub struct Slugger {
    counters: FxHashMap<String, usize>,
    used: FxHashSet<String>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unique slug for `text`; repeats get `-1`, `-2`, ...
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut candidate = base.clone();
        if self.used.contains(&candidate) {
            let counter = self.counters.entry(base.clone()).or_insert(0);
            loop {
                *counter += 1;
                candidate = format!("{base}-{counter}");
                if !self.used.contains(&candidate) {
                    break;
                }
            }
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

// =============================================================================
// HeadingSlugger
// =============================================================================

/// Assigns a unique `id` to every heading and records the outline.
///
/// An existing (sanitized) id is kept as the slug source, so it is
/// normalized and deduplicated like any heading text. A blank id counts as
/// missing.
#[derive(Debug, Clone, Default)]
pub struct HeadingSlugger {
    slugger: Slugger,
}

impl HeadingSlugger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transform<Sanitized> for HeadingSlugger {
    type To = Enriched;

    fn transform(mut self, mut doc: Document<Sanitized>) -> Document<Enriched> {
        let mut outline = Outline::default();
        doc.for_each_element_mut(|elem| {
            let Some(level) = elem.heading_level() else {
                return;
            };
            let text = elem.text_content();
            let source = elem
                .id()
                .filter(|existing| !existing.trim().is_empty())
                .unwrap_or(text.as_str());
            let id = self.slugger.slug(source);
            elem.set_attr(AttrKey::Id, id.as_str());
            outline.headings.push(HeadingAnchor {
                level,
                id,
                text: text.trim().to_string(),
            });
        });
        debug!("slug: anchored {} headings", outline.len());
        doc.into_phase(outline)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::convert::from_markdown;
    use crate::sanitize::Sanitizer;
    use crate::transform::Pipeline;

    fn anchor(md: &str) -> Document<Enriched> {
        Pipeline::new(from_markdown(md))
            .pipe(Sanitizer::new())
            .pipe(HeadingSlugger::new())
            .into_inner()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  What's new in v2.0?  "), "what-s-new-in-v2-0");
        assert_eq!(slugify("Ünïcode Straße"), "ünïcode-straße");
        assert_eq!(slugify("--- !!! ---"), EMPTY_SLUG);
        assert_eq!(slugify(""), EMPTY_SLUG);
    }

    #[test]
    fn test_slugger_collisions() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("Intro"), "intro");
        assert_eq!(slugger.slug("Intro"), "intro-1");
        assert_eq!(slugger.slug("intro 1"), "intro-1-1");
        assert_eq!(slugger.slug("Intro"), "intro-2");
    }

    #[test]
    fn test_headings_get_ids_and_outline() {
        let doc = anchor("# Title\n\n## Setup\n\ntext\n\n## Setup\n\n### *Deep* dive\n");
        let ids: Vec<_> = doc.ext.ids().collect();
        assert_eq!(ids, vec!["title", "setup", "setup-1", "deep-dive"]);
        assert_eq!(doc.ext.headings[3].level, 3);
        assert_eq!(doc.ext.headings[3].text, "Deep dive");

        let h2s = doc.find_all(|e| e.is("h2"));
        assert_eq!(h2s[1].id(), Some("setup-1"));
    }

    #[test]
    fn test_existing_id_is_slug_source() {
        let doc = anchor("<h2 id=\"Custom ID\">Whatever</h2>\n\n## custom id\n");
        let ids: Vec<_> = doc.ext.ids().collect();
        assert_eq!(ids, vec!["custom-id", "custom-id-1"]);
    }

    #[test]
    fn test_blank_id_uses_heading_text() {
        let doc = anchor("<h2 id=\"\">Intro</h2>\n\n<h3 id=\"  \">Next step</h3>\n");
        let ids: Vec<_> = doc.ext.ids().collect();
        assert_eq!(ids, vec!["intro", "next-step"]);
        assert!(doc.find_element(|e| e.is("h2")).is_some_and(|h| h.id() == Some("intro")));
    }

    proptest! {
        #[test]
        fn prop_anchor_ids_are_unique(titles in prop::collection::vec("[A-Za-z0-9 !-]{0,12}", 1..12)) {
            let md: String = titles.iter().map(|t| format!("## {t}\n\n")).collect();
            let doc = anchor(&md);
            let ids: Vec<_> = doc.ext.ids().collect();
            let unique: FxHashSet<_> = ids.iter().collect();
            prop_assert_eq!(unique.len(), ids.len());
            prop_assert!(ids.iter().all(|id| !id.is_empty()));
        }
    }
}
