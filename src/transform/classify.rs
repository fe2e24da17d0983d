//! Content classifier: attaches presentation hints to prose conventions.
//!
//! | Convention | Shape | Hints |
//! |------------|-------|-------|
//! | key takeaways | `blockquote` text starting with `Key Takeaways` | `key-takeaways` |
//! | callout | `blockquote` text starting with a lead-in | `callout`, `callout--<variant>` |
//! | table of contents | `h2` reading "contents", next sibling `ul` | `toc-heading`, `toc` |
//! | citeable snippet | `h2`, next sibling `p` opening with `strong` | `citeable-snippet` |
//!
//! "Next sibling" skips whitespace-only text nodes and stops at the first
//! other node. Hints only ever add class tokens; the tree shape and text
//! are untouched, and every hinted tag accepts classes in the default
//! schema.

use std::sync::LazyLock;

use log::{debug, error};
use regex::Regex;
use smallvec::SmallVec;

use crate::node::{Children, Document, Element, Node};
use crate::phase::Enriched;

use super::Transform;

const KEY_TAKEAWAYS_LEAD: &str = "Key Takeaways";
const TOC_TITLE: &str = "contents";

// =============================================================================
// Hints
// =============================================================================

/// Callout variant, in matching priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    Insight,
    BottomLine,
    Stat,
    Tip,
}

impl CalloutKind {
    pub const ALL: [CalloutKind; 4] = [Self::Insight, Self::BottomLine, Self::Stat, Self::Tip];

    fn pattern(self) -> &'static str {
        match self {
            Self::Insight => r"(?i)^key insight:",
            Self::BottomLine => r"(?i)^bottom line:",
            Self::Stat => r"(?i)^by the numbers:",
            Self::Tip => r"(?i)^pro tip:",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Self::Insight => "callout--insight",
            Self::BottomLine => "callout--bottom-line",
            Self::Stat => "callout--stat",
            Self::Tip => "callout--tip",
        }
    }

    /// First variant whose lead-in starts `text` (already trimmed).
    pub fn detect(text: &str) -> Option<Self> {
        CALLOUT_PATTERNS
            .iter()
            .find(|(re, _)| re.is_match(text))
            .map(|(_, kind)| *kind)
    }
}

static CALLOUT_PATTERNS: LazyLock<Vec<(Regex, CalloutKind)>> = LazyLock::new(|| {
    CalloutKind::ALL
        .iter()
        .filter_map(|&kind| match Regex::new(kind.pattern()) {
            Ok(re) => Some((re, kind)),
            Err(e) => {
                error!("invalid callout pattern for {kind:?}: {e}");
                None
            }
        })
        .collect()
});

/// Presentation hint; rendered as a class token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hint {
    KeyTakeaways,
    Callout,
    CalloutVariant(CalloutKind),
    TocHeading,
    Toc,
    CiteableSnippet,
}

impl Hint {
    pub const ALL: [Hint; 9] = [
        Self::KeyTakeaways,
        Self::Callout,
        Self::CalloutVariant(CalloutKind::Insight),
        Self::CalloutVariant(CalloutKind::BottomLine),
        Self::CalloutVariant(CalloutKind::Stat),
        Self::CalloutVariant(CalloutKind::Tip),
        Self::TocHeading,
        Self::Toc,
        Self::CiteableSnippet,
    ];

    pub fn class_name(self) -> &'static str {
        match self {
            Self::KeyTakeaways => "key-takeaways",
            Self::Callout => "callout",
            Self::CalloutVariant(kind) => kind.class_name(),
            Self::TocHeading => "toc-heading",
            Self::Toc => "toc",
            Self::CiteableSnippet => "citeable-snippet",
        }
    }
}

/// Whether `token` is a class name reserved for hints.
///
/// Authors cannot write these: the sanitizer removes them from raw input,
/// so every hint on an enriched document was attached by the classifier.
pub fn is_hint_class(token: &str) -> bool {
    Hint::ALL.iter().any(|hint| hint.class_name() == token)
}

/// Append a hint class.
///
/// Hinting the same node twice means a pass ran twice; that trips a debug
/// assertion instead of being deduplicated.
pub fn attach_hint(elem: &mut Element, hint: Hint) {
    debug_assert!(
        !elem.has_class(hint.class_name()),
        "hint `{}` attached twice to <{}>",
        hint.class_name(),
        elem.tag
    );
    elem.attrs.add_class(hint.class_name());
}

// =============================================================================
// Classifier
// =============================================================================

/// Hint targets for one position: (sibling index, hint).
type Decisions = SmallVec<[(usize, Hint); 2]>;

/// Recognizes the prose conventions and attaches hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    /// Classify a node list in place; returns the number of hints attached.
    pub fn classify_children(&self, children: &mut Children) -> usize {
        let mut attached = 0;
        for index in 0..children.len() {
            for (target, hint) in decide(children, index) {
                if let Some(elem) = children[target].as_element_mut() {
                    attach_hint(elem, hint);
                    attached += 1;
                }
            }
            if let Some(elem) = children[index].as_element_mut() {
                attached += self.classify_children(&mut elem.children);
            }
        }
        attached
    }
}

impl Transform<Enriched> for Classifier {
    type To = Enriched;

    fn transform(self, mut doc: Document<Enriched>) -> Document<Enriched> {
        let attached = self.classify_children(&mut doc.children);
        debug!("classify: attached {attached} hints");
        doc
    }
}

/// Hints triggered by the node at `index`, looking only at it and its
/// next significant sibling.
fn decide(siblings: &[Node], index: usize) -> Decisions {
    let mut decisions = Decisions::new();
    let Some(elem) = siblings[index].as_element() else {
        return decisions;
    };

    if elem.is("blockquote") {
        let text = elem.text_content();
        let text = text.trim();
        if text.starts_with(KEY_TAKEAWAYS_LEAD) {
            decisions.push((index, Hint::KeyTakeaways));
        } else if let Some(kind) = CalloutKind::detect(text) {
            decisions.push((index, Hint::Callout));
            decisions.push((index, Hint::CalloutVariant(kind)));
        }
    }

    if elem.heading_level() == Some(2) {
        let next = next_significant(siblings, index)
            .and_then(|i| siblings[i].as_element().map(|e| (i, e)));

        if elem.text_content().trim().to_lowercase() == TOC_TITLE {
            decisions.push((index, Hint::TocHeading));
            if let Some((i, sibling)) = next
                && sibling.is("ul")
            {
                decisions.push((i, Hint::Toc));
            }
        }

        if let Some((i, sibling)) = next
            && sibling.is("p")
            && sibling
                .first_child()
                .and_then(Node::as_element)
                .is_some_and(|first| first.is("strong"))
        {
            decisions.push((i, Hint::CiteableSnippet));
        }
    }

    decisions
}

/// Index of the first sibling after `index` that is not whitespace-only text.
fn next_significant(siblings: &[Node], index: usize) -> Option<usize> {
    siblings
        .iter()
        .enumerate()
        .skip(index + 1)
        .find(|(_, node)| !node.is_whitespace_text())
        .map(|(i, _)| i)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::convert::from_markdown;
    use crate::render::render_nodes;
    use crate::sanitize::Sanitizer;
    use crate::transform::{HeadingAutolinker, HeadingSlugger, Pipeline};

    fn classify(md: &str) -> Document<Enriched> {
        Pipeline::new(from_markdown(md))
            .pipe(Sanitizer::new())
            .pipe(HeadingSlugger::new())
            .pipe(HeadingAutolinker)
            .pipe(Classifier)
            .into_inner()
    }

    fn classes_of<'a>(doc: &'a Document<Enriched>, tag: &str) -> Vec<Vec<&'a str>> {
        doc.find_all(|e| e.is(tag))
            .into_iter()
            .map(|e| e.attrs.classes().collect())
            .collect()
    }

    #[test]
    fn test_key_takeaways() {
        let doc = classify("> Key Takeaways: Do X, Y, Z\n");
        assert_eq!(classes_of(&doc, "blockquote"), vec![vec!["key-takeaways"]]);
    }

    #[test]
    fn test_key_takeaways_wins_over_callout() {
        let doc = classify("> Key Takeaways\n>\n> Pro tip: this is not a callout\n");
        assert_eq!(classes_of(&doc, "blockquote"), vec![vec!["key-takeaways"]]);
    }

    #[test]
    fn test_callout_variants() {
        let doc = classify("> Pro tip: always test twice\n");
        assert_eq!(classes_of(&doc, "blockquote"), vec![vec!["callout", "callout--tip"]]);

        let doc = classify("> **KEY INSIGHT:** caching wins\n\n> bottom line: ship it\n\n> By the numbers: 42\n");
        assert_eq!(
            classes_of(&doc, "blockquote"),
            vec![
                vec!["callout", "callout--insight"],
                vec!["callout", "callout--bottom-line"],
                vec!["callout", "callout--stat"],
            ]
        );
    }

    #[test]
    fn test_plain_blockquote_untouched() {
        let doc = classify("> Just a quote. Pro tip: not at the start\n");
        assert_eq!(classes_of(&doc, "blockquote"), vec![Vec::<&str>::new()]);
    }

    #[test]
    fn test_toc_heading_and_list() {
        let doc = classify("## Contents\n\n- [Intro](#intro)\n- [End](#end)\n\n## Intro\n");
        assert_eq!(
            classes_of(&doc, "h2"),
            vec![vec!["toc-heading"], Vec::<&str>::new()]
        );
        assert_eq!(classes_of(&doc, "ul"), vec![vec!["toc"]]);
    }

    #[test]
    fn test_toc_heading_without_list() {
        let doc = classify("##  CONTENTS \n\nNo list here.\n\n- later list\n");
        assert_eq!(classes_of(&doc, "h2"), vec![vec!["toc-heading"]]);
        assert_eq!(classes_of(&doc, "ul"), vec![Vec::<&str>::new()]);
        assert_eq!(classes_of(&doc, "p"), vec![Vec::<&str>::new()]);
    }

    #[test]
    fn test_citeable_snippet() {
        let doc = classify("## Why\n\n**Short answer:** because.\n\nMore text.\n");
        assert_eq!(
            classes_of(&doc, "p"),
            vec![vec!["citeable-snippet"], Vec::<&str>::new()]
        );
    }

    #[test]
    fn test_no_snippet_without_heading() {
        let doc = classify("Intro.\n\n**Bold start** but no heading before.\n\n### Why\n\n**Bold** after h3.\n");
        assert!(doc.find_element(|e| e.has_class("citeable-snippet")).is_none());
    }

    #[test]
    fn test_snippet_needs_strong_first_child() {
        let doc = classify("## Why\n\nText then **bold**.\n");
        assert!(doc.find_element(|e| e.has_class("citeable-snippet")).is_none());
    }

    #[test]
    fn test_nested_blockquote_classified() {
        let doc = classify("- item\n\n  > Pro tip: nested\n");
        assert_eq!(classes_of(&doc, "blockquote"), vec![vec!["callout", "callout--tip"]]);
    }

    #[test]
    fn test_hints_survive_sanitizer() {
        let doc = classify(
            "## Contents\n\n- a\n\n## Why\n\n**Bold.** text\n\n> Key Takeaways\n\n> Pro tip: x\n",
        );
        let mut again = doc.children.clone();
        let stats = Sanitizer::new().sanitize_children(&mut again);
        assert!(stats.is_clean());
        assert_eq!(render_nodes(&again), render_nodes(&doc.children));
    }

    #[test]
    fn test_author_hint_classes_are_replaced() {
        let doc = classify("<blockquote class=\"callout\">Pro tip: pin versions</blockquote>\n");
        assert_eq!(classes_of(&doc, "blockquote"), vec![vec!["callout", "callout--tip"]]);

        let doc = classify("## Contents\n\n<ul class=\"toc\"><li>a</li></ul>\n");
        assert_eq!(classes_of(&doc, "ul"), vec![vec!["toc"]]);

        // a hint class on a node the classifier does not match is gone
        let doc = classify("<p class=\"citeable-snippet\">plain</p>\n");
        assert_eq!(classes_of(&doc, "p"), vec![Vec::<&str>::new()]);
    }

    #[test]
    fn test_is_hint_class() {
        for hint in Hint::ALL {
            assert!(is_hint_class(hint.class_name()));
        }
        assert!(!is_hint_class("anchor"));
        assert!(!is_hint_class("callout--other"));
        assert!(!is_hint_class("Callout"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "attached twice")]
    fn test_double_classification_panics() {
        let doc = classify("> Pro tip: twice\n");
        Classifier.transform(doc);
    }

    #[test]
    fn test_decisions_are_local() {
        let children: Children = [
            Node::element(Element::new("h2").text("Contents")),
            Node::text("\n"),
            Node::text("stray text"),
            Node::element(Element::new("ul")),
        ]
        .into_iter()
        .collect();
        let decisions = decide(&children, 0);
        assert_eq!(decisions.as_slice(), &[(0, Hint::TocHeading)]);
    }
}
