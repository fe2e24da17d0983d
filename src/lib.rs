//! tola-post - Markdown posts to sanitized, annotated HTML
//!
//! ## Pipeline
//!
//! ```text
//! index.md ─► meta::extract ─► markup::parse ─► convert::lower ─► Document<Raw>
//!                                                                     │
//!                                                      Sanitizer      ▼
//!                                                             Document<Sanitized>
//!                                                                     │
//!                                 HeadingSlugger, HeadingAutolinker,  ▼
//!                                 Classifier                  Document<Enriched>
//!                                                                     │
//!                                                      render         ▼
//!                                                                   HTML
//! ```
//!
//! Phases are types: enrichment passes only accept sanitized documents, so
//! nothing can skip the sanitizer and nothing added after it is untrusted.
//!
//! ## Modules
//! - `meta`: front matter, normalized metadata, reading time
//! - `markup`: markdown AST and parser
//! - `convert`: AST and raw HTML to the HTML tree
//! - `node`, `attr`, `phase`: the HTML tree and its phases
//! - `sanitize`: allowlist schema and sanitizer
//! - `transform`: heading anchors, autolinks, classifier, pipeline
//! - `render`: HTML serialization
//! - `engine`, `config`, `structured`: content directory access and JSON-LD
//!
//! ## Usage
//!
//! ```ignore
//! use tola_post::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::new("content/blog"));
//! for meta in engine.list_posts() {
//!     println!("{} ({})", meta.title, meta.date);
//! }
//! if let Some(post) = engine.load_and_render("hello-world")? {
//!     println!("{}", post.html);
//! }
//! ```

#[macro_use]
mod macros;

// =============================================================================
// Tree
// =============================================================================

/// Attribute types
pub mod attr;

/// Node types: Document, Element, Node, Text
pub mod node;

/// Phase markers: Raw, Sanitized, Enriched
pub mod phase;

// =============================================================================
// Pipeline stages
// =============================================================================

/// Front matter and metadata
pub mod meta;

/// Markdown AST and parser
pub mod markup;

/// Lowering to the HTML tree
pub mod convert;

/// Allowlist sanitizer
pub mod sanitize;

/// Enrichment transforms and pipeline
pub mod transform;

/// HTML rendering
pub mod render;

// =============================================================================
// Content access
// =============================================================================

/// Engine configuration
pub mod config;

/// Content directory engine
pub mod engine;

/// JSON-LD structured data
pub mod structured;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{EngineConfig, SiteConfig};
pub use engine::{Engine, Post, RenderedBody, render_markdown};
pub use error::{PostError, PostResult};
pub use meta::Metadata;
pub use node::{Children, Document, Element, Node, Text};
pub use phase::{Enriched, Phase, Raw, Sanitized};
pub use sanitize::{Sanitizer, Schema};
pub use structured::StructuredSource;
pub use transform::{Outline, Pipeline, Transform};

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_markdown_end_to_end() {
        let body = render_markdown(
            "## Contents\n\n\
             - [Setup](#setup)\n\n\
             ## Setup\n\n\
             > Pro tip: <b onclick=\"steal()\">pin</b> versions\n",
        );
        assert_eq!(
            body.html,
            "<h2 id=\"contents\" class=\"toc-heading\">\
             <a href=\"#contents\" class=\"anchor\">Contents</a></h2>\n\
             <ul class=\"toc\">\n<li><a href=\"#setup\">Setup</a></li>\n</ul>\n\
             <h2 id=\"setup\"><a href=\"#setup\" class=\"anchor\">Setup</a></h2>\n\
             <blockquote class=\"callout callout--tip\">\n\
             <p>Pro tip: <b>pin</b> versions</p>\n</blockquote>"
        );
        assert_eq!(body.outline.len(), 2);
    }

    #[test]
    fn test_script_subtree_dropped_entirely() {
        let body = render_markdown("<script><b>safe</b></script>\n\ntext\n");
        assert!(!body.html.contains("safe"), "{}", body.html);
        assert!(body.html.contains("<p>text</p>"), "{}", body.html);
    }

    #[test]
    fn test_author_written_hint_classes_render() {
        let body = render_markdown("<blockquote class=\"callout\">Pro tip: pin versions</blockquote>\n");
        assert!(
            body.html.contains("<blockquote class=\"callout callout--tip\">"),
            "{}",
            body.html
        );

        let body = render_markdown("## Contents\n\n<ul class=\"toc\"><li>a</li></ul>\n");
        assert!(body.html.contains("<ul class=\"toc\">"), "{}", body.html);
        assert_eq!(body.html.matches("toc\"").count(), 1, "{}", body.html);
    }

    static_assertions::assert_impl_all!(Sanitizer<'static>: Send, Sync);
    static_assertions::assert_impl_all!(Document<Enriched>: Send, Sync);
}
