//! Prelude module for common imports.
//!
//! ```ignore
//! use tola_post::prelude::*;
//! ```

// Phases
pub use crate::phase::{Enriched, Phase, Raw, Sanitized};

// Node types
pub use crate::node::{Children, Document, Element, Node, Text};

// Attributes
pub use crate::attr::{AttrKey, Attrs, Tag};

// Transform
pub use crate::transform::{
    Classifier, HeadingAutolinker, HeadingSlugger, Hint, Outline, Pipeline, Transform,
};

// Sanitizer
pub use crate::sanitize::{SanitizeStats, Sanitizer, Schema};

// Conversion and rendering
pub use crate::convert::from_markdown;
pub use crate::render::{render_document, render_nodes};

// Content
pub use crate::config::{EngineConfig, SiteConfig};
pub use crate::engine::{Engine, Post, render_markdown};
pub use crate::meta::Metadata;
pub use crate::structured::StructuredSource;

// Error
pub use crate::error::{PostError, PostResult};
