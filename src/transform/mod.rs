//! Document transforms.
//!
//! # Module Structure
//!
//! - `Transform` - Core trait for phase transformations
//! - `HeadingSlugger` - Sanitized → Enriched, heading ids and outline
//! - `HeadingAutolinker` - Enriched → Enriched, heading self-links
//! - `Classifier` - Enriched → Enriched, presentation hints
//! - `Pipeline` - Synchronous document processing pipeline
//!
//! The sanitizer (Raw → Sanitized) lives in [`crate::sanitize`]. Because
//! enrichment only accepts sanitized documents, the injected anchors and
//! hints can never be stripped afterwards.
//!
//! # Example
//!
//! ```ignore
//! use tola_post::transform::{Classifier, HeadingAutolinker, HeadingSlugger, Pipeline};
//!
//! let doc = Pipeline::new(raw_doc)
//!     .pipe(Sanitizer::new())
//!     .pipe(HeadingSlugger::new())
//!     .pipe(HeadingAutolinker)
//!     .pipe(Classifier)
//!     .into_inner();
//! ```

mod autolink;
mod classify;
mod core;
mod pipeline;
mod slug;

pub use autolink::{ANCHOR_CLASS, HeadingAutolinker};
pub use classify::{CalloutKind, Classifier, Hint, attach_hint, is_hint_class};
pub use self::core::Transform;
pub use pipeline::Pipeline;
pub use slug::{EMPTY_SLUG, HeadingAnchor, HeadingSlugger, Outline, Slugger, slugify};
