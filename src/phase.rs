//! Phase definitions for the post pipeline
//!
//! Defines the three tree phases:
//! - Raw: direct lowering output, may contain anything raw HTML produced
//! - Sanitized: every element, attribute and URL passed the schema
//! - Enriched: headings carry anchors, presentation hints attached

use std::fmt::Debug;

use crate::sanitize::SanitizeStats;
use crate::transform::Outline;

// =============================================================================
// Phase trait
// =============================================================================

/// Marker trait for tree phases
///
/// Each phase fixes the document-level extension data carried alongside the
/// tree.
pub trait Phase: 'static + Send + Sync + Debug + Clone {
    /// Phase name for debugging
    const NAME: &'static str;

    /// Document-level extension data
    type DocExt: Debug + Clone + Default + Send + Sync;
}

// =============================================================================
// Raw
// =============================================================================

/// Lowered from the markup AST, not yet sanitized.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

/// Raw-phase document data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocExt {
    /// Raw HTML fragments (block and inline) parsed into the tree
    pub raw_fragments: usize,
}

impl Phase for Raw {
    const NAME: &'static str = "raw";
    type DocExt = RawDocExt;
}

// =============================================================================
// Sanitized
// =============================================================================

/// Passed the sanitization schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitized;

impl Phase for Sanitized {
    const NAME: &'static str = "sanitized";
    type DocExt = SanitizeStats;
}

// =============================================================================
// Enriched
// =============================================================================

/// Anchored, link-wrapped and classified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Enriched;

impl Phase for Enriched {
    const NAME: &'static str = "enriched";
    type DocExt = Outline;
}
