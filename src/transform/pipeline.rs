//! Document processing pipeline.

use crate::node::Document;
use crate::phase::Phase;

use super::Transform;

// =============================================================================
// Pipeline
// =============================================================================

/// Synchronous pipeline for document processing.
///
/// Wraps a `Document` and provides a fluent API for transformations and data
/// collection.
///
/// # Example
///
/// ```ignore
/// use tola_post::transform::{Classifier, HeadingAutolinker, HeadingSlugger, Pipeline};
/// use tola_post::Sanitizer;
///
/// let enriched = Pipeline::new(raw_doc)
///     .pipe(Sanitizer::new())
///     .pipe(HeadingSlugger::new())
///     .pipe(HeadingAutolinker)
///     .pipe(Classifier)
///     .into_inner();
/// ```
pub struct Pipeline<P: Phase> {
    doc: Document<P>,
}

impl<P: Phase> Pipeline<P> {
    /// Create a new pipeline from a document.
    #[inline]
    pub fn new(doc: Document<P>) -> Self {
        Self { doc }
    }

    /// Apply a transform to the document.
    #[inline]
    pub fn pipe<T>(self, transform: T) -> Pipeline<T::To>
    where
        T: Transform<P>,
    {
        Pipeline {
            doc: transform.transform(self.doc),
        }
    }

    /// Inspect the document without consuming the pipeline.
    ///
    /// Useful for logging or debugging intermediate state.
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&Document<P>),
    {
        f(&self.doc);
        self
    }

    /// Consume the pipeline and return the document.
    #[inline]
    pub fn into_inner(self) -> Document<P> {
        self.doc
    }
}
