//! Core transform trait.

use crate::node::Document;
use crate::phase::Phase;

/// Transform a document from one phase to another.
pub trait Transform<From: Phase>: Sized {
    /// Target phase.
    type To: Phase;

    /// Transform the document.
    fn transform(self, doc: Document<From>) -> Document<Self::To>;
}
