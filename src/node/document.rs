//! Document type and related utilities
//!
//! The root container for HTML trees, with query and traversal APIs.

use crate::phase::Phase;

use super::{Children, Element, Node};

// =============================================================================
// Document<P>
// =============================================================================

/// Root document container.
///
/// The root is a fragment: `children` is the top-level node sequence of the
/// post body, with no synthetic wrapper element.
#[derive(Debug, Clone)]
pub struct Document<P: Phase> {
    /// Top-level nodes in document order
    pub children: Children,
    /// Document-level extension data (stats, outline)
    pub ext: P::DocExt,
}

impl<P: Phase> Document<P> {
    /// Create a new document with default extension data
    pub fn new(children: Children) -> Self {
        Self {
            children,
            ext: P::DocExt::default(),
        }
    }

    /// Create a document with explicit extension data
    pub fn with_ext(children: Children, ext: P::DocExt) -> Self {
        Self { children, ext }
    }

    /// Move the tree into another phase
    pub fn into_phase<Q: Phase>(self, ext: Q::DocExt) -> Document<Q> {
        Document {
            children: self.children,
            ext,
        }
    }

    /// Get the phase name for debugging
    pub fn phase_name(&self) -> &'static str {
        P::NAME
    }

    /// Concatenated text of the whole document
    pub fn text_content(&self) -> String {
        super::text_content(&self.children)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first element matching predicate (depth-first search)
    pub fn find_element<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.iter_elements().find(|e| predicate(e))
    }

    /// Find all elements matching predicate
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.iter_elements().filter(|e| predicate(e)).collect()
    }

    /// Check if any element matches predicate
    pub fn has_element<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Element) -> bool,
    {
        self.find_element(predicate).is_some()
    }

    /// Count total elements in document
    pub fn element_count(&self) -> usize {
        self.iter_elements().count()
    }

    /// Iterate over all elements (depth-first, document order)
    pub fn iter_elements(&self) -> ElementIterator<'_> {
        ElementIterator::new(&self.children)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Closure-based traversal API
    // ─────────────────────────────────────────────────────────────────────────

    /// Visit all elements with a closure (mutable, pre-order)
    ///
    /// Children are visited after `f` returns, so `f` may replace them.
    pub fn for_each_element_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Element),
    {
        Self::visit_elements_mut(&mut self.children, &mut f);
    }

    fn visit_elements_mut<F>(children: &mut Children, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        for child in children.iter_mut() {
            if let Some(elem) = child.as_element_mut() {
                f(elem);
                Self::visit_elements_mut(&mut elem.children, f);
            }
        }
    }
}

// =============================================================================
// ElementIterator - depth-first element traversal
// =============================================================================

/// Depth-first iterator over elements
pub struct ElementIterator<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementIterator<'a> {
    fn new(roots: &'a [Node]) -> Self {
        let stack = roots.iter().rev().filter_map(Node::as_element).collect();
        Self { stack }
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        for child in elem.children.iter().rev() {
            if let Some(child_elem) = child.as_element() {
                self.stack.push(child_elem);
            }
        }
        Some(elem)
    }
}
