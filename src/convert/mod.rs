//! Source format converters to a raw tree
//!
//! | Module | Input | Function |
//! |--------|-------|----------|
//! | [`markup`] | parsed markup blocks | [`lower()`] |
//! | [`html`] | raw HTML fragments | [`parse_fragment()`] |
//!
//! The converters only produce a `Document<Raw>`. Nothing in here is
//! trusted; the sanitizer decides what survives.

pub mod html;
pub mod markup;

pub use self::html::{TreeBuilder, parse_fragment, tokenize};
pub use self::markup::lower;

use crate::node::Document;
use crate::phase::Raw;

/// Parse a post body and lower it in one step.
pub fn from_markdown(body: &str) -> Document<Raw> {
    lower(&crate::markup::parse(body))
}
