//! Markup syntax tree.
//!
//! Closed enums over every block and inline construct of the post dialect
//! (CommonMark plus tables, strikethrough and task lists). Produced by
//! [`parse`], consumed by [`crate::convert::lower`]. Raw HTML is carried as
//! opaque strings here and only becomes structure during lowering.

mod parser;

pub use parser::{parse, parser_options};

// =============================================================================
// Blocks
// =============================================================================

/// Block-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `level` is 1..=6
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    /// Inline content of a tight list item, rendered without a `<p>`.
    Plain(Vec<Inline>),
    List(List),
    Table(Table),
    CodeBlock { lang: Option<String>, code: String },
    BlockQuote(Vec<Block>),
    ThematicBreak,
    /// Unparsed HTML block.
    RawBlock(String),
}

/// Ordered or unordered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    /// Start number; `Some` means ordered.
    pub start: Option<u64>,
    pub items: Vec<ListItem>,
}

impl List {
    pub fn is_ordered(&self) -> bool {
        self.start.is_some()
    }

    /// Any item carries a task checkbox.
    pub fn is_task_list(&self) -> bool {
        self.items.iter().any(|item| item.checked.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    /// Task-list state; `None` for ordinary items.
    pub checked: Option<bool>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Per-column alignment, in column order
    pub alignments: Vec<Alignment>,
    pub head: TableRow,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Value of the `align` attribute, if any.
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

// =============================================================================
// Inlines
// =============================================================================

/// Inline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link(Link),
    Image(Image),
    Code(String),
    LineBreak,
    SoftBreak,
    /// One inline HTML tag or comment, unparsed.
    RawInline(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub title: String,
    pub content: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub title: String,
    /// Alt text, flattened
    pub alt: String,
}

impl Inline {
    /// Append the plain-text rendition of this inline to `buf`.
    pub fn push_plain_text(&self, buf: &mut String) {
        match self {
            Self::Text(s) | Self::Code(s) => buf.push_str(s),
            Self::Emphasis(c) | Self::Strong(c) | Self::Strikethrough(c) => {
                c.iter().for_each(|i| i.push_plain_text(buf));
            }
            Self::Link(link) => link.content.iter().for_each(|i| i.push_plain_text(buf)),
            Self::Image(img) => buf.push_str(&img.alt),
            Self::LineBreak | Self::SoftBreak => buf.push(' '),
            Self::RawInline(_) => {}
        }
    }
}
