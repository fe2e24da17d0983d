//! Event-stream to AST builder.
//!
//! pulldown-cmark emits a flat stream of start/end events. The builder keeps
//! a stack of open containers; every `End` pops one frame and hands the
//! finished node to its parent. Parsing never fails: anything malformed has
//! already been degraded to text by the tokenizer.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::{Alignment, Block, Image, Inline, Link, List, ListItem, Table, TableCell, TableRow};

/// Dialect options: tables, strikethrough and task lists on top of CommonMark.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Parse a post body into blocks.
pub fn parse(body: &str) -> Vec<Block> {
    let mut builder = AstBuilder::new();
    for event in Parser::new_ext(body, parser_options()) {
        builder.event(event);
    }
    builder.finish()
}

// =============================================================================
// Frames
// =============================================================================

#[derive(Debug)]
enum Container {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote,
    List(Option<u64>),
    Item,
    CodeBlock(Option<String>),
    HtmlBlock,
    Table(Vec<Alignment>),
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String, title: String },
    /// Constructs not modelled by the AST: content kept, wrapper dropped.
    Transparent,
}

#[derive(Debug)]
struct Frame {
    container: Container,
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
    /// Literal text of code blocks, HTML blocks and image alt
    text: String,
    items: Vec<ListItem>,
    head: Option<TableRow>,
    rows: Vec<TableRow>,
    cells: Vec<TableCell>,
    checked: Option<bool>,
}

impl Frame {
    fn new(container: Container) -> Self {
        Self {
            container,
            blocks: Vec::new(),
            inlines: Vec::new(),
            text: String::new(),
            items: Vec::new(),
            head: None,
            rows: Vec::new(),
            cells: Vec::new(),
            checked: None,
        }
    }

    fn collects_text(&self) -> bool {
        matches!(
            self.container,
            Container::CodeBlock(_) | Container::HtmlBlock | Container::Image { .. }
        )
    }

    /// Move loose inlines into a `Plain` block.
    fn flush_inlines(&mut self) {
        if !self.inlines.is_empty() {
            let inlines = std::mem::take(&mut self.inlines);
            self.blocks.push(Block::Plain(inlines));
        }
    }

    fn push_block(&mut self, block: Block) {
        self.flush_inlines();
        self.blocks.push(block);
    }

    fn push_inline(&mut self, inline: Inline) {
        if self.collects_text() {
            inline.push_plain_text(&mut self.text);
            return;
        }
        match (self.inlines.last_mut(), inline) {
            (Some(Inline::Text(prev)), Inline::Text(next)) => prev.push_str(&next),
            (_, inline) => self.inlines.push(inline),
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.collects_text() {
            self.text.push_str(text);
        } else {
            self.push_inline(Inline::Text(text.to_string()));
        }
    }
}

// =============================================================================
// AstBuilder
// =============================================================================

struct AstBuilder {
    stack: Vec<Frame>,
}

impl AstBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(Container::Root)],
        }
    }

    fn top(&mut self) -> &mut Frame {
        // Root is only popped in `finish`
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(text) => self.top().push_text(&text),
            Event::Code(code) => self.top().push_inline(Inline::Code(code.into_string())),
            Event::Html(html) => self.top().push_text(&html),
            Event::InlineHtml(html) => self.top().push_inline(Inline::RawInline(html.into_string())),
            Event::SoftBreak => self.top().push_inline(Inline::SoftBreak),
            Event::HardBreak => self.top().push_inline(Inline::LineBreak),
            Event::Rule => self.top().push_block(Block::ThematicBreak),
            Event::TaskListMarker(checked) => {
                if let Some(item) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|f| matches!(f.container, Container::Item))
                {
                    item.checked = Some(checked);
                }
            }
            Event::FootnoteReference(label) => self.top().push_text(&format!("[^{label}]")),
            Event::InlineMath(text) | Event::DisplayMath(text) => self.top().push_text(&text),
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let container = match tag {
            Tag::Paragraph => Container::Paragraph,
            Tag::Heading { level, .. } => Container::Heading(heading_level(level)),
            Tag::BlockQuote(_) => Container::BlockQuote,
            Tag::CodeBlock(kind) => Container::CodeBlock(code_lang(&kind)),
            Tag::HtmlBlock => Container::HtmlBlock,
            Tag::List(start) => Container::List(start),
            Tag::Item => Container::Item,
            Tag::Table(alignments) => {
                Container::Table(alignments.into_iter().map(alignment).collect())
            }
            Tag::TableHead => Container::TableHead,
            Tag::TableRow => Container::TableRow,
            Tag::TableCell => Container::TableCell,
            Tag::Emphasis => Container::Emphasis,
            Tag::Strong => Container::Strong,
            Tag::Strikethrough => Container::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => Container::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => Container::Image {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            _ => Container::Transparent,
        };
        self.stack.push(Frame::new(container));
    }

    fn close(&mut self, _tag: TagEnd) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            self.attach(frame);
        }
    }

    /// Hand a finished frame to its parent.
    fn attach(&mut self, mut frame: Frame) {
        let parent = self.top();
        match frame.container {
            Container::Root => {}
            Container::Paragraph => parent.push_block(Block::Paragraph(frame.inlines)),
            Container::Heading(level) => parent.push_block(Block::Heading {
                level,
                content: frame.inlines,
            }),
            Container::BlockQuote => {
                frame.flush_inlines();
                parent.push_block(Block::BlockQuote(frame.blocks));
            }
            Container::List(start) => parent.push_block(Block::List(List {
                start,
                items: frame.items,
            })),
            Container::Item => {
                frame.flush_inlines();
                parent.items.push(ListItem {
                    checked: frame.checked,
                    blocks: frame.blocks,
                });
            }
            Container::CodeBlock(lang) => parent.push_block(Block::CodeBlock {
                lang,
                code: frame.text,
            }),
            Container::HtmlBlock => parent.push_block(Block::RawBlock(frame.text)),
            Container::Table(alignments) => parent.push_block(Block::Table(Table {
                alignments,
                head: frame.head.unwrap_or_default(),
                rows: frame.rows,
            })),
            Container::TableHead => {
                parent.head = Some(TableRow { cells: frame.cells });
            }
            Container::TableRow => parent.rows.push(TableRow { cells: frame.cells }),
            Container::TableCell => parent.cells.push(TableCell {
                content: frame.inlines,
            }),
            Container::Emphasis => parent.push_inline(Inline::Emphasis(frame.inlines)),
            Container::Strong => parent.push_inline(Inline::Strong(frame.inlines)),
            Container::Strikethrough => parent.push_inline(Inline::Strikethrough(frame.inlines)),
            Container::Link { url, title } => parent.push_inline(Inline::Link(Link {
                url,
                title,
                content: frame.inlines,
            })),
            Container::Image { url, title } => parent.push_inline(Inline::Image(Image {
                url,
                title,
                alt: frame.text,
            })),
            Container::Transparent => {
                if frame.blocks.is_empty() {
                    for inline in frame.inlines {
                        parent.push_inline(inline);
                    }
                } else {
                    frame.flush_inlines();
                    for block in frame.blocks {
                        parent.push_block(block);
                    }
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Block> {
        while self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                self.attach(frame);
            }
        }
        let mut root = self
            .stack
            .pop()
            .unwrap_or_else(|| Frame::new(Container::Root));
        root.flush_inlines();
        root.blocks
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn code_lang(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
        CodeBlockKind::Indented => None,
    }
}

fn alignment(align: pulldown_cmark::Alignment) -> Alignment {
    match align {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}

// =============================================================================
// Tests
// =============================================================================
