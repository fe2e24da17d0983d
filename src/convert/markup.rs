//! Markup AST → `Document<Raw>` lowering.
//!
//! One rule per AST kind, matched exhaustively. Block siblings are separated
//! by `"\n"` text nodes. Raw HTML is parsed into elements here so that the
//! sanitizer can inspect it like any other node.

use crate::attr::AttrKey;
use crate::markup::{Block, Inline, List, ListItem, Table, TableRow};
use crate::node::{Children, Document, Element, Node};
use crate::phase::{Raw, RawDocExt};

use super::html::{TreeBuilder, parse_fragment};

/// Class on task-list items.
pub const TASK_ITEM_CLASS: &str = "task-list-item";
/// Class on lists holding task items.
pub const TASK_LIST_CLASS: &str = "contains-task-list";

/// Lower parsed blocks into a raw document.
pub fn lower(blocks: &[Block]) -> Document<Raw> {
    let mut lowerer = Lowerer::default();
    let children = lowerer.blocks(blocks);
    Document::with_ext(
        children,
        RawDocExt {
            raw_fragments: lowerer.raw_fragments,
        },
    )
}

#[derive(Default)]
struct Lowerer {
    raw_fragments: usize,
}

impl Lowerer {
    fn blocks(&mut self, blocks: &[Block]) -> Children {
        let mut out = Children::new();
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                out.push(Node::text("\n"));
            }
            self.block(block, &mut out);
        }
        out
    }

    /// Blocks padded with newlines, for container elements.
    fn padded_blocks(&mut self, blocks: &[Block]) -> Children {
        let mut out = Children::new();
        out.push(Node::text("\n"));
        out.extend(self.blocks(blocks));
        out.push(Node::text("\n"));
        out
    }

    fn block(&mut self, block: &Block, out: &mut Children) {
        match block {
            Block::Heading { level, content } => {
                let mut h = Element::new(format!("h{}", (*level).clamp(1, 6)));
                h.children = self.inlines(content);
                out.push(h.into());
            }
            Block::Paragraph(content) => {
                let mut p = Element::new("p");
                p.children = self.inlines(content);
                out.push(p.into());
            }
            Block::Plain(content) => out.extend(self.inlines(content)),
            Block::List(list) => out.push(self.list(list).into()),
            Block::Table(table) => out.push(self.table(table).into()),
            Block::CodeBlock { lang, code } => {
                let mut code_elem = Element::new("code").text(code.as_str());
                if let Some(lang) = lang {
                    code_elem.set_attr(AttrKey::Class, format!("language-{lang}"));
                }
                out.push(Element::new("pre").child(code_elem).into());
            }
            Block::BlockQuote(blocks) => {
                let mut quote = Element::new("blockquote");
                quote.children = self.padded_blocks(blocks);
                out.push(quote.into());
            }
            Block::ThematicBreak => out.push(Element::new("hr").into()),
            Block::RawBlock(html) => {
                self.raw_fragments += 1;
                out.extend(parse_fragment(html));
            }
        }
    }

    fn list(&mut self, list: &List) -> Element {
        let mut elem = match list.start {
            Some(start) => {
                let ol = Element::new("ol");
                if start == 1 {
                    ol
                } else {
                    ol.attr(AttrKey::Start, start.to_string())
                }
            }
            None => Element::new("ul"),
        };
        if list.is_task_list() {
            elem.attrs.add_class(TASK_LIST_CLASS);
        }

        elem.push(Node::text("\n"));
        for item in &list.items {
            elem.push(self.list_item(item).into());
            elem.push(Node::text("\n"));
        }
        elem
    }

    fn list_item(&mut self, item: &ListItem) -> Element {
        let mut li = Element::new("li");
        let tight = item.blocks.iter().all(|b| matches!(b, Block::Plain(_)));
        li.children = if tight {
            item.blocks
                .iter()
                .flat_map(|b| match b {
                    Block::Plain(content) => self.inlines(content),
                    _ => Children::new(),
                })
                .collect()
        } else {
            self.padded_blocks(&item.blocks)
        };

        if let Some(checked) = item.checked {
            li.attrs.add_class(TASK_ITEM_CLASS);
            insert_checkbox(&mut li, checked);
        }
        li
    }

    fn table(&mut self, table: &Table) -> Element {
        let mut head_row = self.table_row(&table.head, table, "th");
        head_row.children.insert(0, Node::text("\n"));
        let thead = Element::new("thead")
            .text("\n")
            .child(head_row)
            .text("\n");

        let mut elem = Element::new("table").text("\n").child(thead).text("\n");
        if !table.rows.is_empty() {
            let mut tbody = Element::new("tbody").text("\n");
            for row in &table.rows {
                let mut tr = self.table_row(row, table, "td");
                tr.children.insert(0, Node::text("\n"));
                tbody.push(tr.into());
                tbody.push(Node::text("\n"));
            }
            elem.push(tbody.into());
            elem.push(Node::text("\n"));
        }
        elem
    }

    fn table_row(&mut self, row: &TableRow, table: &Table, cell_tag: &str) -> Element {
        let mut tr = Element::new("tr");
        for (col, cell) in row.cells.iter().enumerate() {
            let mut cell_elem = Element::new(cell_tag);
            let align = table.alignments.get(col).and_then(|a| a.as_attr());
            if let Some(align) = align {
                cell_elem.set_attr(AttrKey::Align, align);
            }
            cell_elem.children = self.inlines(&cell.content);
            tr.push(cell_elem.into());
            tr.push(Node::text("\n"));
        }
        tr
    }

    /// Lower an inline run. Raw inline HTML may open elements that capture
    /// the following siblings, so the whole run goes through one builder.
    fn inlines(&mut self, inlines: &[Inline]) -> Children {
        let mut builder = TreeBuilder::new();
        for inline in inlines {
            self.inline(inline, &mut builder);
        }
        builder.finish()
    }

    fn inline(&mut self, inline: &Inline, out: &mut TreeBuilder) {
        match inline {
            Inline::Text(text) => out.push(Node::text(text.as_str())),
            Inline::Emphasis(content) => out.push(self.wrap("em", content)),
            Inline::Strong(content) => out.push(self.wrap("strong", content)),
            Inline::Strikethrough(content) => out.push(self.wrap("del", content)),
            Inline::Link(link) => {
                let mut a = Element::new("a").attr(AttrKey::Href, link.url.as_str());
                if !link.title.is_empty() {
                    a.set_attr(AttrKey::Title, link.title.as_str());
                }
                a.children = self.inlines(&link.content);
                out.push(a.into());
            }
            Inline::Image(image) => {
                let mut img = Element::new("img")
                    .attr(AttrKey::Src, image.url.as_str())
                    .attr(AttrKey::Alt, image.alt.as_str());
                if !image.title.is_empty() {
                    img.set_attr(AttrKey::Title, image.title.as_str());
                }
                out.push(img.into());
            }
            Inline::Code(code) => out.push(Element::new("code").text(code.as_str()).into()),
            Inline::LineBreak => {
                out.push(Element::new("br").into());
                out.push(Node::text("\n"));
            }
            Inline::SoftBreak => out.push(Node::text("\n")),
            Inline::RawInline(html) => {
                self.raw_fragments += 1;
                out.feed(html);
            }
        }
    }

    fn wrap(&mut self, tag: &str, content: &[Inline]) -> Node {
        let mut elem = Element::new(tag);
        elem.children = self.inlines(content);
        elem.into()
    }
}

/// Put the disabled checkbox (and a separating space) at the start of the
/// item, inside its first paragraph when the item is loose.
fn insert_checkbox(li: &mut Element, checked: bool) {
    let mut input = Element::new("input")
        .attr(AttrKey::Type, "checkbox")
        .attr(AttrKey::Disabled, "");
    if checked {
        input.set_attr(AttrKey::Checked, "");
    }
    let nodes = [Node::element(input), Node::text(" ")];

    let first_p = li
        .children
        .iter_mut()
        .find(|n| !n.is_whitespace_text())
        .and_then(Node::as_element_mut)
        .filter(|e| e.is("p"));
    match first_p {
        Some(p) => p.children.insert_many(0, nodes),
        None => li.children.insert_many(0, nodes),
    }
}

// =============================================================================
// Tests
// =============================================================================
