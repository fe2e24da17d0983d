//! Raw HTML passthrough: tokenizer and tolerant tree builder.
//!
//! Markdown hands raw HTML over in pieces: a whole block, or one tag at a
//! time for inline HTML. The tokenizer turns a piece into tokens; the
//! [`TreeBuilder`] keeps its open-element stack across pieces, so an inline
//! `<script>` captures the text lowered after it until `</script>` shows up.
//!
//! Nothing here decides what is safe. Every tag and attribute is kept so
//! the sanitizer sees the real structure.

use std::borrow::Cow;

use crate::attr::{AttrKey, Attrs, Tag};
use crate::node::{Children, Element, Node};

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "textarea", "title", "iframe", "noscript", "xmp", "noembed", "noframes",
];

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag {
        name: Tag,
        attrs: Attrs,
        self_closing: bool,
    },
    EndTag {
        name: Tag,
    },
    /// Decoded text (raw-text element content stays verbatim)
    Text(String),
    /// Comment, doctype or processing instruction
    Comment,
}

/// Tokenize an HTML fragment.
///
/// Never fails: a `<` that does not start a well-formed tag is text.
pub fn tokenize(input: &str) -> Vec<Token> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }
        let Some((token, end)) = scan_markup(input, pos) else {
            pos += 1;
            continue;
        };

        push_text(&mut tokens, &input[text_start..pos]);
        let raw_text = match &token {
            Token::StartTag {
                name,
                self_closing: false,
                ..
            } if RAW_TEXT_ELEMENTS.contains(&name.as_str()) => Some(name.clone()),
            _ => None,
        };
        tokens.push(token);
        pos = end;

        if let Some(name) = raw_text {
            let close = find_end_tag(input, pos, &name).unwrap_or(input.len());
            if close > pos {
                tokens.push(Token::Text(input[pos..close].to_string()));
            }
            pos = close;
        }
        text_start = pos;
    }
    push_text(&mut tokens, &input[text_start..]);
    tokens
}

fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if !text.is_empty() {
        tokens.push(Token::Text(decode(text).into_owned()));
    }
}

fn decode(s: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(s)
}

/// Scan markup starting at the `<` at `pos`; returns the token and the
/// position just past it.
fn scan_markup(input: &str, pos: usize) -> Option<(Token, usize)> {
    let rest = &input[pos..];
    if let Some(body) = rest.strip_prefix("<!--") {
        let end = body.find("-->").map_or(input.len(), |i| pos + 4 + i + 3);
        return Some((Token::Comment, end));
    }

    let bytes = rest.as_bytes();
    match bytes.get(1) {
        Some(b'!' | b'?') => {
            let end = rest.find('>')?;
            Some((Token::Comment, pos + end + 1))
        }
        Some(b'/') if bytes.get(2).is_some_and(u8::is_ascii_alphabetic) => {
            let end = rest.find('>')?;
            let name = tag_name(&rest[2..end]);
            Some((Token::EndTag { name }, pos + end + 1))
        }
        Some(c) if c.is_ascii_alphabetic() => scan_start_tag(input, pos),
        _ => None,
    }
}

fn tag_name(s: &str) -> Tag {
    let end = s
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(s.len());
    Tag::from(s[..end].to_ascii_lowercase())
}

/// Parse `<name attr=value ...>`. Returns `None` when the tag or one of its
/// quoted values is unterminated.
fn scan_start_tag(input: &str, pos: usize) -> Option<(Token, usize)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let is_delim = |b: u8| b.is_ascii_whitespace() || b == b'/' || b == b'>';

    let mut i = pos + 1;
    while i < len && !is_delim(bytes[i]) {
        i += 1;
    }
    let name = Tag::from(input[pos + 1..i].to_ascii_lowercase());
    let mut attrs = Attrs::new();

    loop {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                let token = Token::StartTag {
                    name,
                    attrs,
                    self_closing: false,
                };
                return Some((token, i + 1));
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                let token = Token::StartTag {
                    name,
                    attrs,
                    self_closing: true,
                };
                return Some((token, i + 2));
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        // Attribute name
        let name_start = i;
        while i < len && !is_delim(bytes[i]) && bytes[i] != b'=' {
            i += 1;
        }
        if i == name_start {
            // stray '='
            i += 1;
            continue;
        }
        let key = AttrKey::parse(&input[name_start..i]);

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&(quote @ (b'"' | b'\''))) => {
                    let start = i + 1;
                    let close = input[start..].find(quote as char)?;
                    value = decode(&input[start..start + close]).into_owned();
                    i = start + close + 1;
                }
                _ => {
                    let start = i;
                    while i < len && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode(&input[start..i]).into_owned();
                }
            }
        }

        // First occurrence wins
        if !attrs.has(&key) {
            attrs.set(key, value);
        }
    }
}

/// Position of the `</name` closing a raw-text element, case-insensitive.
fn find_end_tag(input: &str, from: usize, name: &str) -> Option<usize> {
    let haystack = input[from..].to_ascii_lowercase();
    let needle = format!("</{name}");
    let mut offset = 0;
    while let Some(idx) = haystack[offset..].find(&needle) {
        let at = offset + idx;
        let after = haystack.as_bytes().get(at + needle.len());
        if after.is_none_or(|b| b.is_ascii_whitespace() || *b == b'/' || *b == b'>') {
            return Some(from + at);
        }
        offset = at + needle.len();
    }
    None
}

// =============================================================================
// TreeBuilder
// =============================================================================

/// Tolerant tree construction over a token stream.
///
/// Unmatched end tags are ignored; whatever is still open at
/// [`finish`](Self::finish) is closed there.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: Children,
    open: Vec<Element>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already-built node at the current insertion point.
    pub fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(elem) => elem.children.push(node),
            None => self.root.push(node),
        }
    }

    /// Tokenize an HTML piece and apply it.
    pub fn feed(&mut self, html: &str) {
        for token in tokenize(html) {
            self.token(token);
        }
    }

    fn token(&mut self, token: Token) {
        match token {
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                let elem = Element {
                    tag: name,
                    attrs,
                    children: Children::new(),
                };
                if self_closing || elem.is_void() {
                    self.push(Node::element(elem));
                } else {
                    self.open.push(elem);
                }
            }
            Token::EndTag { name } => {
                if let Some(idx) = self.open.iter().rposition(|e| e.tag == name) {
                    while self.open.len() > idx {
                        self.close_top();
                    }
                }
            }
            Token::Text(text) => self.push(Node::text(text)),
            Token::Comment => {}
        }
    }

    fn close_top(&mut self) {
        if let Some(elem) = self.open.pop() {
            self.push(Node::element(elem));
        }
    }

    /// Close everything still open and return the built nodes.
    pub fn finish(mut self) -> Children {
        while !self.open.is_empty() {
            self.close_top();
        }
        self.root
    }
}

/// Parse a self-contained HTML fragment.
pub fn parse_fragment(html: &str) -> Children {
    let mut builder = TreeBuilder::new();
    builder.feed(html);
    builder.finish()
}

// =============================================================================
// Tests
// =============================================================================
