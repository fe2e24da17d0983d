//! Sanitization allowlist.

use std::sync::LazyLock;

use compact_str::CompactString;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::attr::{AttrKey, Tag};

/// What values an allowed attribute may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Any value
    Any,
    /// One of a fixed set, compared case-insensitively. For `class` the
    /// check is per token.
    OneOf(Vec<CompactString>),
}

impl ValuePolicy {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(allowed) => allowed.iter().any(|a| a.eq_ignore_ascii_case(value)),
        }
    }
}

/// Static allowlist: tags, attributes (global and per tag), URL protocols
/// per attribute.
///
/// An empty protocol (`""`) in a protocol set permits relative URLs.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tags: FxHashSet<Tag>,
    global: FxHashMap<AttrKey, ValuePolicy>,
    per_tag: FxHashMap<Tag, FxHashMap<AttrKey, ValuePolicy>>,
    protocols: FxHashMap<AttrKey, FxHashSet<CompactString>>,
}

static DEFAULT_SCHEMA: LazyLock<Schema> = LazyLock::new(build_default);

impl Schema {
    /// Schema that allows nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The post schema, built once per process.
    pub fn default_schema() -> &'static Schema {
        &DEFAULT_SCHEMA
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    pub fn allow_tags<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> Self {
        self.tags.extend(tags.into_iter().map(Tag::from));
        self
    }

    /// Allow attributes on every permitted tag, with any value.
    pub fn allow_global_attrs<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            self.global.insert(AttrKey::parse(name), ValuePolicy::Any);
        }
        self
    }

    /// Allow one attribute on one tag. Overrides the global policy there.
    pub fn allow_attr(mut self, tag: &str, name: &str, policy: ValuePolicy) -> Self {
        self.per_tag
            .entry(Tag::from(tag))
            .or_default()
            .insert(AttrKey::parse(name), policy);
        self
    }

    pub fn allow_protocols<'a>(
        mut self,
        attr: &str,
        protocols: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.protocols
            .entry(AttrKey::parse(attr))
            .or_default()
            .extend(protocols.into_iter().map(CompactString::from));
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Policy for `key` on `tag`; the tag-specific entry wins over the
    /// global one.
    pub fn attr_policy(&self, tag: &str, key: &AttrKey) -> Option<&ValuePolicy> {
        self.per_tag
            .get(tag)
            .and_then(|attrs| attrs.get(key))
            .or_else(|| self.global.get(key))
    }

    /// Permitted protocols for a URL-valued attribute; `None` when the
    /// attribute does not hold a URL.
    pub fn protocols(&self, key: &AttrKey) -> Option<&FxHashSet<CompactString>> {
        self.protocols.get(key)
    }

    /// Check a URL-valued attribute. Attributes without a protocol set
    /// always pass.
    pub fn is_url_allowed(&self, key: &AttrKey, value: &str) -> bool {
        self.protocols(key)
            .is_none_or(|allowed| allowed.contains(protocol_of(value).as_str()))
    }
}

/// Lowercased URL scheme, or `""` for relative URLs.
///
/// ASCII whitespace and control characters are ignored, so `java\tscript:`
/// is still `javascript`. The scheme is the text before the first `:` only
/// when that `:` comes before any `/`, `?` or `#`.
pub fn protocol_of(url: &str) -> CompactString {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect();
    match cleaned.find([':', '/', '?', '#']) {
        Some(i) if cleaned.as_bytes()[i] == b':' => {
            CompactString::from(cleaned[..i].to_ascii_lowercase())
        }
        _ => CompactString::default(),
    }
}

// =============================================================================
// Default schema
// =============================================================================

const TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "dd", "del", "details", "div", "dl", "dt", "em", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "i", "img", "input", "ins", "kbd", "li", "ol", "p",
    "picture", "pre", "q", "rp", "rt", "ruby", "s", "samp", "section", "source", "span", "strike",
    "strong", "sub", "summary", "sup", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "tt",
    "ul", "var",
];

const GLOBAL_ATTRS: &[&str] = &[
    "abbr",
    "align",
    "alt",
    "aria-describedby",
    "aria-hidden",
    "aria-label",
    "aria-labelledby",
    "axis",
    "border",
    "cellpadding",
    "cellspacing",
    "char",
    "charoff",
    "checked",
    "clear",
    "colspan",
    "compact",
    "coords",
    "datetime",
    "dir",
    "disabled",
    "headers",
    "height",
    "hreflang",
    "hspace",
    "id",
    "itemprop",
    "lang",
    "name",
    "noshade",
    "nowrap",
    "open",
    "rel",
    "rev",
    "rowspan",
    "rules",
    "scope",
    "shape",
    "size",
    "span",
    "start",
    "summary",
    "title",
    "type",
    "valign",
    "value",
    "vspace",
    "width",
];

fn build_default() -> Schema {
    let mut schema = Schema::empty()
        .allow_tags(TAGS.iter().copied())
        .allow_global_attrs(GLOBAL_ATTRS.iter().copied())
        .allow_attr("a", "href", ValuePolicy::Any)
        .allow_attr("a", "class", ValuePolicy::one_of(["anchor"]))
        .allow_attr("img", "src", ValuePolicy::Any)
        .allow_attr("img", "longdesc", ValuePolicy::Any)
        .allow_attr("code", "class", ValuePolicy::Any)
        .allow_attr("ol", "class", ValuePolicy::one_of(["contains-task-list"]))
        .allow_attr("li", "class", ValuePolicy::one_of(["task-list-item"]))
        .allow_attr("input", "type", ValuePolicy::one_of(["checkbox"]))
        .allow_attr("input", "disabled", ValuePolicy::Any)
        .allow_attr("input", "checked", ValuePolicy::Any)
        .allow_protocols("href", ["http", "https", "mailto", "irc", "ircs", "xmpp", ""])
        .allow_protocols("src", ["http", "https", ""])
        .allow_protocols("cite", ["http", "https"])
        .allow_protocols("longdesc", ["http", "https"]);

    for tag in ["blockquote", "q", "del", "ins"] {
        schema = schema.allow_attr(tag, "cite", ValuePolicy::Any);
    }
    for tag in ["th", "td"] {
        schema = schema.allow_attr(tag, "style", ValuePolicy::Any);
    }
    // Presentation hints land on these
    for tag in ["blockquote", "ul", "p", "h2"] {
        schema = schema.allow_attr(tag, "class", ValuePolicy::Any);
    }
    schema
}
