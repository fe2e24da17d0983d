//! Attribute system for HTML tree elements
//!
//! Attribute names the pipeline reads or writes are a closed enum
//! ([`AttrKey`]); everything else lands in [`AttrKey::Other`]. Values stay
//! plain strings and insertion order is preserved.

use std::fmt;

use compact_str::CompactString;

/// Tag names are short; keep them inline.
pub type Tag = CompactString;

// =============================================================================
// AttrKey
// =============================================================================

/// Attribute name.
///
/// Known names always parse to their dedicated variant, so `Other` never
/// holds a name that has one. Names are lowercased on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrKey {
    Href,
    Src,
    Alt,
    Title,
    Id,
    Class,
    Style,
    Align,
    Start,
    Type,
    Checked,
    Disabled,
    Cite,
    Width,
    Height,
    Lang,
    Name,
    /// Any other attribute name, lowercased.
    Other(CompactString),
}

impl AttrKey {
    /// Parse an attribute name (case-insensitive).
    pub fn parse(name: &str) -> Self {
        let lower = CompactString::from(name.trim().to_ascii_lowercase());
        match lower.as_str() {
            "href" => Self::Href,
            "src" => Self::Src,
            "alt" => Self::Alt,
            "title" => Self::Title,
            "id" => Self::Id,
            "class" => Self::Class,
            "style" => Self::Style,
            "align" => Self::Align,
            "start" => Self::Start,
            "type" => Self::Type,
            "checked" => Self::Checked,
            "disabled" => Self::Disabled,
            "cite" => Self::Cite,
            "width" => Self::Width,
            "height" => Self::Height,
            "lang" => Self::Lang,
            "name" => Self::Name,
            _ => Self::Other(lower),
        }
    }

    /// HTML attribute name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Href => "href",
            Self::Src => "src",
            Self::Alt => "alt",
            Self::Title => "title",
            Self::Id => "id",
            Self::Class => "class",
            Self::Style => "style",
            Self::Align => "align",
            Self::Start => "start",
            Self::Type => "type",
            Self::Checked => "checked",
            Self::Disabled => "disabled",
            Self::Cite => "cite",
            Self::Width => "width",
            Self::Height => "height",
            Self::Lang => "lang",
            Self::Name => "name",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Boolean attributes render as a bare name when their value is empty.
    pub fn is_boolean(&self) -> bool {
        match self {
            Self::Checked | Self::Disabled => true,
            Self::Other(name) => matches!(name.as_str(), "open" | "hidden" | "ismap" | "nowrap"),
            _ => false,
        }
    }
}

impl From<&str> for AttrKey {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for AttrKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Attrs
// =============================================================================

/// Ordered attribute list of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(AttrKey, String)>);

impl Attrs {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&AttrKey, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Get an attribute value by key
    pub fn get(&self, key: &AttrKey) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if an attribute exists
    pub fn has(&self, key: &AttrKey) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    /// Set an attribute value (update if exists, append if not)
    pub fn set(&mut self, key: AttrKey, value: impl Into<String>) {
        let value = value.into();
        if let Some(attr) = self.0.iter_mut().find(|(k, _)| *k == key) {
            attr.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Remove an attribute, returning the old value if present
    pub fn remove(&mut self, key: &AttrKey) -> Option<String> {
        self.0
            .iter()
            .position(|(k, _)| k == key)
            .map(|pos| self.0.remove(pos).1)
    }

    /// Keep only the attributes for which `f` returns true.
    ///
    /// `f` may rewrite the value it is given.
    pub fn retain_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&AttrKey, &mut String) -> bool,
    {
        self.0.retain_mut(|(k, v)| f(k, v));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Class list
    // ─────────────────────────────────────────────────────────────────────────

    /// Class tokens in order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get(&AttrKey::Class)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Check if the class list contains `name`
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|c| c == name)
    }

    /// Append a class token. Duplicates are not filtered.
    pub fn add_class(&mut self, name: &str) {
        match self.0.iter_mut().find(|(k, _)| *k == AttrKey::Class) {
            Some((_, value)) if !value.trim().is_empty() => {
                value.push(' ');
                value.push_str(name);
            }
            Some((_, value)) => *value = name.to_string(),
            None => self.0.push((AttrKey::Class, name.to_string())),
        }
    }
}

impl FromIterator<(AttrKey, String)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (AttrKey, String)>>(iter: I) -> Self {
        let mut attrs = Attrs::new();
        for (key, value) in iter {
            attrs.set(key, value);
        }
        attrs
    }
}

// =============================================================================
// Tests
// =============================================================================
