//! Structured data (JSON-LD) for posts.
//!
//! Each post gets an `Article` record derived from its metadata unless a
//! `schema.json` beside the post overrides it. Records are opaque
//! [`serde_json::Value`]s; [`to_script_json`] makes one safe to inline in a
//! `<script type="application/ld+json">` element.

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::SiteConfig;
use crate::meta::Metadata;

const CONTEXT: &str = "https://schema.org";

/// Where a post's structured data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructuredSource {
    /// Parsed verbatim from `schema.json`
    Override,
    /// Built by [`article`]
    Derived,
}

// =============================================================================
// Derived records
// =============================================================================

/// `Article` record for a post.
pub fn article(meta: &Metadata, site: &SiteConfig) -> Value {
    let mut record = json!({
        "@context": CONTEXT,
        "@type": "Article",
        "headline": meta.title,
        "description": meta.description,
        "datePublished": meta.date_string(),
        "author": {
            "@type": "Organization",
            "name": meta.author,
        },
        "publisher": {
            "@type": "Organization",
            "name": site.publisher_name,
            "url": site.url,
        },
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": site.post_url(&meta.slug),
        },
    });
    if let Some(image) = &meta.image
        && let Some(fields) = record.as_object_mut()
    {
        fields.insert("image".into(), Value::String(site.absolute(image)));
    }
    record
}

/// Home / Blog / post `BreadcrumbList`.
pub fn breadcrumb(meta: &Metadata, site: &SiteConfig) -> Value {
    let crumbs = [
        ("Home", site.url.clone()),
        ("Blog", site.blog_url()),
        (meta.title.as_str(), site.post_url(&meta.slug)),
    ];
    let items: Vec<Value> = crumbs
        .into_iter()
        .enumerate()
        .map(|(i, (name, item))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": item,
            })
        })
        .collect();

    json!({
        "@context": CONTEXT,
        "@type": "BreadcrumbList",
        "itemListElement": items,
    })
}

// =============================================================================
// Override file
// =============================================================================

/// Parse override content: an object becomes a one-element list, an array
/// is used as is. Anything else is rejected.
pub fn parse_override(raw: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(records)) => Some(records),
        Ok(record @ Value::Object(_)) => Some(vec![record]),
        Ok(_) => None,
        Err(e) => {
            debug!("schema override is not valid JSON: {e}");
            None
        }
    }
}

/// Load an override file. A missing file is silent; an unreadable or
/// malformed one is logged and ignored.
pub fn load_override(path: &Path) -> Option<Vec<Value>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("cannot read `{}`, using derived structured data: {e}", path.display());
            return None;
        }
    };
    let records = parse_override(&raw);
    if records.is_none() {
        warn!(
            "malformed `{}`, using derived structured data",
            path.display()
        );
    }
    records
}

/// Structured data for a post: the override when valid, else the derived
/// `Article`.
pub fn resolve(
    meta: &Metadata,
    site: &SiteConfig,
    override_path: &Path,
) -> (Vec<Value>, StructuredSource) {
    match load_override(override_path) {
        Some(records) => (records, StructuredSource::Override),
        None => (vec![article(meta, site)], StructuredSource::Derived),
    }
}

// =============================================================================
// Script embedding
// =============================================================================

/// Encode `value` for a `<script>` element.
///
/// `<`, `>` and `&` become `\u` escapes so the text can never close the
/// element; U+2028/U+2029 are escaped for old JavaScript parsers. The result
/// is still valid JSON with the same value.
pub fn to_script_json(value: &Value) -> String {
    let json = value.to_string();
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn meta() -> Metadata {
        Metadata {
            title: "Hello".into(),
            description: "First post".into(),
            slug: "hello".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            author: "Team".into(),
            reading_minutes: 1,
            keywords: vec![],
            image: None,
            image_alt: None,
        }
    }

    fn site() -> SiteConfig {
        SiteConfig::new("https://example.com", "Example Inc")
    }

    #[test]
    fn test_article() {
        let record = article(&meta(), &site());
        assert_eq!(
            record,
            json!({
                "@context": "https://schema.org",
                "@type": "Article",
                "headline": "Hello",
                "description": "First post",
                "datePublished": "2024-03-01",
                "author": { "@type": "Organization", "name": "Team" },
                "publisher": {
                    "@type": "Organization",
                    "name": "Example Inc",
                    "url": "https://example.com",
                },
                "mainEntityOfPage": {
                    "@type": "WebPage",
                    "@id": "https://example.com/blog/hello",
                },
            })
        );
    }

    #[test]
    fn test_article_image() {
        let mut meta = meta();
        meta.image = Some("/img/a.png".into());
        let record = article(&meta, &site());
        assert_eq!(record["image"], "https://example.com/img/a.png");
    }

    #[test]
    fn test_breadcrumb() {
        let record = breadcrumb(&meta(), &site());
        let items = record["itemListElement"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["name"], "Home");
        assert_eq!(items[0]["item"], "https://example.com");
        assert_eq!(items[1]["item"], "https://example.com/blog");
        assert_eq!(items[2]["position"], 3);
        assert_eq!(items[2]["name"], "Hello");
        assert_eq!(items[2]["item"], "https://example.com/blog/hello");
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override(r#"{"@type": "FAQPage"}"#),
            Some(vec![json!({"@type": "FAQPage"})])
        );
        assert_eq!(
            parse_override(r#"[{"a": 1}, {"b": 2}]"#),
            Some(vec![json!({"a": 1}), json!({"b": 2})])
        );
        assert_eq!(parse_override("[]"), Some(vec![]));
        assert_eq!(parse_override("{ not json"), None);
        assert_eq!(parse_override("42"), None);
    }

    #[test]
    fn test_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");

        let (records, source) = resolve(&meta(), &site(), &path);
        assert_eq!(source, StructuredSource::Derived);
        assert_eq!(records, vec![article(&meta(), &site())]);

        fs::write(&path, r#"{"@type": "HowTo"}"#).unwrap();
        let (records, source) = resolve(&meta(), &site(), &path);
        assert_eq!(source, StructuredSource::Override);
        assert_eq!(records, vec![json!({"@type": "HowTo"})]);

        fs::write(&path, "{ broken").unwrap();
        let (records, source) = resolve(&meta(), &site(), &path);
        assert_eq!(source, StructuredSource::Derived);
        assert_eq!(records[0]["@type"], "Article");
    }

    #[test]
    fn test_to_script_json() {
        let value = json!({ "name": "</script><b>&\u{2028}" });
        let encoded = to_script_json(&value);
        assert_eq!(
            encoded,
            r#"{"name":"\u003c/script\u003e\u003cb\u003e\u0026\u2028"}"#
        );
        assert!(!encoded.contains('<'));
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}
