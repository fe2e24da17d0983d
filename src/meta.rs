//! Metadata extraction.
//!
//! A post starts with an optional YAML front matter block:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-03-01
//! keywords: [rust, html]
//! ---
//! Body text...
//! ```
//!
//! The block is split off, its known keys are normalized into [`Metadata`],
//! and the rest is returned as the body. Header problems never fail
//! extraction: a malformed block reads as empty, a bad date falls back to
//! the file's modification date.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{PostError, PostResult};

/// Reading speed used for `reading_minutes`.
pub const WORDS_PER_MINUTE: usize = 200;

const FENCE: &str = "---";
const FENCE_END_ALT: &str = "...";

// =============================================================================
// Metadata
// =============================================================================

/// Normalized post metadata.
///
/// `date` is always a real calendar date; it serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub date: NaiveDate,
    pub author: String,
    pub reading_minutes: usize,
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
}

impl Metadata {
    /// Date as an ISO calendar string.
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Inputs the header cannot provide.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions<'a> {
    /// Author when the header has none
    pub default_author: &'a str,
    /// Slug when the header has none (usually the directory name)
    pub fallback_slug: &'a str,
    /// Source modification time, used when the date is missing or invalid
    pub modified: SystemTime,
}

/// Split `raw` and normalize its header. Returns the metadata and the body.
pub fn extract<'r>(raw: &'r str, opts: &ExtractOptions<'_>) -> (Metadata, &'r str) {
    let (block, body) = split_front_matter(raw);
    let header = block.map(FrontMatter::parse).unwrap_or_default();

    let date = header
        .date()
        .unwrap_or_else(|| DateTime::<Utc>::from(opts.modified).date_naive());

    let meta = Metadata {
        title: header.string("title").unwrap_or_default(),
        description: header.string("description").unwrap_or_default(),
        slug: header
            .string("slug")
            .unwrap_or_else(|| opts.fallback_slug.to_string()),
        date,
        author: header
            .string("author")
            .unwrap_or_else(|| opts.default_author.to_string()),
        reading_minutes: reading_minutes(body),
        keywords: header.keywords(),
        image: header.string("image"),
        image_alt: header.string("imageAlt"),
    };
    (meta, body)
}

/// Read a post file and extract its metadata. Returns the metadata and the
/// owned body.
pub fn read_document(
    path: &Path,
    default_author: &str,
    fallback_slug: &str,
) -> PostResult<(Metadata, String)> {
    let raw = fs::read_to_string(path).map_err(|e| PostError::io(path, e))?;
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| PostError::io(path, e))?;

    let opts = ExtractOptions {
        default_author,
        fallback_slug,
        modified,
    };
    let (meta, body) = extract(&raw, &opts);
    Ok((meta, body.to_string()))
}

// =============================================================================
// Front matter
// =============================================================================

/// Split a leading `---` block from the body.
///
/// The opening fence must be the first line; the block ends at the next line
/// reading `---` or `...`. Without a closing fence there is no header.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = text.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (None, text);
    };
    if first.trim_end_matches(['\r', '\n']) != FENCE {
        return (None, text);
    }

    let start = first.len();
    let mut offset = start;
    for line in lines {
        let bare = line.trim_end_matches(['\r', '\n']);
        if bare == FENCE || bare == FENCE_END_ALT {
            return (Some(&text[start..offset]), &text[offset + line.len()..]);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parsed header mapping with lenient scalar access.
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    /// Parse a YAML block. Anything but a mapping reads as an empty header.
    pub fn parse(block: &str) -> Self {
        if block.trim().is_empty() {
            return Self::default();
        }
        match serde_yaml::from_str::<Value>(block) {
            Ok(Value::Mapping(fields)) => Self { fields },
            Ok(Value::Null) => Self::default(),
            Ok(_) => {
                warn!("front matter is not a key/value mapping, ignoring it");
                Self::default()
            }
            Err(e) => {
                warn!("malformed front matter, ignoring it: {e}");
                Self::default()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Non-empty scalar value of `key` as a string.
    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(scalar_to_string)
            .filter(|s| !s.is_empty())
    }

    /// `keywords` as a sequence or a comma-separated string.
    pub fn keywords(&self) -> Vec<String> {
        match self.get("keywords").map(untag) {
            Some(Value::Sequence(items)) => items
                .iter()
                .filter_map(scalar_to_string)
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.string("date").as_deref().and_then(parse_date)
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match untag(value) {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse the date shapes accepted in headers.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|datetime| datetime.date())
}

// =============================================================================
// Reading time
// =============================================================================

/// Whitespace-separated tokens of the unrendered body.
pub fn count_words(body: &str) -> usize {
    body.split_whitespace().count()
}

/// Minutes to read `body`, rounded up.
pub fn reading_minutes(body: &str) -> usize {
    count_words(body).div_ceil(WORDS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    // 2023-11-14T22:13:20Z
    const MTIME_SECS: u64 = 1_700_000_000;

    fn opts() -> ExtractOptions<'static> {
        ExtractOptions {
            default_author: "Team",
            fallback_slug: "dir-name",
            modified: SystemTime::UNIX_EPOCH + Duration::from_secs(MTIME_SECS),
        }
    }

    fn mtime_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 11, 14).unwrap()
    }

    #[test]
    fn test_split_front_matter() {
        assert_eq!(
            split_front_matter("---\ntitle: A\n---\nbody\n"),
            (Some("title: A\n"), "body\n")
        );
        assert_eq!(
            split_front_matter("\u{feff}---\r\ntitle: A\r\n...\r\nbody"),
            (Some("title: A\r\n"), "body")
        );
        assert_eq!(split_front_matter("---\n---\nbody"), (Some(""), "body"));
    }

    #[test]
    fn test_split_without_header() {
        assert_eq!(split_front_matter("just text\n"), (None, "just text\n"));
        assert_eq!(split_front_matter(""), (None, ""));
        // unclosed block is body
        assert_eq!(
            split_front_matter("---\ntitle: A\nbody"),
            (None, "---\ntitle: A\nbody")
        );
        // a fence later in the text is a thematic break, not a header
        assert_eq!(split_front_matter("intro\n---\n"), (None, "intro\n---\n"));
    }

    #[test]
    fn test_extract_full_header() {
        let raw = "---\n\
            title: Hello World\n\
            description: A first post\n\
            slug: hello\n\
            date: 2024-03-01\n\
            author: Ada\n\
            keywords: [rust, html]\n\
            image: /img/hello.png\n\
            imageAlt: A greeting\n\
            unknown: ignored\n\
            ---\n\
            one two three\n";
        let (meta, body) = extract(raw, &opts());

        assert_eq!(body, "one two three\n");
        assert_eq!(meta.title, "Hello World");
        assert_eq!(meta.description, "A first post");
        assert_eq!(meta.slug, "hello");
        assert_eq!(meta.date_string(), "2024-03-01");
        assert_eq!(meta.author, "Ada");
        assert_eq!(meta.reading_minutes, 1);
        assert_eq!(meta.keywords, vec!["rust", "html"]);
        assert_eq!(meta.image.as_deref(), Some("/img/hello.png"));
        assert_eq!(meta.image_alt.as_deref(), Some("A greeting"));
    }

    #[test]
    fn test_extract_defaults() {
        let (meta, body) = extract("No header here.", &opts());
        assert_eq!(body, "No header here.");
        assert_eq!(meta.title, "");
        assert_eq!(meta.slug, "dir-name");
        assert_eq!(meta.author, "Team");
        assert_eq!(meta.date, mtime_date());
        assert!(meta.keywords.is_empty());
        assert_eq!(meta.image, None);
    }

    #[test]
    fn test_keywords_comma_string() {
        let (meta, _) = extract("---\nkeywords: \"rust, web ,, html\"\n---\n", &opts());
        assert_eq!(meta.keywords, vec!["rust", "web", "html"]);
    }

    #[test]
    fn test_scalar_coercion() {
        let (meta, _) = extract("---\ntitle: 2024\nauthor: \"\"\n---\n", &opts());
        assert_eq!(meta.title, "2024");
        // empty author falls back to the default
        assert_eq!(meta.author, "Team");
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        for value in [
            "2024-03-01",
            "2024-03-01T10:00:00Z",
            "2024-03-01T10:00:00+02:00",
            "2024-03-01T10:00:00",
            "2024-03-01 10:00:00",
            "2024-03-01T10:00:00.250",
        ] {
            assert_eq!(parse_date(value), expected, "{value}");
        }
        assert_eq!(parse_date("March 1st"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_garbage_date_falls_back_to_mtime() {
        for header in ["date: not a date", "date: 2024-02-30", "date: [1, 2]", "date: 20240301"] {
            let raw = format!("---\n{header}\n---\nbody");
            let (meta, _) = extract(&raw, &opts());
            assert_eq!(meta.date, mtime_date(), "{header}");
        }
    }

    #[test]
    fn test_malformed_yaml_is_empty_header() {
        let (meta, body) = extract("---\ntitle: [unclosed\n---\nbody text", &opts());
        assert_eq!(body, "body text");
        assert_eq!(meta.title, "");
        assert_eq!(meta.author, "Team");
        assert_eq!(meta.date, mtime_date());

        assert!(FrontMatter::parse("- a\n- b\n").is_empty());
    }

    #[test]
    fn test_reading_minutes() {
        assert_eq!(reading_minutes(""), 0);
        assert_eq!(reading_minutes("word"), 1);
        assert_eq!(reading_minutes(&"w ".repeat(200)), 1);
        assert_eq!(reading_minutes(&"w ".repeat(201)), 2);
        assert_eq!(count_words("  a\tb\n\nc  "), 3);
    }

    #[test]
    fn test_serialize_camel_case() {
        let (meta, _) = extract("---\ntitle: T\ndate: 2024-01-05\nimageAlt: alt\n---\n", &opts());
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["date"], "2024-01-05");
        assert_eq!(json["readingMinutes"], 0);
        assert_eq!(json["imageAlt"], "alt");
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_read_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.md");
        fs::write(&path, "---\ntitle: From disk\n---\nHello there\n").unwrap();

        let (meta, body) = read_document(&path, "Team", "post").unwrap();
        assert_eq!(meta.title, "From disk");
        assert_eq!(meta.slug, "post");
        assert_eq!(body, "Hello there\n");

        let missing = read_document(&dir.path().join("nope.md"), "Team", "post");
        assert!(missing.is_err_and(|e| e.is_not_found()));
    }

    proptest! {
        #[test]
        fn prop_reading_time_monotonic(
            base in proptest::collection::vec("[a-z]{1,8}", 0..600),
            extra in proptest::collection::vec("[a-z]{1,8}", 1..300),
        ) {
            let a = base.join(" ");
            let b = format!("{a} {}", extra.join(" "));
            prop_assert!(reading_minutes(&a) <= reading_minutes(&b));
        }

        #[test]
        fn prop_date_always_valid(value in "\\PC{0,24}") {
            let raw = format!("---\ndate: \"{}\"\n---\n", value.replace(['"', '\\'], ""));
            let (meta, _) = extract(&raw, &opts());
            prop_assert!(parse_date(&meta.date_string()).is_some());
        }
    }
}
