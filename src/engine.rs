//! Post engine over a content directory.
//!
//! ```text
//! content/blog/
//! ├── hello-world/
//! │   ├── index.md       front matter + markdown body
//! │   └── schema.json    optional structured data override
//! └── second-post/
//!     └── index.md
//! ```
//!
//! Every call reads from disk and renders from scratch; posts share no
//! state, so an `Engine` can be used from any number of threads.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::convert::from_markdown;
use crate::error::PostResult;
use crate::meta::{self, Metadata};
use crate::render::render_document;
use crate::sanitize::Sanitizer;
use crate::structured::{self, StructuredSource};
use crate::transform::{Classifier, HeadingAutolinker, HeadingSlugger, Outline, Pipeline};

/// Post body file inside a slug directory.
pub const INDEX_FILE: &str = "index.md";
/// Structured data override inside a slug directory.
pub const SCHEMA_FILE: &str = "schema.json";

// =============================================================================
// Rendering
// =============================================================================

/// Rendered body of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedBody {
    /// Sanitized, annotated HTML fragment
    pub html: String,
    pub outline: Outline,
}

/// Render a markdown body: parse, lower, sanitize, enrich, serialize.
pub fn render_markdown(body: &str) -> RenderedBody {
    let doc = Pipeline::new(from_markdown(body))
        .inspect(|doc| {
            debug!(
                "lowered {} elements, {} raw html fragments",
                doc.element_count(),
                doc.ext.raw_fragments
            )
        })
        .pipe(Sanitizer::new())
        .pipe(HeadingSlugger::new())
        .pipe(HeadingAutolinker)
        .pipe(Classifier)
        .into_inner();

    debug_assert!(
        Sanitizer::new().is_clean(&doc.children),
        "enrichment produced markup the sanitizer would strip"
    );

    RenderedBody {
        html: render_document(&doc),
        outline: doc.ext,
    }
}

// =============================================================================
// Post
// =============================================================================

/// A fully rendered post, ready for a layout.
///
/// `html` is pre-sanitized and must be injected as is. Each entry of
/// `structured_data` can be embedded with [`structured::to_script_json`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub meta: Metadata,
    pub html: String,
    pub outline: Outline,
    pub structured_data: Vec<Value>,
    pub structured_source: StructuredSource,
}

// =============================================================================
// Engine
// =============================================================================

/// Lists and renders the posts of a content directory.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Directory of `slug`, or `None` if `slug` is not a plain directory name.
    pub fn post_dir(&self, slug: &str) -> Option<PathBuf> {
        is_valid_slug(slug).then(|| self.config.content_dir().join(slug))
    }

    /// Sorted slugs of every directory holding an `index.md`.
    ///
    /// A missing or unreadable content directory lists as empty.
    pub fn list_slugs(&self) -> Vec<String> {
        let dir = self.config.content_dir();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("cannot list `{}`: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut slugs: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().join(INDEX_FILE).is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        slugs.sort_unstable();
        slugs
    }

    /// Metadata of every listed post, newest first.
    ///
    /// Posts that cannot be read are logged and skipped.
    pub fn list_posts(&self) -> Vec<Metadata> {
        let mut posts: Vec<Metadata> = self
            .list_slugs()
            .into_iter()
            .filter_map(|slug| match self.read(&slug) {
                Ok((meta, _)) => Some(meta),
                Err(e) => {
                    warn!("skipping post `{slug}`: {e}");
                    None
                }
            })
            .collect();
        sort_newest_first(&mut posts, |meta| meta);
        posts
    }

    /// Load and render one post.
    ///
    /// Returns `Ok(None)` when the slug has no post. Read failures of an
    /// existing post are returned as errors.
    pub fn load_and_render(&self, slug: &str) -> PostResult<Option<Post>> {
        let Some(dir) = self.post_dir(slug) else {
            debug!("rejecting slug `{slug}`");
            return Ok(None);
        };

        let (meta, body) = match self.read(slug) {
            Ok(read) => read,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let RenderedBody { html, outline } = render_markdown(&body);
        let (structured_data, structured_source) =
            structured::resolve(&meta, &self.config.site, &dir.join(SCHEMA_FILE));

        Ok(Some(Post {
            meta,
            html,
            outline,
            structured_data,
            structured_source,
        }))
    }

    /// Render every listed post, newest first. Failing posts are logged and
    /// skipped.
    pub fn render_all(&self) -> Vec<Post> {
        let slugs = self.list_slugs();

        #[cfg(feature = "parallel")]
        let mut posts: Vec<Post> = {
            use rayon::prelude::*;
            slugs
                .par_iter()
                .filter_map(|slug| self.render_listed(slug))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let mut posts: Vec<Post> = slugs
            .iter()
            .filter_map(|slug| self.render_listed(slug))
            .collect();

        sort_newest_first(&mut posts, |post| &post.meta);
        posts
    }

    fn render_listed(&self, slug: &str) -> Option<Post> {
        match self.load_and_render(slug) {
            Ok(post) => post,
            Err(e) => {
                warn!("skipping post `{slug}`: {e}");
                None
            }
        }
    }

    fn read(&self, slug: &str) -> PostResult<(Metadata, String)> {
        let path = self.config.content_dir().join(slug).join(INDEX_FILE);
        meta::read_document(&path, &self.config.default_author, slug)
    }
}

/// A slug must be exactly one normal path component.
fn is_valid_slug(slug: &str) -> bool {
    let mut components = Path::new(slug).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == slug
    )
}

/// Date descending; ties by slug so the order is stable across runs.
fn sort_newest_first<T>(items: &mut [T], meta: impl Fn(&T) -> &Metadata) {
    items.sort_by(|a, b| {
        let (a, b) = (meta(a), meta(b));
        b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::config::SiteConfig;

    fn write_post(root: &Path, slug: &str, index: &str) {
        let dir = root.join(slug);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(INDEX_FILE), index).unwrap();
    }

    fn setup() -> (TempDir, Engine) {
        let root = tempfile::tempdir().unwrap();
        write_post(
            root.path(),
            "older",
            "---\ntitle: Older\ndate: 2023-05-01\n---\nOld body.\n",
        );
        write_post(
            root.path(),
            "newer",
            "---\ntitle: Newer\ndate: 2024-05-01\nauthor: Ada\n---\n## Why\n\n**Because.** it is.\n",
        );
        // no index.md: not a post
        fs::create_dir_all(root.path().join("drafts")).unwrap();
        fs::write(root.path().join("stray.md"), "not a directory").unwrap();

        let config = EngineConfig::new(root.path())
            .with_site(SiteConfig::new("https://example.com", "Example"));
        (root, Engine::new(config))
    }

    #[test]
    fn test_list_slugs() {
        let (_root, engine) = setup();
        assert_eq!(engine.list_slugs(), vec!["newer", "older"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let engine = Engine::new(EngineConfig::new("/definitely/not/here"));
        assert!(engine.list_slugs().is_empty());
        assert!(engine.list_posts().is_empty());
        assert!(engine.render_all().is_empty());
    }

    #[test]
    fn test_list_posts_newest_first() {
        let (_root, engine) = setup();
        let posts = engine.list_posts();
        let titles: Vec<&str> = posts.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
        assert_eq!(posts[0].author, "Ada");
        assert_eq!(posts[1].author, "Team");
        assert_eq!(posts[1].slug, "older");
    }

    #[test]
    fn test_load_and_render() {
        let (_root, engine) = setup();
        let post = engine.load_and_render("newer").unwrap().unwrap();

        assert_eq!(post.meta.title, "Newer");
        assert_eq!(
            post.html,
            "<h2 id=\"why\"><a href=\"#why\" class=\"anchor\">Why</a></h2>\n\
             <p class=\"citeable-snippet\"><strong>Because.</strong> it is.</p>"
        );
        assert_eq!(post.outline.ids().collect::<Vec<_>>(), vec!["why"]);
        assert_eq!(post.structured_source, StructuredSource::Derived);
        assert_eq!(post.structured_data.len(), 1);
        assert_eq!(post.structured_data[0]["headline"], "Newer");
        assert_eq!(
            post.structured_data[0]["mainEntityOfPage"]["@id"],
            "https://example.com/blog/newer"
        );
    }

    #[test]
    fn test_not_found() {
        let (_root, engine) = setup();
        assert!(engine.load_and_render("missing").unwrap().is_none());
        assert!(engine.load_and_render("drafts").unwrap().is_none());
        assert!(engine.load_and_render("../older").unwrap().is_none());
        assert!(engine.load_and_render("newer/").unwrap().is_none());
        assert!(engine.load_and_render("").unwrap().is_none());
        assert!(engine.load_and_render(".").unwrap().is_none());
    }

    #[test]
    fn test_schema_override() {
        let (root, engine) = setup();
        let schema = root.path().join("older").join(SCHEMA_FILE);

        fs::write(&schema, r#"{"@type": "FAQPage"}"#).unwrap();
        let post = engine.load_and_render("older").unwrap().unwrap();
        assert_eq!(post.structured_source, StructuredSource::Override);
        assert_eq!(post.structured_data, vec![json!({"@type": "FAQPage"})]);

        fs::write(&schema, r#"[{"@type": "A"}, {"@type": "B"}]"#).unwrap();
        let post = engine.load_and_render("older").unwrap().unwrap();
        assert_eq!(post.structured_data, vec![json!({"@type": "A"}), json!({"@type": "B"})]);

        fs::write(&schema, "[{ malformed").unwrap();
        let post = engine.load_and_render("older").unwrap().unwrap();
        assert_eq!(post.structured_source, StructuredSource::Derived);
        assert_eq!(post.structured_data[0]["@type"], "Article");
    }

    #[test]
    fn test_raw_html_rejected_end_to_end() {
        let root = tempfile::tempdir().unwrap();
        write_post(
            root.path(),
            "xss",
            "---\ntitle: XSS\n---\n\
             Hello <script>alert(1)</script> world.\n\n\
             <img src=\"x.png\" onerror=\"alert(2)\">\n\n\
             [link](javascript:alert(3))\n",
        );
        let engine = Engine::new(EngineConfig::new(root.path()));
        let post = engine.load_and_render("xss").unwrap().unwrap();

        assert!(!post.html.contains("<script"), "{}", post.html);
        assert!(!post.html.contains("alert(1)"), "{}", post.html);
        assert!(!post.html.contains("onerror"), "{}", post.html);
        assert!(!post.html.contains("javascript:"), "{}", post.html);
        assert!(post.html.contains("<img src=\"x.png\">"), "{}", post.html);
    }

    #[test]
    fn test_render_all() {
        let (_root, engine) = setup();
        let posts = engine.render_all();
        let slugs: Vec<&str> = posts.iter().map(|p| p.meta.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newer", "older"]);
        assert_eq!(posts[1].html, "<p>Old body.</p>");
    }

    #[test]
    fn test_render_markdown_outline() {
        let body = render_markdown("# Intro\n\n## Intro\n\n### Details\n");
        let ids: Vec<&str> = body.outline.ids().collect();
        assert_eq!(ids, vec!["intro", "intro-1", "details"]);
    }

    #[test]
    fn test_post_serializes() {
        let (_root, engine) = setup();
        let post = engine.load_and_render("older").unwrap().unwrap();
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["meta"]["date"], "2023-05-01");
        assert_eq!(json["structuredSource"], "derived");
        assert_eq!(json["outline"], json!([]));
    }

    static_assertions::assert_impl_all!(Engine: Send, Sync);
    static_assertions::assert_impl_all!(Post: Send, Sync);
}
