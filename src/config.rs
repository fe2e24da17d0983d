//! Engine configuration.
//!
//! Plain data with serde support, so hosts can embed it in their own config
//! files:
//!
//! ```json
//! {
//!   "content_dir": "content/blog",
//!   "default_author": "Team",
//!   "site": { "url": "https://example.com", "publisher_name": "Example" }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default content directory, relative to the working directory.
pub const DEFAULT_CONTENT_DIR: &str = "content/blog";
/// Author used when a post's front matter omits one.
pub const DEFAULT_AUTHOR: &str = "Team";
/// Path of the blog index on the site.
pub const DEFAULT_BLOG_PATH: &str = "/blog";

// =============================================================================
// SiteConfig
// =============================================================================

/// Site identity used for structured data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute site URL without trailing slash, e.g. `https://example.com`
    pub url: String,
    /// Publisher organization name
    pub publisher_name: String,
    /// Path of the blog index, e.g. `/blog`
    pub blog_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            publisher_name: String::new(),
            blog_path: DEFAULT_BLOG_PATH.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn new(url: impl Into<String>, publisher_name: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            publisher_name: publisher_name.into(),
            ..Self::default()
        }
    }

    pub fn with_blog_path(mut self, path: impl Into<String>) -> Self {
        self.blog_path = path.into();
        self
    }

    /// `https://example.com/blog`
    pub fn blog_url(&self) -> String {
        format!("{}{}", self.url, self.blog_path)
    }

    /// `https://example.com/blog/<slug>`
    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/{slug}", self.blog_url())
    }

    /// Absolute URL for a site-relative path such as an image.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Configuration of an [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding one sub-directory per post
    pub content_dir: PathBuf,
    /// Author for posts whose front matter has none
    pub default_author: String,
    pub site: SiteConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(DEFAULT_CONTENT_DIR),
            default_author: DEFAULT_AUTHOR.to_string(),
            site: SiteConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Config for `content_dir` with defaults for everything else.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    pub fn with_site(mut self, site: SiteConfig) -> Self {
        self.site = site;
        self
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }
}
