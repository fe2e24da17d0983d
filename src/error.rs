//! Error types for tola-post.
//!
//! Almost every content problem is recovered where it happens (bad dates,
//! malformed front matter or `schema.json`, unsafe markup). What remains is
//! failing to read a post that was asked for by name.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors surfaced to callers.
#[derive(Debug, Error)]
pub enum PostError {
    /// Reading a post file (or its metadata) failed
    #[error("failed to read `{}`", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for post operations.
pub type PostResult<T> = Result<T, PostError>;

impl PostError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the underlying I/O error is "not found".
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
        }
    }
}
