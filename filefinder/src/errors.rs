//! Error types for filefinder.
//!
//! Only service-level failures surface as [`SearchError`]. Bad input to
//! [`Finder::find_combined`](crate::Finder::find_combined) (empty path, no query,
//! missing root) is not an error: it yields an empty
//! [`ReconciledResults`](crate::ReconciledResults). A full match buffer is not an
//! error either; it is reported through the dropped-match counters.
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Path too long ({length} > {limit}): {path}")]
    PathTooLong {
        path: PathBuf,
        length: usize,
        limit: usize,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Search timed out after {elapsed:?} with {pending} task(s) unfinished")]
    Timeout { elapsed: Duration, pending: usize },
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Canonicalize the path and strip UNC prefixes so that
/// comparisons on Windows are consistent.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

impl SearchError {
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidPattern(pattern.into())
    }

    pub fn path_too_long(path: impl Into<PathBuf>, length: usize, limit: usize) -> Self {
        Self::PathTooLong {
            path: path.into(),
            length,
            limit,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn timeout(elapsed: Duration, pending: usize) -> Self {
        Self::Timeout { elapsed, pending }
    }

    pub fn worker_pool(msg: impl Into<String>) -> Self {
        Self::WorkerPool(msg.into())
    }

    /// Maps an IO error raised while opening `path` onto the matching variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::directory_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}
