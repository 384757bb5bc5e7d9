use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::buffer::{MatchBuffer, MatchHandle};
use crate::errors::SearchResult;

const MAX_PATH_LENGTH: usize = 10_000;
const MAX_FILENAME_LENGTH: usize = 1_000;
const MAX_CONTENT_SLICE_LENGTH: usize = 1_000;
const MAX_MATCHES: usize = 10;

/// Size bounds a search service applies to everything it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceLimits {
    /// Longest directory or file path accepted or produced
    pub max_path_length: usize,
    /// Longest file name stored, and longest name pattern accepted
    pub max_filename_length: usize,
    /// Longest content excerpt stored, and longest content pattern accepted
    pub max_content_slice_length: usize,
    /// Capacity of each match buffer
    pub max_matches: usize,
}

impl Default for ServiceLimits {
    fn default() -> Self {
        Self {
            max_path_length: MAX_PATH_LENGTH,
            max_filename_length: MAX_FILENAME_LENGTH,
            max_content_slice_length: MAX_CONTENT_SLICE_LENGTH,
            max_matches: MAX_MATCHES,
        }
    }
}

/// Single-directory search primitives.
///
/// Neither search method recurses: they look at the direct entries of
/// `directory` only and append one [`MatchHandle`] per hit to `out`.
///
/// # Thread Safety
///
/// `Send + Sync` are required: one service instance is shared by every
/// worker of a [`Finder`](crate::Finder) and called concurrently on
/// different directories.
pub trait SearchService: Send + Sync {
    /// Size bounds for this service. Read once per `Finder`.
    fn limits(&self) -> ServiceLimits;

    /// Appends every entry of `directory` whose name contains `pattern`.
    fn search_by_name(
        &self,
        pattern: &str,
        directory: &Path,
        out: &mut MatchBuffer<'_>,
    ) -> SearchResult<()>;

    /// Appends every file in `directory` with a line containing `pattern`.
    fn search_by_content(
        &self,
        pattern: &str,
        directory: &Path,
        out: &mut MatchBuffer<'_>,
    ) -> SearchResult<()>;

    /// Takes back a handle this service produced.
    fn release(&self, handle: MatchHandle) {
        drop(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ServiceLimits::default();
        assert_eq!(limits.max_path_length, 10_000);
        assert_eq!(limits.max_filename_length, 1_000);
        assert_eq!(limits.max_content_slice_length, 1_000);
        assert_eq!(limits.max_matches, 10);
    }

    #[test]
    fn test_partial_limits_fall_back_to_defaults() {
        let limits: ServiceLimits = serde_json::from_str(r#"{"max_matches": 64}"#).unwrap();
        assert_eq!(limits.max_matches, 64);
        assert_eq!(limits.max_path_length, 10_000);
    }
}
