//! Result types produced by a search.
//!
//! A [`Match`] is the owned copy of one matched file that is left after its
//! service handle has been released. Each task yields a [`SearchResultSet`];
//! the orchestrator folds those into one [`ReconciledResults`] per call.
use serde::Serialize;

/// One matched file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Absolute, canonical path of the file. Unique key across views.
    pub file_path: String,
    /// The file name component
    pub file_name: String,
    /// The matched line, empty for name-only matches
    pub file_content_slice: String,
}

impl Match {
    pub fn new(
        file_path: impl Into<String>,
        file_name: impl Into<String>,
        file_content_slice: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            file_name: file_name.into(),
            file_content_slice: file_content_slice.into(),
        }
    }

    /// Overwrites this record's fields with the ones `other` carries.
    ///
    /// Empty fields in `other` count as absent and leave the existing value alone.
    pub fn merge_from(&mut self, other: &Match) {
        if !other.file_name.is_empty() {
            self.file_name.clone_from(&other.file_name);
        }
        if !other.file_content_slice.is_empty() {
            self.file_content_slice.clone_from(&other.file_content_slice);
        }
    }
}

/// The output of one search task
#[derive(Debug, Clone, Default)]
pub struct SearchResultSet {
    /// Matches in drain order
    pub matches: Vec<Match>,
    /// Matches the service produced but the buffer had no room for
    pub dropped: usize,
}

impl SearchResultSet {
    /// Creates a new empty result set
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// The four result views of a combined search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciledResults {
    /// Union keyed by path, content fields winning on conflict
    pub combined_result: Vec<Match>,
    /// Content matches whose path was also matched by name
    pub intersection_result: Vec<Match>,
    /// Every name match, unmerged
    pub results_only_by_name: Vec<Match>,
    /// Every content match, unmerged
    pub results_only_by_content: Vec<Match>,
    /// Matches lost to full buffers across all tasks
    pub dropped_matches: usize,
}

impl ReconciledResults {
    /// True when no view holds any match
    pub fn is_empty(&self) -> bool {
        self.combined_result.is_empty()
            && self.intersection_result.is_empty()
            && self.results_only_by_name.is_empty()
            && self.results_only_by_content.is_empty()
    }

    /// True when at least one task had to drop matches
    pub fn is_truncated(&self) -> bool {
        self.dropped_matches > 0
    }
}
