use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::service::SearchService;
use crate::buffer::MatchBuffer;
use crate::errors::SearchResult;
use crate::results::SearchResultSet;

/// Which primitive a task calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Name,
    Content,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchKind::Name => write!(f, "name"),
            SearchKind::Content => write!(f, "content"),
        }
    }
}

/// Which layer of the tree a task was dispatched for.
///
/// Informational only: every task scans exactly one directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// The root directory, searched inline
    TopLevel,
    /// An immediate child of the root, searched on a worker
    Subdirectory,
}

/// One non-recursive search of one directory
#[derive(Debug, Clone)]
pub struct SearchTask {
    pub kind: SearchKind,
    pub query: Option<String>,
    pub directory: PathBuf,
    pub scope: TaskScope,
}

impl SearchTask {
    /// Creates a task. An empty query is stored as `None`.
    pub fn new(
        kind: SearchKind,
        query: Option<&str>,
        directory: impl Into<PathBuf>,
        scope: TaskScope,
    ) -> Self {
        Self {
            kind,
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
            directory: directory.into(),
            scope,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Runs the task against `service` with a buffer of `capacity` matches.
    ///
    /// Without a query the service is never called.
    pub fn run(
        &self,
        service: &dyn SearchService,
        capacity: usize,
    ) -> SearchResult<SearchResultSet> {
        let Some(query) = self.query.as_deref() else {
            trace!(
                "No {} query for {}, skipping",
                self.kind,
                self.directory.display()
            );
            return Ok(SearchResultSet::new());
        };

        let mut buffer = MatchBuffer::new(service, capacity);
        match self.kind {
            SearchKind::Name => service.search_by_name(query, &self.directory, &mut buffer)?,
            SearchKind::Content => {
                service.search_by_content(query, &self.directory, &mut buffer)?
            }
        }

        let set = buffer.drain();
        debug!(
            "{:?} {} search in {}: {} matches, {} dropped",
            self.scope,
            self.kind,
            self.directory.display(),
            set.len(),
            set.dropped
        );
        Ok(set)
    }
}
