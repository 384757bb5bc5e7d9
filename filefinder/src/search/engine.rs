use ignore::WalkBuilder;
use rayon::ThreadPoolBuilder;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::filesystem::FsSearchService;
use super::service::{SearchService, ServiceLimits};
use super::task::{SearchKind, SearchTask, TaskScope};
use crate::config::{default_worker_count, FinderConfig};
use crate::errors::{unify_path, SearchError, SearchResult};
use crate::reconcile::reconcile;
use crate::results::{Match, ReconciledResults, SearchResultSet};

type TaskOutcome = (SearchKind, SearchResult<SearchResultSet>);

/// Runs combined name and content searches over a directory and its
/// immediate subdirectories
#[derive(Clone)]
pub struct Finder {
    service: Arc<dyn SearchService>,
    limits: ServiceLimits,
    worker_count: NonZeroUsize,
    search_timeout: Option<Duration>,
}

impl Finder {
    /// Creates a finder over `service`, reading its limits once
    pub fn new(service: Arc<dyn SearchService>) -> Self {
        let limits = service.limits();
        Self {
            service,
            limits,
            worker_count: default_worker_count(),
            search_timeout: None,
        }
    }

    pub fn with_worker_count(mut self, worker_count: NonZeroUsize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_search_timeout(mut self, search_timeout: Option<Duration>) -> Self {
        self.search_timeout = search_timeout;
        self
    }

    pub fn limits(&self) -> ServiceLimits {
        self.limits
    }

    pub fn worker_count(&self) -> NonZeroUsize {
        self.worker_count
    }

    /// Searches `root_path` and each of its immediate subdirectories by
    /// `name` and by `content`, then reconciles the matches.
    ///
    /// An empty `name` or `content` disables that mode. Unusable input (empty
    /// path, no query, missing root) gives an empty result rather than an
    /// error. The first failing task aborts the whole call.
    pub fn find_combined(
        &self,
        name: &str,
        content: &str,
        root_path: impl AsRef<Path>,
    ) -> SearchResult<ReconciledResults> {
        let root_path = root_path.as_ref();

        if root_path.as_os_str().is_empty() {
            warn!("No search path provided");
            return Ok(ReconciledResults::default());
        }
        if name.is_empty() && content.is_empty() {
            warn!("Neither a name nor a content pattern was provided");
            return Ok(ReconciledResults::default());
        }

        let absolute = if root_path.is_absolute() {
            root_path.to_path_buf()
        } else {
            std::env::current_dir()?.join(root_path)
        };
        if !absolute.exists() {
            warn!("Path does not exist: {}", absolute.display());
            return Ok(ReconciledResults::default());
        }
        let root = unify_path(&absolute);

        info!(
            "Starting combined search in {} (name: {:?}, content: {:?})",
            root.display(),
            name,
            content
        );
        let started = Instant::now();

        let capacity = self.limits.max_matches;
        let service = self.service.as_ref();
        let name_query = Some(name);
        let content_query = Some(content);

        let top_name = SearchTask::new(SearchKind::Name, name_query, &root, TaskScope::TopLevel)
            .run(service, capacity)?;
        let top_content =
            SearchTask::new(SearchKind::Content, content_query, &root, TaskScope::TopLevel)
                .run(service, capacity)?;

        let mut tasks = Vec::new();
        for directory in list_subdirectories(&root)? {
            tasks.push(SearchTask::new(
                SearchKind::Name,
                name_query,
                &directory,
                TaskScope::Subdirectory,
            ));
            tasks.push(SearchTask::new(
                SearchKind::Content,
                content_query,
                &directory,
                TaskScope::Subdirectory,
            ));
        }
        debug!("Dispatching {} subdirectory tasks", tasks.len());

        let completed = self.run_on_pool(tasks)?;

        let mut dropped = top_name.dropped + top_content.dropped;
        let mut by_name: Vec<Match> = top_name.matches;
        let mut by_content: Vec<Match> = top_content.matches;
        for (kind, set) in completed {
            dropped += set.dropped;
            match kind {
                SearchKind::Name => by_name.extend(set.matches),
                SearchKind::Content => by_content.extend(set.matches),
            }
        }

        if dropped > 0 {
            warn!(
                "{} matches were dropped because a match buffer was full",
                dropped
            );
        }

        let mut results = reconcile(by_name, by_content);
        results.dropped_matches = dropped;

        info!(
            "Search complete in {:?}: {} by name, {} by content, {} combined, {} shared",
            started.elapsed(),
            results.results_only_by_name.len(),
            results.results_only_by_content.len(),
            results.combined_result.len(),
            results.intersection_result.len()
        );
        Ok(results)
    }

    /// Runs `tasks` on a fresh bounded pool and waits for all of them.
    ///
    /// Results are returned in completion order. Nothing is aggregated
    /// until every task has reported. A failed task doesn't end the wait:
    /// the first error is returned once every task has finished. Only an
    /// expired `search_timeout` returns with tasks still running.
    fn run_on_pool(&self, tasks: Vec<SearchTask>) -> SearchResult<Vec<(SearchKind, SearchResultSet)>> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.worker_count.get())
            .thread_name(|i| format!("filefinder-worker-{}", i))
            .panic_handler(|_| error!("Search worker panicked"))
            .build()
            .map_err(|e| SearchError::worker_pool(e.to_string()))?;

        let capacity = self.limits.max_matches;
        let (tx, rx) = mpsc::channel::<TaskOutcome>();
        let submitted = tasks.len();

        for task in tasks {
            let tx = tx.clone();
            let service = Arc::clone(&self.service);
            pool.spawn(move || {
                let outcome = task.run(service.as_ref(), capacity);
                if let Err(e) = &outcome {
                    debug!(
                        "{} task for {} failed: {}",
                        task.kind,
                        task.directory().display(),
                        e
                    );
                }
                // The receiver is gone once the search has timed out.
                let _ = tx.send((task.kind, outcome));
            });
        }
        drop(tx);

        let started = Instant::now();
        let mut completed = Vec::with_capacity(submitted);
        let mut first_error: Option<SearchError> = None;
        for reported in 0..submitted {
            let (kind, outcome) = self.next_outcome(&rx, started, submitted - reported)?;
            match outcome {
                Ok(set) => completed.push((kind, set)),
                Err(e) if first_error.is_none() => first_error = Some(e),
                Err(e) => debug!("Ignoring later task failure: {}", e),
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(completed),
        }
    }

    fn next_outcome(
        &self,
        rx: &mpsc::Receiver<TaskOutcome>,
        started: Instant,
        pending: usize,
    ) -> SearchResult<TaskOutcome> {
        let lost = || {
            SearchError::worker_pool(format!("{} task(s) exited without reporting", pending))
        };

        match self.search_timeout {
            None => rx.recv().map_err(|_| lost()),
            Some(limit) => {
                let remaining = limit.saturating_sub(started.elapsed());
                rx.recv_timeout(remaining).map_err(|e| match e {
                    RecvTimeoutError::Timeout => SearchError::timeout(started.elapsed(), pending),
                    RecvTimeoutError::Disconnected => lost(),
                })
            }
        }
    }
}

impl std::fmt::Debug for Finder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder")
            .field("limits", &self.limits)
            .field("worker_count", &self.worker_count)
            .field("search_timeout", &self.search_timeout)
            .finish_non_exhaustive()
    }
}

impl Default for Finder {
    fn default() -> Self {
        Self::new(Arc::new(FsSearchService::new()))
    }
}

/// Runs a combined search over the local filesystem as described by `config`
pub fn find(config: &FinderConfig) -> SearchResult<ReconciledResults> {
    let service = FsSearchService::with_limits(config.limits);
    let metrics = service.metrics().clone();
    let finder = Finder::new(Arc::new(service))
        .with_worker_count(config.worker_count)
        .with_search_timeout(config.search_timeout);

    let results = finder.find_combined(&config.name, &config.content, &config.root_path);
    metrics.log_stats();
    results
}

/// Immediate child directories of `root`, in file name order.
///
/// Symlinks to directories count as directories. Entries that can't be
/// inspected are skipped; an unreadable root is an error.
fn list_subdirectories(root: &Path) -> SearchResult<Vec<PathBuf>> {
    fs::read_dir(root).map_err(|e| SearchError::from_io(root, e))?;

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(true)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut directories = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping entry of {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            directories.push(entry.into_path());
        }
    }
    Ok(directories)
}
