//! Search primitives, tasks and the worker-pool orchestrator.
//!
//! # Layers
//!
//! 1. **[`SearchService`]**: the single-directory primitives. Given a pattern and
//!    a directory, fill a [`MatchBuffer`](crate::MatchBuffer) with the entries
//!    whose name, or whose content, contains the pattern.
//!    [`FsSearchService`] implements them over the local filesystem.
//! 2. **[`SearchTask`]**: one call of one primitive on one directory, drained
//!    into a [`SearchResultSet`](crate::SearchResultSet).
//! 3. **[`Finder`]**: runs the two top-level tasks inline, fans a name task
//!    and a content task per immediate subdirectory out to a bounded rayon
//!    pool, waits for all of them, and hands the concatenated lists to
//!    [`reconcile`](crate::reconcile()).
//!
//! # Concurrency
//!
//! Every task owns its buffer and its result list. Workers report through a
//! channel and the orchestrator only starts aggregating once every task has
//! reported, so the aggregate lists never need a lock.
//!
//! ```rust,no_run
//! use filefinder::Finder;
//!
//! let results = Finder::default().find_combined("report", "quarterly", ".")?;
//! for m in &results.intersection_result {
//!     println!("{}: {}", m.file_path, m.file_content_slice);
//! }
//! # Ok::<(), filefinder::SearchError>(())
//! ```
pub mod engine;
pub mod filesystem;
pub mod matcher;
pub mod service;
pub mod task;

pub use engine::{find, Finder};
pub use filesystem::FsSearchService;
pub use matcher::PatternMatcher;
pub use service::{SearchService, ServiceLimits};
pub use task::{SearchKind, SearchTask, TaskScope};
