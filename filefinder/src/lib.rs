pub mod buffer;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod reconcile;
pub mod results;
pub mod search;

pub use buffer::{MatchBuffer, MatchHandle};
pub use config::FinderConfig;
pub use errors::{SearchError, SearchResult};
pub use reconcile::reconcile;
pub use results::{Match, ReconciledResults, SearchResultSet};
pub use search::{find, Finder, FsSearchService, SearchService, ServiceLimits};
