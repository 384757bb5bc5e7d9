use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks match handle lifetimes and scan activity for a search service
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    // Handle lifetime
    handles_allocated: Arc<AtomicU64>,
    handles_released: Arc<AtomicU64>,

    // Buffer overflow
    matches_dropped: Arc<AtomicU64>,

    // Scan activity
    directories_scanned: Arc<AtomicU64>,
    files_read: Arc<AtomicU64>,
    unreadable_files: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            handles_allocated: Arc::new(AtomicU64::new(0)),
            handles_released: Arc::new(AtomicU64::new(0)),
            matches_dropped: Arc::new(AtomicU64::new(0)),
            directories_scanned: Arc::new(AtomicU64::new(0)),
            files_read: Arc::new(AtomicU64::new(0)),
            unreadable_files: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a handle handed out by the service
    pub fn record_allocation(&self) {
        let total = self.handles_allocated.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Match handle allocated, total allocated: {}", total);
    }

    /// Records a handle given back to the service
    pub fn record_release(&self) {
        let total = self.handles_released.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Match handle released, total released: {}", total);
    }

    /// Records a match rejected by a full buffer
    pub fn record_drop(&self) {
        self.matches_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one directory listing
    pub fn record_directory_scan(&self) {
        self.directories_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file opened for content matching
    pub fn record_file_read(&self, readable: bool) {
        if readable {
            self.files_read.fetch_add(1, Ordering::Relaxed);
        } else {
            self.unreadable_files.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Handles allocated but not yet released
    pub fn live_handles(&self) -> u64 {
        let allocated = self.handles_allocated.load(Ordering::Relaxed);
        let released = self.handles_released.load(Ordering::Relaxed);
        allocated.saturating_sub(released)
    }

    /// Gets the current statistics
    pub fn get_stats(&self) -> SearchStats {
        SearchStats {
            handles_allocated: self.handles_allocated.load(Ordering::Relaxed),
            handles_released: self.handles_released.load(Ordering::Relaxed),
            matches_dropped: self.matches_dropped.load(Ordering::Relaxed),
            directories_scanned: self.directories_scanned.load(Ordering::Relaxed),
            files_read: self.files_read.load(Ordering::Relaxed),
            unreadable_files: self.unreadable_files.load(Ordering::Relaxed),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Handles allocated/released: {}/{}\n\
             Matches dropped: {}\n\
             Directories scanned: {}\n\
             Files read (ok/unreadable): {}/{}",
            stats.handles_allocated,
            stats.handles_released,
            stats.matches_dropped,
            stats.directories_scanned,
            stats.files_read,
            stats.unreadable_files
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub handles_allocated: u64,
    pub handles_released: u64,
    pub matches_dropped: u64,
    pub directories_scanned: u64,
    pub files_read: u64,
    pub unreadable_files: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_allocation();
        metrics.record_allocation();
        assert_eq!(metrics.live_handles(), 2);

        metrics.record_release();
        let stats = metrics.get_stats();
        assert_eq!(stats.handles_allocated, 2);
        assert_eq!(stats.handles_released, 1);
        assert_eq!(metrics.live_handles(), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = SearchMetrics::new();
        let shared = metrics.clone();

        shared.record_drop();
        shared.record_directory_scan();
        let stats = metrics.get_stats();
        assert_eq!(stats.matches_dropped, 1);
        assert_eq!(stats.directories_scanned, 1);
    }

    #[test]
    fn test_file_read_tracking() {
        let metrics = SearchMetrics::new();

        metrics.record_file_read(true);
        metrics.record_file_read(true);
        metrics.record_file_read(false);

        let stats = metrics.get_stats();
        assert_eq!(stats.files_read, 2);
        assert_eq!(stats.unreadable_files, 1);
    }
}
