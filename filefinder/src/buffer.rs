//! Fixed-capacity transfer buffer between a [`SearchService`] and its caller.
//!
//! The service fills a [`MatchBuffer`] with [`MatchHandle`]s; the caller drains
//! it. Every handle that enters a buffer goes back to the service through
//! [`SearchService::release`] exactly once, whichever way it leaves:
//!
//! - drained: the record is copied out first, then the handle is released
//! - rejected on append because the buffer is full or already drained
//! - still stored when the buffer is dropped
//!
//! `release` takes the handle by value, so a second release of the same
//! handle cannot be written.
use tracing::{trace, warn};

use crate::results::{Match, SearchResultSet};
use crate::search::SearchService;

/// A match owned by the service that produced it
#[derive(Debug)]
pub struct MatchHandle {
    record: Box<Match>,
}

impl MatchHandle {
    pub fn new(record: Match) -> Self {
        Self {
            record: Box::new(record),
        }
    }

    pub fn record(&self) -> &Match {
        &self.record
    }
}

/// Bounded, single-use, last-in-first-out match buffer
pub struct MatchBuffer<'s> {
    service: &'s dyn SearchService,
    handles: Vec<MatchHandle>,
    capacity: usize,
    dropped: usize,
    exhausted: bool,
}

impl<'s> MatchBuffer<'s> {
    /// Creates an empty buffer that releases its handles to `service`
    pub fn new(service: &'s dyn SearchService, capacity: usize) -> Self {
        Self {
            service,
            handles: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
            exhausted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.handles.len() >= self.capacity
    }

    /// Number of handles rejected so far
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Stores `handle` and returns true, or releases it and counts a drop.
    pub fn append(&mut self, handle: MatchHandle) -> bool {
        if self.exhausted {
            warn!(
                "Buffer already drained, match dropped: {}",
                handle.record().file_path
            );
            self.reject(handle);
            return false;
        }

        if self.is_full() {
            warn!(
                "Buffer full ({} matches), match dropped: {}",
                self.capacity,
                handle.record().file_path
            );
            self.reject(handle);
            return false;
        }

        trace!("Buffered match: {}", handle.record().file_path);
        self.handles.push(handle);
        true
    }

    /// Removes the most recently appended match, releasing its handle.
    ///
    /// The first call seals the buffer: later appends are rejected.
    pub fn drain_one(&mut self) -> Option<Match> {
        self.exhausted = true;
        let handle = self.handles.pop()?;
        let record = handle.record().clone();
        self.service.release(handle);
        Some(record)
    }

    /// Drains every stored match into a result set, consuming the buffer
    pub fn drain(mut self) -> SearchResultSet {
        let mut matches = Vec::with_capacity(self.handles.len());
        while let Some(record) = self.drain_one() {
            matches.push(record);
        }
        SearchResultSet {
            matches,
            dropped: self.dropped,
        }
    }

    fn reject(&mut self, handle: MatchHandle) {
        self.dropped += 1;
        self.service.release(handle);
    }
}

impl Drop for MatchBuffer<'_> {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            self.service.release(handle);
        }
    }
}

impl std::fmt::Debug for MatchBuffer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchBuffer")
            .field("len", &self.handles.len())
            .field("capacity", &self.capacity)
            .field("dropped", &self.dropped)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SearchResult;
    use crate::search::ServiceLimits;
    use std::path::Path;
    use std::sync::Mutex;

    /// Service that only tracks which handles come back
    #[derive(Default)]
    struct ReleaseLog {
        released: Mutex<Vec<String>>,
    }

    impl ReleaseLog {
        fn released(&self) -> Vec<String> {
            self.released.lock().unwrap().clone()
        }
    }

    impl SearchService for ReleaseLog {
        fn limits(&self) -> ServiceLimits {
            ServiceLimits::default()
        }

        fn search_by_name(
            &self,
            _pattern: &str,
            _directory: &Path,
            _out: &mut MatchBuffer<'_>,
        ) -> SearchResult<()> {
            Ok(())
        }

        fn search_by_content(
            &self,
            _pattern: &str,
            _directory: &Path,
            _out: &mut MatchBuffer<'_>,
        ) -> SearchResult<()> {
            Ok(())
        }

        fn release(&self, handle: MatchHandle) {
            self.released
                .lock()
                .unwrap()
                .push(handle.record().file_path.clone());
        }
    }

    fn handle(i: usize) -> MatchHandle {
        MatchHandle::new(Match::new(format!("/tmp/f{}", i), format!("f{}", i), ""))
    }

    #[test]
    fn test_append_beyond_capacity_drops_exactly_one() {
        let log = ReleaseLog::default();
        let mut buffer = MatchBuffer::new(&log, 3);

        let stored: Vec<bool> = (0..4).map(|i| buffer.append(handle(i))).collect();
        assert_eq!(stored, vec![true, true, true, false]);
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.dropped(), 1);
        // The rejected handle goes straight back to the service.
        assert_eq!(log.released(), vec!["/tmp/f3".to_string()]);
    }

    #[test]
    fn test_drain_is_last_in_first_out() {
        let log = ReleaseLog::default();
        let mut buffer = MatchBuffer::new(&log, 5);
        for i in 0..3 {
            buffer.append(handle(i));
        }

        let set = buffer.drain();
        let paths: Vec<_> = set.matches.iter().map(|m| m.file_path.as_str()).collect();
        assert_eq!(paths, vec!["/tmp/f2", "/tmp/f1", "/tmp/f0"]);
        assert_eq!(set.dropped, 0);
    }

    #[test]
    fn test_drain_releases_each_handle_once() {
        let log = ReleaseLog::default();
        let mut buffer = MatchBuffer::new(&log, 10);
        for i in 0..10 {
            buffer.append(handle(i));
        }

        let set = buffer.drain();
        assert_eq!(set.len(), 10);

        let mut released = log.released();
        released.sort();
        released.dedup();
        assert_eq!(released.len(), 10);
    }

    #[test]
    fn test_drain_one_on_empty_buffer() {
        let log = ReleaseLog::default();
        let mut buffer = MatchBuffer::new(&log, 2);
        assert!(buffer.drain_one().is_none());
        assert!(log.released().is_empty());
    }

    #[test]
    fn test_drained_buffer_rejects_refill() {
        let log = ReleaseLog::default();
        let mut buffer = MatchBuffer::new(&log, 2);
        buffer.append(handle(0));
        assert!(buffer.drain_one().is_some());
        assert!(buffer.drain_one().is_none());

        assert!(!buffer.append(handle(1)));
        assert!(buffer.is_empty());
        assert_eq!(buffer.dropped(), 1);
    }

    #[test]
    fn test_drop_releases_undrained_handles() {
        let log = ReleaseLog::default();
        {
            let mut buffer = MatchBuffer::new(&log, 4);
            buffer.append(handle(0));
            buffer.append(handle(1));
            buffer.drain_one();
        }
        let mut released = log.released();
        released.sort();
        assert_eq!(released, vec!["/tmp/f0".to_string(), "/tmp/f1".to_string()]);
    }

    #[test]
    fn test_zero_capacity_buffer() {
        let log = ReleaseLog::default();
        let mut buffer = MatchBuffer::new(&log, 0);
        assert!(buffer.is_full());
        assert!(!buffer.append(handle(0)));
        assert_eq!(buffer.drain().dropped, 1);
    }
}
