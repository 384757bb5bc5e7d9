use ignore::{DirEntry, WalkBuilder};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, trace, warn};

use super::matcher::PatternMatcher;
use super::service::{SearchService, ServiceLimits};
use crate::buffer::{MatchBuffer, MatchHandle};
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;
use crate::results::Match;

const BUFFER_CAPACITY: usize = 8192;
const LINE_CHUNK: u64 = 64 * 1024;

/// [`SearchService`] over the local filesystem
#[derive(Debug, Clone, Default)]
pub struct FsSearchService {
    limits: ServiceLimits,
    metrics: SearchMetrics,
}

impl FsSearchService {
    /// Creates a service with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service with custom limits
    pub fn with_limits(limits: ServiceLimits) -> Self {
        Self {
            limits,
            metrics: SearchMetrics::new(),
        }
    }

    /// Gets the handle and scan counters
    pub fn metrics(&self) -> &SearchMetrics {
        &self.metrics
    }

    fn check_directory(&self, directory: &Path) -> SearchResult<()> {
        let length = directory.as_os_str().len();
        if length > self.limits.max_path_length {
            return Err(SearchError::path_too_long(
                directory,
                length,
                self.limits.max_path_length,
            ));
        }

        let metadata = fs::metadata(directory).map_err(|e| SearchError::from_io(directory, e))?;
        if !metadata.is_dir() {
            return Err(SearchError::directory_not_found(directory));
        }
        Ok(())
    }

    /// Lists the direct entries of `directory`, skipping ones that can't be read
    fn entries(&self, directory: &Path) -> Vec<DirEntry> {
        self.metrics.record_directory_scan();

        let mut builder = WalkBuilder::new(directory);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b));

        builder
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", directory.display(), e);
                    None
                }
            })
            .filter(|entry| entry.depth() == 1)
            .collect()
    }

    /// Builds a handle for `entry`, or None when its path exceeds the limit
    fn allocate(&self, entry: &DirEntry, content_slice: &str) -> Option<MatchHandle> {
        let file_path = entry.path().to_string_lossy().into_owned();
        if file_path.len() > self.limits.max_path_length {
            warn!(
                "Skipping match with path longer than {}: {}",
                self.limits.max_path_length, file_path
            );
            return None;
        }

        let file_name = truncate_chars(
            &entry.file_name().to_string_lossy(),
            self.limits.max_filename_length,
        );
        let content_slice = truncate_chars(content_slice, self.limits.max_content_slice_length);

        self.metrics.record_allocation();
        Some(MatchHandle::new(Match::new(
            file_path,
            file_name,
            content_slice,
        )))
    }

    fn push(&self, out: &mut MatchBuffer<'_>, handle: MatchHandle) {
        if !out.append(handle) {
            self.metrics.record_drop();
        }
    }

    /// Returns the first line of `path` containing the pattern, trimmed.
    ///
    /// Lines are read at most `LINE_CHUNK` bytes at a time. When a chunk ends
    /// mid-line its last `overlap` bytes are kept in front of the next chunk,
    /// so a match across the boundary is still found.
    fn first_matching_line(
        &self,
        path: &Path,
        matcher: &PatternMatcher,
        overlap: usize,
    ) -> Option<String> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to open file {}: {}", path.display(), e);
                self.metrics.record_file_read(false);
                return None;
            }
        };
        self.metrics.record_file_read(true);

        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut chunk = Vec::with_capacity(256);
        loop {
            match reader.by_ref().take(LINE_CHUNK).read_until(b'\n', &mut chunk) {
                Ok(0) => return None,
                Ok(_) => {
                    let text = String::from_utf8_lossy(&chunk);
                    if matcher.is_match(&text) {
                        return Some(text.trim().to_string());
                    }
                    if chunk.ends_with(b"\n") {
                        chunk.clear();
                    } else {
                        let cut = chunk.len().saturating_sub(overlap);
                        chunk.drain(..cut);
                    }
                }
                Err(e) => {
                    warn!("Failed to read file {}: {}", path.display(), e);
                    return None;
                }
            }
        }
    }
}

impl SearchService for FsSearchService {
    fn limits(&self) -> ServiceLimits {
        self.limits
    }

    fn search_by_name(
        &self,
        pattern: &str,
        directory: &Path,
        out: &mut MatchBuffer<'_>,
    ) -> SearchResult<()> {
        debug!(
            "Searching by name with params: {}, {}",
            pattern,
            directory.display()
        );

        if pattern.chars().count() > self.limits.max_filename_length {
            return Err(SearchError::invalid_pattern(format!(
                "name pattern longer than {} characters",
                self.limits.max_filename_length
            )));
        }
        self.check_directory(directory)?;

        let matcher = PatternMatcher::new(pattern)?;
        for entry in self.entries(directory) {
            if !matcher.is_match(&entry.file_name().to_string_lossy()) {
                continue;
            }
            trace!("Name match: {}", entry.path().display());
            if let Some(handle) = self.allocate(&entry, "") {
                self.push(out, handle);
            }
        }
        Ok(())
    }

    fn search_by_content(
        &self,
        pattern: &str,
        directory: &Path,
        out: &mut MatchBuffer<'_>,
    ) -> SearchResult<()> {
        debug!(
            "Searching by content with params: {}, {}",
            pattern,
            directory.display()
        );

        if pattern.chars().count() > self.limits.max_content_slice_length {
            return Err(SearchError::invalid_pattern(format!(
                "content pattern longer than {} characters",
                self.limits.max_content_slice_length
            )));
        }
        self.check_directory(directory)?;

        let matcher = PatternMatcher::new(pattern)?;
        // Case folding can change byte lengths, so keep generous slack.
        let overlap = pattern.len() * 4;
        for entry in self.entries(directory) {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let Some(line) = self.first_matching_line(entry.path(), &matcher, overlap) else {
                continue;
            };
            trace!("Content match: {}: {}", entry.path().display(), line);
            if let Some(handle) = self.allocate(&entry, &line) {
                self.push(out, handle);
            }
        }
        Ok(())
    }

    fn release(&self, handle: MatchHandle) {
        drop(handle);
        self.metrics.record_release();
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
