use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use tracing::trace;

use crate::errors::{SearchError, SearchResult};

static PATTERN_CACHE: Lazy<DashMap<String, MatchStrategy>> = Lazy::new(DashMap::new);

/// Strategy for case-insensitive substring matching
#[derive(Debug, Clone)]
pub enum MatchStrategy {
    /// ASCII-only needle, compared byte-wise ignoring ASCII case
    Ascii(String),
    /// Anything else, escaped and compiled with Unicode case folding
    Regex(Arc<Regex>),
}

/// Case-insensitive substring matcher shared by name and content search
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    strategy: MatchStrategy,
}

impl PatternMatcher {
    /// Creates a matcher for `pattern`, reusing a cached strategy when one exists
    pub fn new(pattern: &str) -> SearchResult<Self> {
        if let Some(entry) = PATTERN_CACHE.get(pattern) {
            trace!("Pattern cache hit: {}", pattern);
            return Ok(Self {
                strategy: entry.clone(),
            });
        }

        let strategy = if pattern.is_ascii() {
            MatchStrategy::Ascii(pattern.to_string())
        } else {
            let regex = RegexBuilder::new(&regex::escape(pattern))
                .case_insensitive(true)
                .build()
                .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
            MatchStrategy::Regex(Arc::new(regex))
        };

        PATTERN_CACHE.insert(pattern.to_string(), strategy.clone());
        Ok(Self { strategy })
    }

    /// Returns true if `text` contains the pattern, ignoring case
    pub fn is_match(&self, text: &str) -> bool {
        match &self.strategy {
            MatchStrategy::Ascii(needle) => contains_ignore_ascii_case(text, needle),
            MatchStrategy::Regex(regex) => regex.is_match(text),
        }
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    if needle.is_empty() {
        return true;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
