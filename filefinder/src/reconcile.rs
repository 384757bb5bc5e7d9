//! Merges name matches and content matches into the four result views.
//!
//! `combined_result` is a union keyed by `file_path` in first-seen order:
//! name matches seed it, content matches either update an existing entry in
//! place or are appended. `intersection_result` is taken from the content
//! side, filtered against the name keys as they were before any content
//! match was inserted, and keeps the content-side records untouched.
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::results::{Match, ReconciledResults};

/// Builds the combined, intersection and per-mode views
pub fn reconcile(name_matches: Vec<Match>, content_matches: Vec<Match>) -> ReconciledResults {
    let name_keys: HashSet<&str> = name_matches
        .iter()
        .map(|m| m.file_path.as_str())
        .collect();

    let intersection_result: Vec<Match> = content_matches
        .iter()
        .filter(|m| name_keys.contains(m.file_path.as_str()))
        .cloned()
        .collect();

    let mut positions: HashMap<&str, usize> = HashMap::with_capacity(name_matches.len());
    let mut combined_result: Vec<Match> = Vec::with_capacity(name_matches.len());

    for record in name_matches.iter().chain(content_matches.iter()) {
        match positions.get(record.file_path.as_str()) {
            Some(&index) => combined_result[index].merge_from(record),
            None => {
                positions.insert(record.file_path.as_str(), combined_result.len());
                combined_result.push(record.clone());
            }
        }
    }

    debug!(
        "Reconciled {} name and {} content matches into {} combined, {} shared",
        name_matches.len(),
        content_matches.len(),
        combined_result.len(),
        intersection_result.len()
    );

    ReconciledResults {
        combined_result,
        intersection_result,
        results_only_by_name: name_matches,
        results_only_by_content: content_matches,
        dropped_matches: 0,
    }
}
