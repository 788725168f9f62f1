//! Set difference between two catalog states, keyed by filename.

use crate::types::FileEntry;
use serde::Serialize;
use std::collections::HashSet;

/// Entries gained and lost between two states
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogDiff {
    /// In `current` but not in `prior`, in timestamp order
    pub added: Vec<FileEntry>,
    /// In `prior` but not in `current`, in timestamp order
    pub removed: Vec<FileEntry>,
}

impl CatalogDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Counters for one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStats {
    pub files_total: u64,
    pub files_new: u64,
    pub files_removed: u64,
    pub files_unchanged: u64,
    /// Listed entries that did not become candidates (built-in scanner only)
    pub files_unmatched: u64,
    pub duration_ms: u64,
}

/// Compare two timestamp-ordered states.
///
/// A file replaced by a newer revision at the same timestamp shows up as one
/// removal plus one addition, since its filename changed.
pub fn diff_entries(prior: &[FileEntry], current: &[FileEntry]) -> CatalogDiff {
    let prior_names: HashSet<&str> = prior.iter().map(|e| e.filename.as_str()).collect();
    let current_names: HashSet<&str> = current.iter().map(|e| e.filename.as_str()).collect();

    CatalogDiff {
        added: current
            .iter()
            .filter(|e| !prior_names.contains(e.filename.as_str()))
            .cloned()
            .collect(),
        removed: prior
            .iter()
            .filter(|e| !current_names.contains(e.filename.as_str()))
            .cloned()
            .collect(),
    }
}
