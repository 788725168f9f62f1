//! Duplicate resolution: collapse candidates to one entry per timestamp.
//!
//! Tie-break order for files sharing a timestamp:
//! 1. greatest `(version, revision)`, absent parts counting as 0
//! 2. lexically greatest filename
//!
//! Step 1 only applies when the template defines version/revision fields.
//! Without them a collision is an error, unless the template uses `?`
//! wildcards, in which case collapsing is the intent and step 2 decides.

use crate::error::{CatalogError, Result};
use crate::template::FilenameTemplate;
use crate::types::FileEntry;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Resolve scan candidates into catalog-ready entries, strictly increasing by
/// timestamp.
pub fn resolve_duplicates(candidates: Vec<FileEntry>, template: &FilenameTemplate) -> Result<Vec<FileEntry>> {
    let versioned = template.has_version_fields();
    let collapse = versioned || template.has_wildcards();

    let mut by_time: BTreeMap<NaiveDateTime, Vec<FileEntry>> = BTreeMap::new();
    for entry in candidates {
        by_time.entry(entry.timestamp).or_default().push(entry);
    }

    let mut resolved = Vec::with_capacity(by_time.len());
    let mut collapsed = 0usize;
    for (timestamp, mut group) in by_time {
        if group.len() == 1 {
            resolved.extend(group.pop());
            continue;
        }

        if !collapse {
            let mut filenames: Vec<String> = group.into_iter().map(|e| e.filename).collect();
            filenames.sort();
            return Err(CatalogError::DuplicateTimestamp { timestamp, filenames });
        }

        collapsed += group.len() - 1;
        let winner = group
            .into_iter()
            .max_by(|a, b| compare_candidates(a, b, versioned));
        resolved.extend(winner);
    }

    if collapsed > 0 {
        debug!(
            template = %template,
            collapsed,
            kept = resolved.len(),
            "Collapsed duplicate timestamps"
        );
    }

    Ok(resolved)
}

fn compare_candidates(a: &FileEntry, b: &FileEntry, versioned: bool) -> Ordering {
    let by_version = if versioned {
        a.version_key().cmp(&b.version_key())
    } else {
        Ordering::Equal
    };
    by_version.then_with(|| a.filename.cmp(&b.filename))
}
