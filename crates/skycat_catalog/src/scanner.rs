//! Directory scanner and the `FileLister` seam
//!
//! The catalog never reads the filesystem directly; it asks a [`FileLister`]
//! for filenames. [`DirectoryScanner`] is the built-in lister: a flat,
//! non-recursive listing of one data directory filtered through the
//! template. Instruments with unusual layouts supply their own lister.

use crate::error::{CatalogError, Result};
use crate::scan_path::validate_data_dir;
use crate::template::FilenameTemplate;
use crate::types::FileEntry;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Source of candidate filenames for a catalog.
///
/// Implementations must only return names that match `template`; a name that
/// does not parse is reported as a template error by the catalog.
pub trait FileLister {
    fn list(&self, data_path: &Path, tag: &str, template: &FilenameTemplate) -> Result<Vec<String>>;
}

impl<F> FileLister for F
where
    F: Fn(&Path, &str, &FilenameTemplate) -> Result<Vec<String>>,
{
    fn list(&self, data_path: &Path, tag: &str, template: &FilenameTemplate) -> Result<Vec<String>> {
        self(data_path, tag, template)
    }
}

/// Configuration for directory listing
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether symlinks to files count as files
    pub follow_symlinks: bool,
    /// Whether dot-files are considered
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            include_hidden: true,
        }
    }
}

/// Counters for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    /// Regular files seen in the directory
    pub files_listed: u64,
    /// Files whose names matched the template
    pub files_matched: u64,
    /// Entries skipped: names that did not match, were not UTF-8, or could
    /// not be read (e.g. dangling symlinks)
    pub files_unmatched: u64,
    pub duration_ms: u64,
}

/// Result of a scan: raw candidates, before duplicate resolution
#[derive(Debug, Default)]
pub struct ScanResult {
    pub candidates: Vec<FileEntry>,
    pub stats: ScanStats,
}

/// Flat directory scanner
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    config: ScanConfig,
}

impl DirectoryScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    /// List `dir` and parse every matching filename into a candidate entry.
    ///
    /// Names that match the template but encode an impossible date fail the
    /// scan with `InvalidDate`.
    pub fn scan(&self, dir: &Path, template: &FilenameTemplate) -> Result<ScanResult> {
        let start = Instant::now();
        let (names, skipped) = self.read_names(dir)?;

        let mut stats = ScanStats {
            files_listed: names.len() as u64 + skipped,
            files_unmatched: skipped,
            ..ScanStats::default()
        };
        let mut candidates = Vec::with_capacity(names.len());
        for name in names {
            match template.entry_for(&name)? {
                Some(entry) => candidates.push(entry),
                None => {
                    stats.files_unmatched += 1;
                    debug!(file = %name, template = %template, "Skipping file that does not match template");
                }
            }
        }
        stats.files_matched = candidates.len() as u64;
        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            path = %dir.display(),
            listed = stats.files_listed,
            matched = stats.files_matched,
            unmatched = stats.files_unmatched,
            duration_ms = stats.duration_ms,
            "Directory scan complete"
        );

        Ok(ScanResult { candidates, stats })
    }

    /// Regular-file names directly inside `dir`, plus a count of entries
    /// that were skipped: non-UTF-8 names and entries that could not be
    /// stat'ed. Only a failure on `dir` itself is an error.
    fn read_names(&self, dir: &Path) -> Result<(Vec<String>, u64)> {
        validate_data_dir(dir)?;

        let mut names = Vec::new();
        let mut skipped = 0u64;
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() > 0 => {
                    skipped += 1;
                    warn!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable directory entry"
                    );
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => {
                    if !self.config.include_hidden && name.starts_with('.') {
                        continue;
                    }
                    names.push(name.to_string());
                }
                None => skipped += 1,
            }
        }
        names.sort();
        Ok((names, skipped))
    }
}

impl FileLister for DirectoryScanner {
    fn list(&self, data_path: &Path, _tag: &str, template: &FilenameTemplate) -> Result<Vec<String>> {
        let (names, _) = self.read_names(data_path)?;
        Ok(names.into_iter().filter(|n| template.matches(n)).collect())
    }
}

/// Parse lister output into entries; every name must match.
pub(crate) fn entries_from_listing(names: Vec<String>, template: &FilenameTemplate) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        match template.entry_for(&name)? {
            Some(entry) => entries.push(entry),
            None => {
                return Err(CatalogError::template(
                    template.as_str(),
                    format!("listed file '{}' does not match the template", name),
                ));
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    const TEMPLATE: &str = "inst_{year:04d}_{day:03d}.dat";

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp = TempDir::new().unwrap();
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let result = DirectoryScanner::new().scan(temp.path(), &t).unwrap();
        assert!(result.candidates.is_empty());
        assert_eq!(result.stats.files_listed, 0);
    }

    #[test]
    fn test_scan_counts_unmatched_files() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "inst_2009_001.dat");
        touch(temp.path(), "inst_2009_002.dat");
        touch(temp.path(), "README.txt");
        touch(temp.path(), "inst_2009_003.dat.partial");

        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let result = DirectoryScanner::new().scan(temp.path(), &t).unwrap();
        assert_eq!(result.stats.files_listed, 4);
        assert_eq!(result.stats.files_matched, 2);
        assert_eq!(result.stats.files_unmatched, 2);
        assert_eq!(result.candidates.len(), 2);
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "inst_2009_001.dat");
        std::fs::create_dir(temp.path().join("inst_2009_002.dat")).unwrap();
        let nested = temp.path().join("sub");
        std::fs::create_dir(&nested).unwrap();
        touch(&nested, "inst_2009_003.dat");

        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let result = DirectoryScanner::new().scan(temp.path(), &t).unwrap();
        let names: Vec<_> = result.candidates.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["inst_2009_001.dat"]);
    }

    #[test]
    fn test_scan_nonexistent_directory() {
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let result = DirectoryScanner::new().scan(Path::new("/nonexistent/skycat/path"), &t);
        assert!(matches!(result, Err(CatalogError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_scan_invalid_date_fails() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "inst_2009_366.dat");
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let result = DirectoryScanner::new().scan(temp.path(), &t);
        assert!(matches!(result, Err(CatalogError::InvalidDate { .. })));
    }

    #[test]
    fn test_hidden_files_can_be_excluded() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".2009_001.dat");
        touch(temp.path(), "x2009_002.dat");
        let t = FilenameTemplate::compile("?{year:04d}_{day:03d}.dat").unwrap();

        let all = DirectoryScanner::new().list(temp.path(), "", &t).unwrap();
        assert_eq!(all.len(), 2);

        let scanner = DirectoryScanner::with_config(ScanConfig {
            include_hidden: false,
            ..ScanConfig::default()
        });
        let listed = scanner.list(temp.path(), "", &t).unwrap();
        assert_eq!(listed, vec!["x2009_002.dat"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "inst_2009_001.dat");
        std::os::unix::fs::symlink("/nonexistent/skycat/target", temp.path().join("stale_link")).unwrap();
        std::os::unix::fs::symlink("/nonexistent/skycat/target", temp.path().join("inst_2009_002.dat")).unwrap();

        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let result = DirectoryScanner::new().scan(temp.path(), &t).unwrap();
        let names: Vec<_> = result.candidates.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["inst_2009_001.dat"]);
        assert_eq!(result.stats.files_unmatched, 2);

        let listed = DirectoryScanner::new().list(temp.path(), "", &t).unwrap();
        assert_eq!(listed, vec!["inst_2009_001.dat"]);
    }

    #[test]
    fn test_lister_filters_to_template_matches() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "inst_2009_002.dat");
        touch(temp.path(), "inst_2009_001.dat");
        touch(temp.path(), "notes.md");
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let listed = DirectoryScanner::new().list(temp.path(), "", &t).unwrap();
        assert_eq!(listed, vec!["inst_2009_001.dat", "inst_2009_002.dat"]);
    }

    #[test]
    fn test_closure_lister() {
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let lister = |_: &Path, tag: &str, _: &FilenameTemplate| -> Result<Vec<String>> {
            assert_eq!(tag, "fast");
            Ok(vec!["inst_2010_100.dat".to_string()])
        };
        let names = lister.list(Path::new("/unused"), "fast", &t).unwrap();
        let entries = entries_from_listing(names, &t).unwrap();
        assert_eq!(entries[0].filename, "inst_2010_100.dat");
    }

    #[test]
    fn test_listing_that_does_not_match_is_template_error() {
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let result = entries_from_listing(vec!["other_2010_100.dat".to_string()], &t);
        assert!(matches!(result, Err(CatalogError::Template { .. })));
    }
}
