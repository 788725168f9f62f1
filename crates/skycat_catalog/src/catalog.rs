//! The catalog: one file per timestamp, refreshed in place.
//!
//! # Lifecycle
//!
//! ```text
//!  build ──▶ refresh against prior state (cache or empty) ──▶ Populated
//!                                                               │  ▲
//!                                                     refresh() │  │ state replaced,
//!                                                               ▼  │ pending-new recomputed
//!                                                             Populated
//! ```
//!
//! Every refresh lists, parses, resolves duplicates and diffs against the
//! state it replaces. Filenames that appeared become the pending-new set,
//! which `get_new()` drains exactly once. A refresh that fails leaves the
//! previous state untouched.

use crate::cache::{self, CatalogCache};
use crate::config::CatalogConfig;
use crate::diff::{diff_entries, RefreshStats};
use crate::duplicates::resolve_duplicates;
use crate::error::Result;
use crate::scan_path::validate_data_dir;
use crate::scanner::{entries_from_listing, DirectoryScanner, FileLister, ScanConfig};
use crate::template::FilenameTemplate;
use crate::types::FileEntry;
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Build a catalog of `data_path` using the default directory scanner.
pub fn build_catalog(data_path: impl AsRef<Path>, format_template: &str) -> Result<Catalog> {
    CatalogBuilder::new(data_path, format_template).build()
}

/// Builder for catalogs that need a tag, a custom lister or a cache
pub struct CatalogBuilder {
    data_path: PathBuf,
    template: String,
    tag: String,
    lister: Option<Box<dyn FileLister + Send>>,
    scan_config: ScanConfig,
    cache_path: Option<PathBuf>,
}

impl CatalogBuilder {
    pub fn new(data_path: impl AsRef<Path>, format_template: &str) -> Self {
        Self {
            data_path: data_path.as_ref().to_path_buf(),
            template: format_template.to_string(),
            tag: String::new(),
            lister: None,
            scan_config: ScanConfig::default(),
            cache_path: None,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Replace the default directory scanner
    pub fn lister(mut self, lister: impl FileLister + Send + 'static) -> Self {
        self.lister = Some(Box::new(lister));
        self
    }

    /// Tune the default directory scanner; ignored with a custom lister
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.scan_config = config;
        self
    }

    /// Persist the catalog at `path`, seeding it from any existing cache
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<Catalog> {
        let template = FilenameTemplate::compile(&self.template)?;

        let source = match self.lister {
            Some(lister) => Source::Lister(lister),
            None => {
                validate_data_dir(&self.data_path)?;
                Source::Scanner(DirectoryScanner::with_config(self.scan_config))
            }
        };

        let prior = match &self.cache_path {
            Some(path) => cache::load_entries(path, &template, &self.data_path)?.unwrap_or_default(),
            None => Vec::new(),
        };

        let mut catalog = Catalog {
            data_path: self.data_path,
            template,
            tag: self.tag,
            source,
            entries: prior,
            pending_new: Vec::new(),
            cache_path: self.cache_path,
            last_refresh: RefreshStats::default(),
        };
        catalog.refresh()?;
        Ok(catalog)
    }
}

/// Where a catalog's filenames come from
enum Source {
    /// Built-in scan; reports how many entries it skipped
    Scanner(DirectoryScanner),
    Lister(Box<dyn FileLister + Send>),
}

/// Ordered, timestamp-unique index of one instrument's files.
///
/// Not internally synchronised: `refresh` takes `&mut self`. Distinct
/// catalogs share nothing and may be refreshed on separate threads.
pub struct Catalog {
    data_path: PathBuf,
    template: FilenameTemplate,
    tag: String,
    source: Source,
    /// Strictly increasing by timestamp
    entries: Vec<FileEntry>,
    /// Added by the latest refresh and not yet drained
    pending_new: Vec<FileEntry>,
    cache_path: Option<PathBuf>,
    last_refresh: RefreshStats,
}

impl Catalog {
    /// Build from a config, resolving the directory layout once.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let data_path = config.resolve_data_path()?;
        let mut builder = CatalogBuilder::new(data_path, &config.file_format).tag(config.tag.clone());
        if config.persist {
            builder = builder.cache_path(config.cache_path());
        }
        builder.build()
    }

    /// Re-list the data directory and replace the catalog's state.
    pub fn refresh(&mut self) -> Result<()> {
        let start = Instant::now();

        let (candidates, files_unmatched) = match &self.source {
            Source::Scanner(scanner) => {
                let scan = scanner.scan(&self.data_path, &self.template)?;
                (scan.candidates, scan.stats.files_unmatched)
            }
            Source::Lister(lister) => {
                let names = lister.list(&self.data_path, &self.tag, &self.template)?;
                (entries_from_listing(names, &self.template)?, 0)
            }
        };
        let resolved = resolve_duplicates(candidates, &self.template)?;
        let diff = diff_entries(&self.entries, &resolved);

        if let Some(path) = &self.cache_path {
            CatalogCache::from_entries(&self.template, &self.data_path, &resolved).save(path)?;
        }

        let total = resolved.len() as u64;
        let stats = RefreshStats {
            files_total: total,
            files_new: diff.added.len() as u64,
            files_removed: diff.removed.len() as u64,
            files_unchanged: total - diff.added.len() as u64,
            files_unmatched,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if diff.is_empty() {
            debug!(path = %self.data_path.display(), "Catalog unchanged");
        }
        self.entries = resolved;
        self.pending_new = diff.added;

        info!(
            path = %self.data_path.display(),
            template = %self.template,
            total = stats.files_total,
            new = stats.files_new,
            removed = stats.files_removed,
            unmatched = stats.files_unmatched,
            duration_ms = stats.duration_ms,
            "Catalog refreshed"
        );
        self.last_refresh = stats;

        Ok(())
    }

    /// Drain the files added by the most recent refresh (or by construction).
    pub fn get_new(&mut self) -> Vec<FileEntry> {
        std::mem::take(&mut self.pending_new)
    }

    /// Refresh, then drain.
    pub fn refresh_new(&mut self) -> Result<Vec<FileEntry>> {
        self.refresh()?;
        Ok(self.get_new())
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// The entry at exactly `timestamp`; `None` means not found.
    pub fn lookup(&self, timestamp: NaiveDateTime) -> Option<&FileEntry> {
        self.entries
            .binary_search_by_key(&timestamp, |e| e.timestamp)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Entries with `start <= timestamp <= stop`
    pub fn range(&self, start: NaiveDateTime, stop: NaiveDateTime) -> &[FileEntry] {
        if stop < start {
            return &[];
        }
        let lo = self.entries.partition_point(|e| e.timestamp < start);
        let hi = self.entries.partition_point(|e| e.timestamp <= stop);
        &self.entries[lo..hi]
    }

    /// Index of `filename` in timestamp order
    pub fn position(&self, filename: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.filename == filename)
    }

    pub fn first(&self) -> Option<&FileEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&FileEntry> {
        self.entries.last()
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.filename.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn template(&self) -> &FilenameTemplate {
        &self.template
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    pub fn last_refresh(&self) -> &RefreshStats {
        &self.last_refresh
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("data_path", &self.data_path)
            .field("template", &self.template.as_str())
            .field("tag", &self.tag)
            .field("entries", &self.entries.len())
            .field("pending_new", &self.pending_new.len())
            .field("cache_path", &self.cache_path)
            .finish()
    }
}
