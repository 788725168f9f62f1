//! Catalog Cache - persisted catalog state between processes
//!
//! A cache is a JSON document holding the `(timestamp, filename)` pairs of a
//! catalog in timestamp order, tagged with the template and data path that
//! produced them. Loading a cache built for a different template or path is
//! an error, never a silent rebuild.

use crate::error::{CatalogError, Result};
use crate::template::FilenameTemplate;
use crate::types::FileEntry;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Cache format version - bump when format changes
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCache {
    /// Cache format version
    pub version: u32,
    /// Template string the catalog was built with
    pub template: String,
    /// Data directory the catalog was built from
    pub data_path: PathBuf,
    /// When the cache was written (RFC 3339)
    pub built_at: String,
    pub entries: Vec<CachedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedEntry {
    pub timestamp: NaiveDateTime,
    pub filename: String,
}

impl CatalogCache {
    pub fn from_entries(template: &FilenameTemplate, data_path: &Path, entries: &[FileEntry]) -> Self {
        Self {
            version: CACHE_VERSION,
            template: template.as_str().to_string(),
            data_path: data_path.to_path_buf(),
            built_at: chrono::Utc::now().to_rfc3339(),
            entries: entries
                .iter()
                .map(|e| CachedEntry {
                    timestamp: e.timestamp,
                    filename: e.filename.clone(),
                })
                .collect(),
        }
    }

    /// Write atomically (temp file + rename), creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let encoded = serde_json::to_vec_pretty(self)?;
        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&encoded)?;
        file.sync_all()?;
        fs::rename(&temp_path, path)?;

        debug!(path = %path.display(), entries = self.entries.len(), "Saved catalog cache");
        Ok(())
    }

    /// Read a cache file; `Ok(None)` if it does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cache: CatalogCache = serde_json::from_slice(&bytes)?;
        Ok(Some(cache))
    }

    /// Check that this cache belongs to `template` over `data_path`.
    pub fn validate(&self, path: &Path, template: &FilenameTemplate, data_path: &Path) -> Result<()> {
        let mismatch = |message: String| CatalogError::CacheMismatch {
            path: path.to_path_buf(),
            message,
        };
        if self.version != CACHE_VERSION {
            return Err(mismatch(format!(
                "cache version {} (expected {})",
                self.version, CACHE_VERSION
            )));
        }
        if self.template != template.as_str() {
            return Err(mismatch(format!(
                "built with template '{}', requested '{}'",
                self.template, template
            )));
        }
        if self.data_path != data_path {
            return Err(mismatch(format!(
                "built from '{}', requested '{}'",
                self.data_path.display(),
                data_path.display()
            )));
        }
        Ok(())
    }

    /// Rebuild full entries by re-parsing each cached filename.
    pub fn into_entries(self, path: &Path, template: &FilenameTemplate) -> Result<Vec<FileEntry>> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for cached in self.entries {
            let entry = template.entry_for(&cached.filename)?.ok_or_else(|| CatalogError::CacheMismatch {
                path: path.to_path_buf(),
                message: format!("cached file '{}' does not match the template", cached.filename),
            })?;
            if entry.timestamp != cached.timestamp {
                return Err(CatalogError::CacheMismatch {
                    path: path.to_path_buf(),
                    message: format!(
                        "cached file '{}' recorded at {} but parses to {}",
                        cached.filename, cached.timestamp, entry.timestamp
                    ),
                });
            }
            entries.push(entry);
        }
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(entries)
    }
}

/// Load and validate the cache at `path`, returning its entries.
pub fn load_entries(path: &Path, template: &FilenameTemplate, data_path: &Path) -> Result<Option<Vec<FileEntry>>> {
    match CatalogCache::load(path)? {
        Some(cache) => {
            cache.validate(path, template, data_path)?;
            cache.into_entries(path, template).map(Some)
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = "inst_{year:04d}_{day:03d}.dat";

    fn sample(template: &FilenameTemplate) -> Vec<FileEntry> {
        ["inst_2009_001.dat", "inst_2009_002.dat"]
            .iter()
            .map(|n| template.entry_for(n).unwrap().unwrap())
            .collect()
    }

    #[test]
    fn save_and_load_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("catalog.json");
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let data = temp.path().join("data");

        CatalogCache::from_entries(&t, &data, &sample(&t)).save(&path).unwrap();
        let loaded = load_entries(&path, &t, &data).unwrap().unwrap();
        assert_eq!(loaded, sample(&t));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_cache_is_none() {
        let temp = TempDir::new().unwrap();
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        assert!(load_entries(&temp.path().join("none.json"), &t, temp.path())
            .unwrap()
            .is_none());
    }

    #[test]
    fn template_or_path_mismatch_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let data = temp.path().join("data");
        CatalogCache::from_entries(&t, &data, &sample(&t)).save(&path).unwrap();

        let other = FilenameTemplate::compile("other_{year:04d}_{day:03d}.dat").unwrap();
        assert!(matches!(
            load_entries(&path, &other, &data),
            Err(CatalogError::CacheMismatch { .. })
        ));
        assert!(matches!(
            load_entries(&path, &t, &temp.path().join("elsewhere")),
            Err(CatalogError::CacheMismatch { .. })
        ));
    }

    #[test]
    fn tampered_timestamp_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        let mut cache = CatalogCache::from_entries(&t, temp.path(), &sample(&t));
        cache.entries[0].timestamp = cache.entries[1].timestamp;
        cache.save(&path).unwrap();
        assert!(matches!(
            load_entries(&path, &t, temp.path()),
            Err(CatalogError::CacheMismatch { .. })
        ));
    }

    #[test]
    fn corrupt_cache_is_a_json_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.json");
        fs::write(&path, b"{ not json").unwrap();
        let t = FilenameTemplate::compile(TEMPLATE).unwrap();
        assert!(matches!(load_entries(&path, &t, temp.path()), Err(CatalogError::Json(_))));
    }
}
