//! Configuration for a catalog
//!
//! A config names an instrument (platform, name, tag, sat_id), the data
//! root, how the instrument's directory hangs off that root, and the
//! filename template. Everything is explicit; there is no process-wide
//! "current data directory".

use crate::error::{CatalogError, Result};
use crate::scan_path::expand_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default layout of an instrument directory under the data root
pub const DEFAULT_DIRECTORY_FORMAT: &str = "{platform}/{name}/{tag}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Root under which instrument directories live
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// Subdirectory layout; keys: {platform} {name} {tag} {sat_id}
    #[serde(default = "default_directory_format")]
    pub directory_format: String,

    #[serde(default)]
    pub platform: String,

    #[serde(default)]
    pub name: String,

    /// Listing tag, also passed to custom listers
    #[serde(default)]
    pub tag: String,

    /// Secondary instrument qualifier
    #[serde(default)]
    pub sat_id: String,

    /// Filename template, e.g. "inst_{year:04d}_{day:03d}.dat"
    #[serde(default)]
    pub file_format: String,

    /// Keep the catalog on disk between runs
    #[serde(default)]
    pub persist: bool,

    /// Where persisted catalogs go (default: $SKYCAT_HOME/catalogs)
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

fn default_data_root() -> PathBuf {
    skycat_home().join("data")
}

fn default_directory_format() -> String {
    DEFAULT_DIRECTORY_FORMAT.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            directory_format: default_directory_format(),
            platform: String::new(),
            name: String::new(),
            tag: String::new(),
            sat_id: String::new(),
            file_format: String::new(),
            persist: false,
            cache_dir: None,
        }
    }
}

impl CatalogConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CatalogConfig =
            toml::from_str(&content).map_err(|e| CatalogError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CatalogError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn layout_keys(&self) -> LayoutKeys<'_> {
        LayoutKeys {
            platform: &self.platform,
            name: &self.name,
            tag: &self.tag,
            sat_id: &self.sat_id,
        }
    }

    /// Data root joined with the resolved instrument subdirectory
    pub fn resolve_data_path(&self) -> Result<PathBuf> {
        let subdir = DirectoryLayout::new(&self.directory_format).resolve(&self.layout_keys())?;
        Ok(expand_path(&self.data_root).join(subdir))
    }

    /// Location of the persisted catalog for this instrument
    pub fn cache_path(&self) -> PathBuf {
        let dir = self
            .cache_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| skycat_home().join("catalogs"));
        dir.join(format!("{}.json", self.cache_key()))
    }

    fn cache_key(&self) -> String {
        let parts: Vec<String> = [&self.platform, &self.name, &self.tag, &self.sat_id]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| sanitize(s))
            .collect();
        if parts.is_empty() {
            "catalog".to_string()
        } else {
            parts.join("_")
        }
    }
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Get the skycat home directory: $SKYCAT_HOME or ~/.skycat
pub fn skycat_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("SKYCAT_HOME") {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skycat")
}

/// Identifiers substituted into a directory layout
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutKeys<'a> {
    pub platform: &'a str,
    pub name: &'a str,
    pub tag: &'a str,
    pub sat_id: &'a str,
}

/// A subdirectory naming scheme such as `{platform}/{name}/{tag}`
#[derive(Debug, Clone)]
pub struct DirectoryLayout {
    format: String,
}

impl DirectoryLayout {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }

    /// Substitute identifiers into the layout. Empty path components are
    /// dropped, so an unset `{sat_id}` does not leave a `//`. `.` and `..`
    /// components are rejected; the result always stays under the data root.
    pub fn resolve(&self, keys: &LayoutKeys<'_>) -> Result<PathBuf> {
        let mut rendered = String::with_capacity(self.format.len());
        let mut rest = self.format.as_str();
        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| {
                CatalogError::Config(format!("unclosed '{{' in directory format '{}'", self.format))
            })?;
            let value = match &after[..close] {
                "platform" => keys.platform,
                "name" => keys.name,
                "tag" => keys.tag,
                "sat_id" => keys.sat_id,
                other => {
                    return Err(CatalogError::Config(format!(
                        "unknown key '{{{}}}' in directory format '{}'",
                        other, self.format
                    )));
                }
            };
            rendered.push_str(value);
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(CatalogError::Config(format!(
                "unmatched '}}' in directory format '{}'",
                self.format
            )));
        }
        rendered.push_str(rest);

        let components: Vec<&str> = rendered.split('/').filter(|c| !c.is_empty()).collect();
        if let Some(bad) = components.iter().find(|c| **c == "." || **c == "..") {
            return Err(CatalogError::Config(format!(
                "directory format '{}' resolves to '{}', which has a '{}' component",
                self.format, rendered, bad
            )));
        }
        Ok(components.into_iter().collect())
    }
}
