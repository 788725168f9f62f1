use crate::error::{CatalogError, Result};
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
pub fn expand_path(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(path));
        }
    }
    path.to_path_buf()
}

/// Fail with `DirectoryNotFound` unless `path` is an existing directory.
pub fn validate_data_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(CatalogError::DirectoryNotFound(path.to_path_buf()));
    }
    Ok(())
}
