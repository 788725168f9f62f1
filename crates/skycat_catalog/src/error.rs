//! Error types for the catalog engine

use chrono::NaiveDateTime;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog error type
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Template error in '{template}': {message}")]
    Template { template: String, message: String },

    #[error("Data directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Invalid date in '{input}': {message}")]
    InvalidDate { input: String, message: String },

    #[error("{} files share timestamp {timestamp} and the template cannot disambiguate them: {}", .filenames.len(), .filenames.join(", "))]
    DuplicateTimestamp {
        timestamp: NaiveDateTime,
        filenames: Vec<String>,
    },

    #[error("Catalog cache {} does not match: {message}", .path.display())]
    CacheMismatch { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl CatalogError {
    pub(crate) fn template(template: &str, message: impl Into<String>) -> Self {
        Self::Template {
            template: template.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_date(input: &str, message: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatalogError>;
