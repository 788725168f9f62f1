//! Helpful error types for CLI commands
//!
//! Catalog errors are turned into a message, some context and a few
//! suggestions before they reach the terminal.

use skycat_catalog::CatalogError;
use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    /// Data directory does not exist
    pub fn directory_not_found(path: &Path) -> Self {
        Self::new(format!("Data directory not found: {}", path.display()))
            .with_context("A catalog lists exactly one existing directory")
            .with_suggestions([
                format!("TRY: Check that the path exists: ls -la {}", path.display()),
                "TRY: Check data_root and directory_format in your config".to_string(),
            ])
    }

    /// Template could not be compiled or did not fit the listing
    pub fn bad_template(template: &str, message: &str) -> Self {
        Self::new(format!("Invalid filename template: {}", template))
            .with_context(message.to_string())
            .with_suggestions([
                "TRY: Use fields like {year:04d} {month:02d} {day:03d} {hour:02d} {min:02d} {sec:02d}",
                "TRY: Validate the template first: skycat check-template '<template>'",
            ])
    }

    /// No entry at the requested time
    pub fn no_entry_at(time: &str) -> Self {
        Self::new(format!("No file at {}", time))
            .with_context("Lookups match the timestamp exactly")
            .with_suggestion("TRY: List the catalog to see covered times: skycat list --path <dir> --template <t>")
    }
}

impl From<CatalogError> for HelpfulError {
    fn from(err: CatalogError) -> Self {
        match &err {
            CatalogError::DirectoryNotFound(path) => Self::directory_not_found(path),
            CatalogError::Template { template, message } => Self::bad_template(template, message),
            CatalogError::DuplicateTimestamp { filenames, .. } => Self::new(err.to_string())
                .with_context(format!("Conflicting files: {}", filenames.join(", ")))
                .with_suggestion("TRY: Add {version:02d}/{revision:03d} fields or '?' wildcards to the template"),
            CatalogError::CacheMismatch { path, .. } => Self::new(err.to_string())
                .with_suggestion(format!("TRY: Remove the stale catalog: rm {}", path.display())),
            _ => Self::new(err.to_string()),
        }
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_directory_not_found_display() {
        let err: HelpfulError = CatalogError::DirectoryNotFound(PathBuf::from("/no/such")).into();
        let text = err.to_string();
        assert!(text.contains("ERROR: Data directory not found: /no/such"));
        assert!(text.contains("TRY:"));
    }

    #[test]
    fn test_template_error_keeps_message() {
        let err: HelpfulError = CatalogError::Template {
            template: "x.dat".to_string(),
            message: "a 'year' field is required".to_string(),
        }
        .into();
        assert_eq!(err.context.as_deref(), Some("a 'year' field is required"));
    }
}
