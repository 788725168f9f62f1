//! Core types for the catalog engine
//!
//! A catalog is a list of [`FileEntry`] values, one per timestamp. Entries are
//! produced by running filenames through a compiled template, which yields
//! [`FieldValues`], which the timestamp resolver turns into a calendar instant.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Template fields
// ============================================================================

/// A named numeric field recognised inside a filename template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Year,
    Month,
    Day,
    Hour,
    Min,
    Sec,
    Version,
    Revision,
}

impl FieldKind {
    pub const ALL: [FieldKind; 8] = [
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Min,
        Self::Sec,
        Self::Version,
        Self::Revision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
            Self::Min => "min",
            Self::Sec => "sec",
            Self::Version => "version",
            Self::Revision => "revision",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "year" => Some(Self::Year),
            "month" => Some(Self::Month),
            "day" => Some(Self::Day),
            "hour" => Some(Self::Hour),
            "min" => Some(Self::Min),
            "sec" => Some(Self::Sec),
            "version" => Some(Self::Version),
            "revision" => Some(Self::Revision),
            _ => None,
        }
    }

    /// True for fields that only distinguish revisions of the same timestamp
    pub fn is_version(&self) -> bool {
        matches!(self, Self::Version | Self::Revision)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw integer values extracted from (or formatted into) a filename.
///
/// Fields the template does not define stay `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldValues {
    pub year: Option<u32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub min: Option<u32>,
    pub sec: Option<u32>,
    pub version: Option<u32>,
    pub revision: Option<u32>,
}

impl FieldValues {
    pub fn get(&self, kind: FieldKind) -> Option<u32> {
        match kind {
            FieldKind::Year => self.year,
            FieldKind::Month => self.month,
            FieldKind::Day => self.day,
            FieldKind::Hour => self.hour,
            FieldKind::Min => self.min,
            FieldKind::Sec => self.sec,
            FieldKind::Version => self.version,
            FieldKind::Revision => self.revision,
        }
    }

    pub fn set(&mut self, kind: FieldKind, value: u32) {
        let slot = match kind {
            FieldKind::Year => &mut self.year,
            FieldKind::Month => &mut self.month,
            FieldKind::Day => &mut self.day,
            FieldKind::Hour => &mut self.hour,
            FieldKind::Min => &mut self.min,
            FieldKind::Sec => &mut self.sec,
            FieldKind::Version => &mut self.version,
            FieldKind::Revision => &mut self.revision,
        };
        *slot = Some(value);
    }

    /// Builder-style setter, handy for fixtures
    pub fn with(mut self, kind: FieldKind, value: u32) -> Self {
        self.set(kind, value);
        self
    }
}

impl fmt::Display for FieldValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in FieldKind::ALL {
            if let Some(value) = self.get(kind) {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{}={}", kind, value)?;
                first = false;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Catalog entries
// ============================================================================

/// One cataloged file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Timestamp derived from the filename, second resolution
    pub timestamp: NaiveDateTime,
    /// Bare filename relative to the catalog's data directory
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u32>,
}

impl FileEntry {
    pub fn new(timestamp: NaiveDateTime, filename: impl Into<String>) -> Self {
        Self {
            timestamp,
            filename: filename.into(),
            version: None,
            revision: None,
        }
    }

    /// `(version, revision)` with absent parts treated as 0
    pub fn version_key(&self) -> (u32, u32) {
        (self.version.unwrap_or(0), self.revision.unwrap_or(0))
    }
}
