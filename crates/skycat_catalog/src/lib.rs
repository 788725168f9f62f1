//! Skycat Catalog - timestamp-indexed catalogs of instrument data files
//!
//! An instrument writes one file per time interval into a data directory,
//! naming each file with a template such as `inst_{year:04d}_{day:03d}.dat`.
//! A [`Catalog`] lists that directory, recovers the timestamp encoded in
//! every matching filename, keeps exactly one file per timestamp, and on
//! each refresh reports which files appeared since the previous state.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌────────────┐    ┌────────────┐    ┌────────────┐
//! │ FileLister │    │  Template  │    │ Duplicates │    │    Diff    │
//! │ (dir scan  │───▶│ (filename →│───▶│ (one file  │───▶│ (new since │
//! │  or custom)│    │  timestamp)│    │ per time)  │    │   prior)   │
//! └────────────┘    └────────────┘    └────────────┘    └────────────┘
//!                                                             │
//!                                          optional JSON cache ◀┘
//! ```
//!
//! # Core Concepts
//!
//! - **Template**: literal text with `{field:0Nd}` placeholders and `?` wildcards
//! - **Entry**: a `(timestamp, filename)` pair
//! - **Pending new**: entries added by the latest refresh, drained by `get_new()`
//! - **Lister**: where filenames come from; a flat directory listing by default

pub mod cache;
pub mod catalog;
pub mod config;
pub mod diff;
pub mod duplicates;
pub mod error;
pub mod scan_path;
pub mod scanner;
pub mod template;
pub mod timestamp;
pub mod types;

// Re-exports for convenience
pub use catalog::{build_catalog, Catalog, CatalogBuilder};
pub use config::{CatalogConfig, DirectoryLayout, LayoutKeys};
pub use diff::{CatalogDiff, RefreshStats};
pub use error::{CatalogError, Result};
pub use scanner::{DirectoryScanner, FileLister, ScanConfig, ScanStats};
pub use template::FilenameTemplate;
pub use timestamp::{date_range, year_doy};
pub use types::{FieldKind, FieldValues, FileEntry};
