//! `skycat new` - report files that appeared since the last run
//!
//! The catalog is always persisted here; the cache file is what "since the
//! last run" is measured against.

use crate::cli::error::HelpfulError;
use crate::cli::output::{entry_rows, print_json, print_table, ENTRY_HEADERS};
use anyhow::{Context, Result};
use serde::Serialize;
use skycat_catalog::{Catalog, CatalogConfig, FileEntry};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug)]
pub struct NewArgs {
    pub config: PathBuf,
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewOutput<'a> {
    data_path: &'a Path,
    cache_path: Option<&'a Path>,
    total: usize,
    new: &'a [FileEntry],
}

pub fn run(args: NewArgs) -> Result<()> {
    let mut config = CatalogConfig::load(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;
    config.persist = true;

    let mut catalog = Catalog::from_config(&config).map_err(HelpfulError::from)?;
    let new = catalog.get_new();
    info!(count = new.len(), path = %catalog.data_path().display(), "New files since last run");

    if args.json {
        return print_json(&NewOutput {
            data_path: catalog.data_path(),
            cache_path: catalog.cache_path(),
            total: catalog.len(),
            new: &new,
        });
    }

    if new.is_empty() {
        println!("No new files ({} cataloged)", catalog.len());
        return Ok(());
    }
    print_table(&ENTRY_HEADERS, entry_rows(&new));
    println!("{} new of {} cataloged", new.len(), catalog.len());
    Ok(())
}
