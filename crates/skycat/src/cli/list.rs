//! `skycat list` - build a catalog and print every entry

use crate::cli::error::HelpfulError;
use crate::cli::output::{entry_rows, print_json, print_table, ENTRY_HEADERS};
use anyhow::Result;
use serde::Serialize;
use skycat_catalog::{CatalogBuilder, FileEntry, RefreshStats};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ListArgs {
    pub path: PathBuf,
    pub template: String,
    pub tag: String,
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOutput<'a> {
    data_path: &'a Path,
    template: &'a str,
    count: usize,
    stats: &'a RefreshStats,
    entries: &'a [FileEntry],
}

pub fn run(args: ListArgs) -> Result<()> {
    let catalog = CatalogBuilder::new(&args.path, &args.template)
        .tag(args.tag)
        .build()
        .map_err(HelpfulError::from)?;

    if args.json {
        return print_json(&ListOutput {
            data_path: catalog.data_path(),
            template: catalog.template().as_str(),
            count: catalog.len(),
            stats: catalog.last_refresh(),
            entries: catalog.entries(),
        });
    }

    if catalog.is_empty() {
        println!("No files matching '{}' in {}", catalog.template(), catalog.data_path().display());
        return Ok(());
    }

    print_table(&ENTRY_HEADERS, entry_rows(catalog.entries()));
    if let (Some(first), Some(last)) = (catalog.first(), catalog.last()) {
        println!(
            "{} files from {} to {}",
            catalog.len(),
            first.timestamp.format("%Y-%m-%d %H:%M:%S"),
            last.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}
