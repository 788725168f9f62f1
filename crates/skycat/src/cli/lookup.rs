//! `skycat lookup` - find the file recorded at one timestamp

use crate::cli::error::HelpfulError;
use crate::cli::output::{entry_rows, print_json, print_table, ENTRY_HEADERS};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use skycat_catalog::CatalogBuilder;
use std::path::PathBuf;

#[derive(Debug)]
pub struct LookupArgs {
    pub path: PathBuf,
    pub template: String,
    pub tag: String,
    pub time: String,
    pub json: bool,
}

pub fn run(args: LookupArgs) -> Result<()> {
    let time = parse_time(&args.time)?;
    let catalog = CatalogBuilder::new(&args.path, &args.template)
        .tag(args.tag)
        .build()
        .map_err(HelpfulError::from)?;

    let entry = catalog
        .lookup(time)
        .ok_or_else(|| HelpfulError::no_entry_at(&args.time))?;

    if args.json {
        return print_json(entry);
    }
    print_table(&ENTRY_HEADERS, entry_rows(std::slice::from_ref(entry)));
    Ok(())
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and
/// day-of-year `YYYY-DDD`.
pub fn parse_time(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%j"))
        .with_context(|| {
            format!(
                "Invalid time '{}' (expected YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS or YYYY-DDD)",
                input
            )
        })?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("Invalid time '{}'", input))
}
