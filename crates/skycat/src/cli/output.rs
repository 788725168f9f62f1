//! Output formatting utilities for CLI commands

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use serde::Serialize;
use skycat_catalog::{year_doy, FileEntry};

/// Print a table with cyan headers
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)).collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }

    println!("{table}");
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One table row per entry: timestamp, year-doy, version, filename
pub fn entry_rows(entries: &[FileEntry]) -> Vec<Vec<String>> {
    entries
        .iter()
        .map(|e| {
            let (year, doy) = year_doy(e.timestamp.date());
            vec![
                e.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                format!("{}-{:03}", year, doy),
                format_version(e),
                e.filename.clone(),
            ]
        })
        .collect()
}

pub const ENTRY_HEADERS: [&str; 4] = ["TIMESTAMP", "YEAR-DOY", "VERSION", "FILENAME"];

fn format_version(entry: &FileEntry) -> String {
    match (entry.version, entry.revision) {
        (None, None) => "-".to_string(),
        (v, r) => format!("{}.{}", v.unwrap_or(0), r.unwrap_or(0)),
    }
}
