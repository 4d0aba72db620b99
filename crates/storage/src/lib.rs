// In crates/storage/src/lib.rs

use core_types::{RawTable, Ticker};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

pub mod error;

// Re-export the most important types for easy access.
pub use error::{Error, Result};

const TABLE_EXTENSION: &str = "csv";

/// The CSV file that holds one ticker's price table inside `folder`.
pub fn table_path(folder: &Path, ticker: &Ticker) -> PathBuf {
    folder.join(format!("{}.{}", ticker.as_str(), TABLE_EXTENSION))
}

/// Creates `folder` (and parents) if it does not exist yet.
pub fn ensure_folder(folder: &Path) -> Result<()> {
    fs::create_dir_all(folder)?;
    Ok(())
}

/// Reads a headered CSV file into a `RawTable`.
///
/// Rows may have fewer or more cells than the header; cells are trimmed.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut table = RawTable::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(str::to_string).collect());
    }

    tracing::debug!(path = %path.display(), rows = table.len(), "Read price table.");
    Ok(table)
}

/// Writes a `RawTable` as a headered CSV file, replacing any existing file.
pub fn write_table(path: &Path, table: &RawTable) -> Result<()> {
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        // Pad short rows so every record matches the header width.
        let mut cells: Vec<&str> = row.iter().map(String::as_str).collect();
        cells.resize(table.columns.len().max(cells.len()), "");
        writer.write_record(&cells)?;
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = table.len(), "Wrote price table.");
    Ok(())
}

/// Lists the tickers that have a table in `folder`, sorted by name.
///
/// Only files `table_path` would name are listed, so the extension match is
/// case-sensitive. Files whose stem is not a valid ticker are skipped.
pub fn list_tickers(folder: &Path) -> Result<Vec<Ticker>> {
    let mut tickers = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_table = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == TABLE_EXTENSION);
        if !is_table {
            continue;
        }
        match path.file_stem().and_then(|s| s.to_str()).map(Ticker::new) {
            Some(Ok(ticker)) => tickers.push(ticker),
            _ => tracing::warn!(path = %path.display(), "Skipping file with unusable ticker name."),
        }
    }
    tickers.sort();
    Ok(tickers)
}
