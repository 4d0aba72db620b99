// In crates/data-source/src/offline.rs

use crate::{DataSource, Result};
use core_types::{RawTable, Ticker};
use std::path::PathBuf;

/// Reads previously saved `<ticker>.csv` tables from a folder.
#[derive(Debug, Clone)]
pub struct OfflineDataSource {
    folder: PathBuf,
}

impl OfflineDataSource {
    pub fn new(folder: PathBuf) -> Self {
        Self { folder }
    }

    /// The tickers that have a table in the folder, sorted by name.
    pub fn discover_tickers(&self) -> Result<Vec<Ticker>> {
        Ok(storage::list_tickers(&self.folder)?)
    }
}

impl DataSource for OfflineDataSource {
    fn name(&self) -> &'static str {
        "OfflineCsv"
    }

    fn fetch(&self, ticker: &Ticker) -> Result<Option<RawTable>> {
        let path = storage::table_path(&self.folder, ticker);
        if !path.is_file() {
            tracing::debug!(ticker = %ticker, path = %path.display(), "No saved table for ticker.");
            return Ok(None);
        }

        let table = storage::read_table(&path)?;
        Ok((!table.is_empty()).then_some(table))
    }
}
