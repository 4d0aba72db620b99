// In crates/data-source/src/remote.rs

use crate::{DataSource, Result};
use api_client::ApiClient;
use app_config::DateRange;
use chrono::NaiveDate;
use core_types::{RawTable, Ticker};
use std::path::PathBuf;

/// Downloads end-of-day tables from MarketStack and caches them as CSV.
#[derive(Debug)]
pub struct RemoteDataSource {
    client: ApiClient,
    date_from: NaiveDate,
    date_to: NaiveDate,
    limit: u32,
    cache_folder: PathBuf,
}

impl RemoteDataSource {
    pub fn new(client: ApiClient, date_range: &DateRange, limit: u32, cache_folder: PathBuf) -> Self {
        Self {
            client,
            date_from: date_range.from,
            date_to: date_range.resolved_to(),
            limit,
            cache_folder,
        }
    }

    /// Saves a downloaded table as `<cache_folder>/<ticker>.csv`.
    ///
    /// A failed write only costs the cache copy, so it is logged and swallowed.
    fn cache(&self, ticker: &Ticker, table: &RawTable) {
        let path = storage::table_path(&self.cache_folder, ticker);
        match storage::write_table(&path, table) {
            Ok(()) => tracing::debug!(ticker = %ticker, path = %path.display(), "Cached price table."),
            Err(e) => tracing::warn!(ticker = %ticker, path = %path.display(), error = %e, "Failed to cache price table."),
        }
    }
}

impl DataSource for RemoteDataSource {
    fn name(&self) -> &'static str {
        "MarketStack"
    }

    fn fetch(&self, ticker: &Ticker) -> Result<Option<RawTable>> {
        tracing::debug!(
            ticker = %ticker,
            from = %self.date_from,
            to = %self.date_to,
            limit = self.limit,
            "Requesting EOD data."
        );
        let table = self
            .client
            .get_eod(ticker, self.date_from, self.date_to, self.limit)?;

        if let Some(table) = &table {
            self.cache(ticker, table);
        }
        Ok(table)
    }
}
