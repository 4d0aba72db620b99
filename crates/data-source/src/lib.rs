// In crates/data-source/src/lib.rs

use core_types::{RawTable, Ticker};
pub mod error;
pub mod offline;
pub mod remote;

// Re-export public types
pub use error::{Error, Result};
pub use offline::OfflineDataSource;
pub use remote::RemoteDataSource;

/// The universal interface for a source of per-ticker price tables.
///
/// A `DataSource` hands back the raw, uncleaned table for a ticker. It does not
/// interpret columns; that is left to the analytics normalizer.
pub trait DataSource {
    /// The name of the data source (e.g., "MarketStack", "OfflineCsv").
    fn name(&self) -> &'static str;

    /// Retrieves the raw price table for `ticker`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(RawTable))`: The source produced at least one row.
    /// * `Ok(None)`: The source has no data for this ticker.
    /// * `Err(Error)`: Retrieval failed (transport, API or file error).
    fn fetch(&self, ticker: &Ticker) -> Result<Option<RawTable>>;
}
