// In crates/engine/src/error.rs

use thiserror::Error;

/// Why a single ticker could not be classified.
///
/// Every variant is recovered at the per-ticker boundary and turned into an
/// `ErrorRecord`; none of them stops the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TickerError {
    #[error("No data returned")]
    NoDataReturned,

    #[error("No valid price column found among [{}]", .columns.join(", "))]
    NoPriceColumn { columns: Vec<String> },

    #[error("No valid price values after cleaning ({rows} rows read)")]
    EmptySeriesAfterCleaning { rows: usize },

    #[error("{0}")]
    UnexpectedFailure(String),
}

impl From<analytics::Error> for TickerError {
    fn from(err: analytics::Error) -> Self {
        match err {
            analytics::Error::NoPriceColumn { columns } => TickerError::NoPriceColumn { columns },
            analytics::Error::EmptySeries { rows } => TickerError::EmptySeriesAfterCleaning { rows },
            other => TickerError::UnexpectedFailure(other.to_string()),
        }
    }
}

impl From<data_source::Error> for TickerError {
    fn from(err: data_source::Error) -> Self {
        TickerError::UnexpectedFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TickerError>;
