// In crates/analytics/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("No valid price column found among [{}]", .columns.join(", "))]
    NoPriceColumn { columns: Vec<String> },

    #[error("No valid price values after cleaning ({rows} rows read)")]
    EmptySeries { rows: usize },

    #[error("Price sum overflowed over a {window}-point window")]
    Overflow { window: usize },

    #[error("Invalid moving average window: {0}")]
    InvalidWindow(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
