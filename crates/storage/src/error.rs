// In crates/storage/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV operation failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
