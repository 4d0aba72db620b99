// In crates/data-source/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API client error: {0}")]
    ApiClientError(#[from] api_client::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
