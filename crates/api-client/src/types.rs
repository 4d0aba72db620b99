// In crates/api-client/src/types.rs

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The blocking client for the MarketStack end-of-day API.
#[derive(Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The MarketStack access key, sent as a query parameter.
    pub access_key: String,
    /// The base URL for the MarketStack API (e.g., "http://api.marketstack.com/v1").
    pub base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// A single end-of-day row as sent by MarketStack, keys in response order.
pub type EodRow = Map<String, Value>;

/// The successful body of `GET /eod`.
#[derive(Debug, Deserialize)]
pub struct EodResponse {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub data: Vec<EodRow>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(default)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
    pub count: u32,
    pub total: u32,
}
