// In crates/api-client/src/lib.rs

use app_config::MarketstackSettings;
use chrono::NaiveDate;
use core_types::{RawTable, Ticker};
use serde_json::Value;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

impl ApiClient {
    /// Constructs a new ApiClient from MarketstackSettings.
    ///
    /// No explicit timeout is configured; requests use the transport default.
    pub fn new(settings: &MarketstackSettings) -> Result<Self> {
        if settings.base_url.trim().is_empty() {
            return Err(Error::ClientBuildError("base_url is empty".to_string()));
        }
        if settings.access_key.is_empty() {
            tracing::warn!("No MarketStack access key configured; requests will be rejected.");
        }

        let http_client = reqwest::blocking::Client::builder()
            .user_agent(concat!("sma-scanner/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(ApiClient {
            http_client,
            access_key: settings.access_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches end-of-day rows for one symbol.
    ///
    /// This corresponds to the `GET /eod` endpoint. Returns `None` when the API
    /// answers with an empty `data` array.
    ///
    /// # Arguments
    ///
    /// * `symbol`: The ticker to fetch (e.g., "JET2.L").
    /// * `date_from` / `date_to`: The inclusive date range.
    /// * `limit`: Maximum number of rows to return.
    pub fn get_eod(
        &self,
        symbol: &Ticker,
        date_from: NaiveDate,
        date_to: NaiveDate,
        limit: u32,
    ) -> Result<Option<RawTable>> {
        let url = format!("{}/eod", self.base_url);
        let date_from = date_from.format("%Y-%m-%d").to_string();
        let date_to = date_to.format("%Y-%m-%d").to_string();
        let limit = limit.to_string();

        // The access key travels in the query string, so URLs are stripped from
        // transport errors before they can be logged.
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("access_key", self.access_key.as_str()),
                ("symbols", symbol.as_str()),
                ("date_from", date_from.as_str()),
                ("date_to", date_to.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .map_err(|e| Error::RequestFailed(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::RequestFailed(e.without_url()))?;
        tracing::debug!(symbol = %symbol, %status, bytes = body.len(), "Received EOD response.");

        let rows = parse_eod_body(&body)?;
        Ok(rows_to_table(rows))
    }
}

/// Parses an `/eod` response body into its data rows.
///
/// MarketStack reports failures as `{"error": {"code": ..., "message": ...}}`,
/// so that shape is checked first.
pub fn parse_eod_body(body: &str) -> Result<Vec<EodRow>> {
    let value: Value = serde_json::from_str(body)?;

    if let Some(error) = value.get("error") {
        let code = error
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let msg = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        return Err(Error::ApiError { code, msg });
    }

    let response: EodResponse = serde_json::from_value(value)?;
    if let Some(pagination) = response.pagination {
        if pagination.total > pagination.count {
            tracing::debug!(
                count = pagination.count,
                total = pagination.total,
                "EOD response was truncated by the row limit."
            );
        }
    }
    Ok(response.data)
}

/// Flattens JSON rows into a text table.
///
/// Columns follow the key order of the first row; keys that only appear in
/// later rows are appended. Returns `None` for an empty row set.
pub fn rows_to_table(rows: Vec<EodRow>) -> Option<RawTable> {
    if rows.is_empty() {
        return None;
    }

    let mut columns: Vec<String> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = RawTable::new(columns);
    for row in &rows {
        let cells = table
            .columns
            .iter()
            .map(|column| row.get(column).map(cell_text).unwrap_or_default())
            .collect();
        table.push_row(cells);
    }
    Some(table)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &MarketstackSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}
