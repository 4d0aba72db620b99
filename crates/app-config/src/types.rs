// In crates/app-config/src/types.rs

use crate::{Error, Result};
use chrono::{Local, NaiveDate};
use core_types::Ticker;
use serde::Deserialize;
use std::path::PathBuf;

/// Where per-ticker price tables come from.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Download from MarketStack and cache each table as CSV.
    #[default]
    Remote,
    /// Read previously saved CSV tables from the data folder.
    Offline,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    #[serde(default)]
    pub data_source: DataSourceSettings,
    #[serde(default)]
    pub date_range: DateRange,
    /// The ordered ticker list; processing and report order follow it.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub export: ExportOptions,
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_source: DataSourceSettings::default(),
            date_range: DateRange::default(),
            tickers: default_tickers(),
            export: ExportOptions::default(),
            analysis: AnalysisSettings::default(),
        }
    }
}

impl Settings {
    /// Checks cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.sma_window == 0 {
            return Err(Error::Invalid("analysis.sma_window must be at least 1".into()));
        }
        if self.data_source.marketstack.limit == 0 {
            return Err(Error::Invalid("data_source.marketstack.limit must be at least 1".into()));
        }
        let to = self.date_range.resolved_to();
        if self.date_range.from > to {
            return Err(Error::Invalid(format!(
                "date_range.from ({}) is after date_range.to ({})",
                self.date_range.from, to
            )));
        }
        Ok(())
    }

    pub fn tickers(&self) -> Result<Vec<Ticker>> {
        self.tickers
            .iter()
            .map(|t| Ticker::new(t).map_err(Error::from))
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DataSourceSettings {
    #[serde(default)]
    pub mode: SourceMode,
    /// The CSV cache folder (remote) or input folder (offline).
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    #[serde(default)]
    pub marketstack: MarketstackSettings,
}

impl Default for DataSourceSettings {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            folder: default_folder(),
            marketstack: MarketstackSettings::default(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct MarketstackSettings {
    /// The MarketStack API access key.
    #[serde(default)]
    pub access_key: String,
    /// The REST API base URL for MarketStack.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum rows requested per ticker.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for MarketstackSettings {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            base_url: default_base_url(),
            limit: default_limit(),
        }
    }
}

// The access key must never end up in logs.
impl std::fmt::Debug for MarketstackSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketstackSettings")
            .field("access_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("limit", &self.limit)
            .finish()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DateRange {
    #[serde(default = "default_date_from")]
    pub from: NaiveDate,
    /// Defaults to today when left out.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn resolved_to(&self) -> NaiveDate {
        self.to.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self {
            from: default_date_from(),
            to: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExportOptions {
    /// Write the xlsx report at the end of the run.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// The report is written to `<file_prefix>_<YYYY-MM-DD>.xlsx`.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Prefix every sheet with a `Scan run at ...` row.
    #[serde(default = "default_true")]
    pub include_run_stamp: bool,
    /// Render one chart per ticker.
    #[serde(default)]
    pub plot: bool,
    #[serde(default = "default_plot_dir")]
    pub plot_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            include_run_stamp: true,
            plot: false,
            plot_dir: default_plot_dir(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct AnalysisSettings {
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            sma_window: default_sma_window(),
        }
    }
}

/// A standalone ticker list file, e.g. `config/watchlist.toml`.
#[derive(Deserialize, Debug, Clone)]
pub struct Watchlist {
    pub tickers: Vec<String>,
}

impl Watchlist {
    pub fn tickers(&self) -> Result<Vec<Ticker>> {
        self.tickers
            .iter()
            .map(|t| Ticker::new(t).map_err(Error::from))
            .collect()
    }
}

/// Helper functions for serde defaults
fn default_folder() -> PathBuf { PathBuf::from("data/") }
fn default_base_url() -> String { "http://api.marketstack.com/v1".to_string() }
fn default_limit() -> u32 { 1000 }
fn default_date_from() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default() }
fn default_output_dir() -> PathBuf { PathBuf::from(".") }
fn default_file_prefix() -> String { "aim_results".to_string() }
fn default_plot_dir() -> PathBuf { PathBuf::from("plots/") }
fn default_sma_window() -> usize { 25 }
fn default_true() -> bool { true }
fn default_tickers() -> Vec<String> {
    [
        "JET2.L", "RWS.L", "FEVR.L", "GBG.L", "POLR.L", "HAT.L", "GTLY.L", "W7L.L", "CMCL.L",
        "GGP.L",
    ]
    .iter()
    .map(|t| t.to_string())
    .collect()
}
