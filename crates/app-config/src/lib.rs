// In crates/app-config/src/lib.rs

use config::{Config, Environment, File};
use core_types::Ticker;
use std::path::Path;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{
    AnalysisSettings, DataSourceSettings, DateRange, ExportOptions, MarketstackSettings,
    Settings, SourceMode, Watchlist,
};

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads the required `base.toml` from `config_dir`.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables
///    (e.g., `APP_DATA_SOURCE__MARKETSTACK__ACCESS_KEY=...`).
pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::with_name(&config_dir.join("base").to_string_lossy()))
        // 2. Load the environment-specific configuration file.
        .add_source(File::with_name(&config_dir.join(&environment).to_string_lossy()).required(false))
        // 3. Load settings from environment variables.
        // The prefix is `APP`, separator is `__`; `tickers` may be given comma-separated.
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("tickers"),
        )
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}

/// Loads a standalone watchlist file (`tickers = [...]`).
pub fn load_watchlist(path: &Path) -> Result<Vec<Ticker>> {
    let content = std::fs::read_to_string(path)?;

    let watchlist: Watchlist = toml::from_str(&content)?;
    watchlist.tickers()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;

    const BASE: &str = r#"
tickers = ["JET2.L", "RWS.L"]

[data_source]
mode = "offline"
folder = "csv/"

[data_source.marketstack]
access_key = "secret"

[date_range]
from = "2025-01-01"
to = "2025-03-31"

[export]
enabled = true
file_prefix = "aim_top20_results"
"#;

    #[test]
    fn loads_base_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), BASE).unwrap();

        let settings = load_settings(dir.path()).unwrap();
        assert_eq!(settings.data_source.mode, SourceMode::Offline);
        assert_eq!(settings.data_source.folder.to_str(), Some("csv/"));
        assert_eq!(settings.data_source.marketstack.limit, 1000);
        assert_eq!(
            settings.data_source.marketstack.base_url,
            "http://api.marketstack.com/v1"
        );
        assert_eq!(settings.date_range.resolved_to(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(settings.analysis.sma_window, 25);
        assert!(settings.export.enabled);
        assert!(settings.export.include_run_stamp);
        assert!(!settings.export.plot);

        let tickers: Vec<String> = settings.tickers().unwrap().into_iter().map(|t| t.0).collect();
        assert_eq!(tickers, vec!["JET2.L", "RWS.L"]);
    }

    #[test]
    fn missing_base_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_settings(dir.path()), Err(Error::LoadError(_))));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let inverted = BASE.replace("to = \"2025-03-31\"", "to = \"2024-12-31\"");
        fs::write(dir.path().join("base.toml"), inverted).unwrap();
        assert!(matches!(load_settings(dir.path()), Err(Error::Invalid(_))));
    }

    #[test]
    fn zero_window_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            format!("{BASE}\n[analysis]\nsma_window = 0\n"),
        )
        .unwrap();
        assert!(matches!(load_settings(dir.path()), Err(Error::Invalid(_))));
    }

    #[test]
    fn watchlist_replaces_ticker_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.toml");
        fs::write(&path, "tickers = [\"GBG.L\", \" HAT.L \"]\n").unwrap();

        let tickers = load_watchlist(&path).unwrap();
        assert_eq!(tickers, vec![Ticker::new("GBG.L").unwrap(), Ticker::new("HAT.L").unwrap()]);

        fs::write(&path, "tickers = [\"\"]\n").unwrap();
        assert!(matches!(load_watchlist(&path), Err(Error::Ticker(_))));
    }
}
