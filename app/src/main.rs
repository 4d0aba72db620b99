// In app/src/main.rs

use analytics::MovingAverageEngine;
use anyhow::{Context, Result};
use app_config::{Settings, SourceMode};
use clap::Parser;
use core_types::Ticker;
use data_source::{DataSource, OfflineDataSource, RemoteDataSource};
use engine::{Engine, TickerPipeline};
use reporting::{ChartPlotter, ConsoleReporter, XlsxExporter};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Scans a watchlist of stock tickers and flags those whose latest close is below their simple moving average."
)]
struct Cli {
    /// Export the results to an xlsx workbook.
    #[arg(long)]
    csv: bool,

    /// Cache/data folder for per-ticker CSV files (bare flag means `data/`).
    #[arg(long, num_args = 0..=1, default_missing_value = "data/")]
    folder: Option<PathBuf>,

    /// Render a close-versus-SMA chart per ticker.
    #[arg(long)]
    plot: bool,

    /// Read previously downloaded CSV files instead of calling the API.
    #[arg(long)]
    offline: bool,

    /// Directory holding `base.toml` and the per-environment overrides.
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// TOML watchlist (`tickers = [...]`) replacing the configured tickers.
    #[arg(long, value_name = "FILE")]
    tickers: Option<PathBuf>,

    /// Log at DEBUG instead of INFO.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Flags win over anything loaded from configuration.
    fn apply(&self, settings: &mut Settings) {
        if self.csv {
            settings.export.enabled = true;
        }
        if let Some(folder) = &self.folder {
            settings.data_source.folder = folder.clone();
        }
        if self.plot {
            settings.export.plot = true;
        }
        if self.offline {
            settings.data_source.mode = SourceMode::Offline;
        }
    }
}

// --- Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = app_config::load_settings(&cli.config_dir)
        .with_context(|| format!("loading settings from {}", cli.config_dir.display()))?;
    cli.apply(&mut settings);

    let watchlist = cli
        .tickers
        .as_deref()
        .map(|path| {
            app_config::load_watchlist(path)
                .with_context(|| format!("loading watchlist {}", path.display()))
        })
        .transpose()?;

    let folder = settings.data_source.folder.clone();
    storage::ensure_folder(&folder)
        .with_context(|| format!("preparing data folder {}", folder.display()))?;

    let (source, tickers): (Box<dyn DataSource>, Vec<Ticker>) = match settings.data_source.mode {
        SourceMode::Remote => {
            let client = api_client::new(&settings.data_source.marketstack)?;
            let tickers = match watchlist {
                Some(tickers) => tickers,
                None => settings.tickers()?,
            };
            let remote: Box<dyn DataSource> = Box::new(RemoteDataSource::new(
                client,
                &settings.date_range,
                settings.data_source.marketstack.limit,
                folder,
            ));
            (remote, tickers)
        }
        SourceMode::Offline => {
            let offline = OfflineDataSource::new(folder);
            let tickers = offline_tickers(watchlist, &offline)?;
            let offline: Box<dyn DataSource> = Box::new(offline);
            (offline, tickers)
        }
    };

    run(&settings, &tickers, source.as_ref())
}

/// Offline runs scan every table in the data folder unless a watchlist file
/// was passed; the configured ticker list only drives remote downloads.
fn offline_tickers(watchlist: Option<Vec<Ticker>>, source: &OfflineDataSource) -> Result<Vec<Ticker>> {
    match watchlist {
        Some(tickers) => Ok(tickers),
        None => {
            let tickers = source.discover_tickers()?;
            tracing::info!(count = tickers.len(), "Discovered tickers from data folder.");
            Ok(tickers)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new()
                .with_target("reqwest", tracing::Level::WARN)
                .with_target("hyper", tracing::Level::WARN)
                .with_target("hyper_util", tracing::Level::WARN)
                .with_default(level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();
}

fn run(settings: &Settings, tickers: &[Ticker], source: &dyn DataSource) -> Result<()> {
    let averages = MovingAverageEngine::new(settings.analysis.sma_window)?;
    let window = averages.window();
    let pipeline = TickerPipeline::new(averages);

    let mut engine = Engine::new(pipeline);
    engine.add_observer(Box::new(ConsoleReporter::stdout(window)));
    if settings.export.plot {
        engine.add_observer(Box::new(ChartPlotter::new(
            settings.export.plot_dir.clone(),
            window,
        )));
    }

    let report = engine.run(tickers, source);

    if settings.export.enabled {
        let exporter = XlsxExporter::new(
            settings.export.output_dir.clone(),
            settings.export.file_prefix.clone(),
            settings.export.include_run_stamp,
            window,
        );
        let path = exporter.export(&report).context("exporting results")?;
        println!("\n✅ Results exported to {}", path.display());
    }

    Ok(())
}
