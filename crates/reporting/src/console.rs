// In crates/reporting/src/console.rs

use crate::to_f64;
use colored::{Color, Colorize};
use core_types::{ErrorRecord, RunReport, Status, Ticker, TickerRecord};
use engine::{RunObserver, TickerAnalysis};
use std::io::{self, Write};

/// Prints one colored line per ticker as the run progresses.
pub struct ConsoleReporter {
    out: Box<dyn Write>,
    window: usize,
}

impl ConsoleReporter {
    /// A reporter that writes to standard output.
    pub fn stdout(window: usize) -> Self {
        Self::new(Box::new(io::stdout()), window)
    }

    pub fn new(out: Box<dyn Write>, window: usize) -> Self {
        Self { out, window }
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        // Console output is best effort; a closed pipe must not abort the run.
        if let Err(e) = writeln!(self.out, "{line}") {
            tracing::debug!(error = %e, "Console write failed.");
        }
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Below => Color::Red,
        Status::AboveOrEqual => Color::Green,
        Status::InsufficientHistory => Color::Yellow,
    }
}

/// `TICKER: Close=12.34, SMA25=11.20`, with `NaN` for a missing average.
pub fn record_details(record: &TickerRecord, window: usize) -> String {
    let sma = record
        .latest_sma
        .map(|v| format!("{:.2}", to_f64(v)))
        .unwrap_or_else(|| "NaN".to_string());
    format!(
        "{}: Close={:.2}, SMA{}={}",
        record.ticker,
        to_f64(record.latest_close),
        window,
        sma
    )
}

impl RunObserver for ConsoleReporter {
    fn on_start(&mut self, tickers: &[Ticker], source: &str) {
        let window = self.window;
        self.emit(format_args!(
            "⏱ Starting SMA{} scan of {} tickers ({})...\n",
            window,
            tickers.len(),
            source
        ));
    }

    fn on_analysis(&mut self, analysis: &TickerAnalysis) {
        let record = &analysis.record;
        let label = format!("[{}]", record.status).color(status_color(record.status));
        let details = record_details(record, self.window);
        self.emit(format_args!("{label} {details}"));
    }

    fn on_error(&mut self, error: &ErrorRecord) {
        let label = "[ERROR]".magenta();
        self.emit(format_args!("{label} {}: {}", error.ticker, error.error));
    }

    fn on_finish(&mut self, report: &RunReport) {
        let summary = format!(
            "{} classified, {} below SMA{}, {} errors",
            report.summary.len(),
            report.below_threshold.len(),
            self.window,
            report.errors.len()
        );
        self.emit(format_args!("\n{summary}"));
        self.emit(format_args!("⏱ Scan completed at {}", report.run_stamp()));
    }
}
