// In crates/engine/src/observer.rs

use analytics::RollingSma;
use core_types::{ErrorRecord, PriceSeries, RunReport, Ticker, TickerRecord};
use std::rc::Rc;

/// Everything the pipeline learned about one successfully processed ticker.
#[derive(Debug, Clone)]
pub struct TickerAnalysis {
    /// The record as stored in the run report.
    pub record: Rc<TickerRecord>,
    /// The cleaned, ordered series the averages were computed on.
    pub series: PriceSeries,
    /// The moving average at each position of `series`.
    pub rolling: RollingSma,
}

/// Receives run progress in ticker order.
///
/// Console output and chart rendering hang off these hooks so the pipeline
/// itself stays free of presentation concerns. All hooks default to no-ops.
pub trait RunObserver {
    fn on_start(&mut self, _tickers: &[Ticker], _source: &str) {}

    fn on_analysis(&mut self, _analysis: &TickerAnalysis) {}

    fn on_error(&mut self, _error: &ErrorRecord) {}

    fn on_finish(&mut self, _report: &RunReport) {}
}
