// In crates/engine/src/aggregator.rs

use chrono::{DateTime, Local};
use core_types::{ErrorRecord, RunReport, Status, TickerRecord};
use std::rc::Rc;

/// Collects per-ticker outcomes for one run.
///
/// Collections are append-only and keep the order tickers were processed in.
#[derive(Debug)]
pub struct RunAggregator {
    report: RunReport,
}

impl RunAggregator {
    /// Creates an empty aggregator stamped with the run start time.
    pub fn new(run_at: DateTime<Local>) -> Self {
        Self {
            report: RunReport::new(run_at),
        }
    }

    /// Records a classified ticker; `Below` records are also shared with the
    /// below-threshold collection.
    pub fn record_success(&mut self, record: Rc<TickerRecord>) {
        if record.status == Status::Below {
            self.report.below_threshold.push(Rc::clone(&record));
        }
        self.report.summary.push(record);
    }

    pub fn record_error(&mut self, error: ErrorRecord) {
        self.report.errors.push(error);
    }

    pub fn summary(&self) -> &[Rc<TickerRecord>] {
        &self.report.summary
    }

    pub fn below_threshold(&self) -> &[Rc<TickerRecord>] {
        &self.report.below_threshold
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.report.errors
    }

    /// A read-only copy of the current state; records are shared, not cloned.
    pub fn snapshot(&self) -> RunReport {
        self.report.clone()
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }
}
