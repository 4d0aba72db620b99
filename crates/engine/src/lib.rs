// In crates/engine/src/lib.rs

pub mod aggregator;
pub mod error;
pub mod observer;
pub mod task;

pub use aggregator::RunAggregator;
pub use error::TickerError;
pub use observer::{RunObserver, TickerAnalysis};
pub use task::TickerPipeline;

use chrono::Local;
use core_types::{RunReport, Ticker};
use data_source::DataSource;

/// The batch orchestrator: runs every ticker through the pipeline in order.
///
/// Processing is sequential; one ticker's failure never stops the batch.
pub struct Engine {
    pipeline: TickerPipeline,
    observers: Vec<Box<dyn RunObserver>>,
}

impl Engine {
    pub fn new(pipeline: TickerPipeline) -> Self {
        Self {
            pipeline,
            observers: Vec::new(),
        }
    }

    /// Registers an observer; observers are notified in registration order.
    pub fn add_observer(&mut self, observer: Box<dyn RunObserver>) {
        self.observers.push(observer);
    }

    /// Processes `tickers` against `source` and returns the finished report.
    pub fn run(&mut self, tickers: &[Ticker], source: &dyn DataSource) -> RunReport {
        let mut aggregator = RunAggregator::new(Local::now());
        tracing::info!(tickers = tickers.len(), source = source.name(), "Starting batch run.");

        for observer in &mut self.observers {
            observer.on_start(tickers, source.name());
        }

        for ticker in tickers {
            match self.pipeline.process(ticker, source, &mut aggregator) {
                Ok(analysis) => {
                    for observer in &mut self.observers {
                        observer.on_analysis(&analysis);
                    }
                }
                Err(error) => {
                    for observer in &mut self.observers {
                        observer.on_error(&error);
                    }
                }
            }
        }

        let report = aggregator.into_report();
        tracing::info!(
            classified = report.summary.len(),
            below = report.below_threshold.len(),
            errors = report.errors.len(),
            "Batch run finished."
        );

        for observer in &mut self.observers {
            observer.on_finish(&report);
        }
        report
    }
}
