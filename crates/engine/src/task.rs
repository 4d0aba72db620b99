// In crates/engine/src/task.rs

use crate::aggregator::RunAggregator;
use crate::error::{Result, TickerError};
use crate::observer::TickerAnalysis;
use analytics::{ClassificationPolicy, MovingAverageEngine, PriceSeriesNormalizer};
use core_types::{ErrorRecord, Ticker, TickerRecord};
use data_source::DataSource;
use std::rc::Rc;

/// The per-ticker chain: fetch, normalize, average, classify.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickerPipeline {
    normalizer: PriceSeriesNormalizer,
    averages: MovingAverageEngine,
    policy: ClassificationPolicy,
}

impl TickerPipeline {
    pub fn new(averages: MovingAverageEngine) -> Self {
        Self {
            normalizer: PriceSeriesNormalizer::new(),
            averages,
            policy: ClassificationPolicy::new(),
        }
    }

    /// Runs every step for one ticker, stopping at the first failure.
    pub fn evaluate(&self, ticker: &Ticker, source: &dyn DataSource) -> Result<TickerAnalysis> {
        // --- 1. Fetching ---
        let raw = source.fetch(ticker)?.ok_or(TickerError::NoDataReturned)?;
        tracing::debug!(ticker = %ticker, rows = raw.len(), columns = raw.columns.len(), "Fetched raw table.");

        // --- 2. Normalizing ---
        let series = self.normalizer.normalize(&raw)?;

        // --- 3. Computing ---
        let result = self.averages.compute(&series)?;
        let rolling = self.averages.rolling(&series)?;

        // --- 4. Classifying ---
        let status = self.policy.classify_result(&result);

        let record = TickerRecord {
            ticker: ticker.clone(),
            latest_close: result.latest_close,
            latest_sma: result.latest_sma,
            status,
        };

        Ok(TickerAnalysis {
            record: Rc::new(record),
            series,
            rolling,
        })
    }

    /// Processes one ticker and records exactly one outcome in `aggregator`.
    ///
    /// A failure becomes an `ErrorRecord` carrying the failure's message; it is
    /// returned so the caller can report it, but it is already recorded.
    pub fn process(
        &self,
        ticker: &Ticker,
        source: &dyn DataSource,
        aggregator: &mut RunAggregator,
    ) -> std::result::Result<TickerAnalysis, ErrorRecord> {
        match self.evaluate(ticker, source) {
            Ok(analysis) => {
                aggregator.record_success(Rc::clone(&analysis.record));
                Ok(analysis)
            }
            Err(err) => {
                tracing::debug!(ticker = %ticker, error = ?err, "Ticker failed.");
                let error = ErrorRecord {
                    ticker: ticker.clone(),
                    error: err.to_string(),
                };
                aggregator.record_error(error.clone());
                Err(error)
            }
        }
    }
}
