use crate::types::{MovingAverageResult, RollingSma};
use crate::{Error, Result};
use core_types::PriceSeries;
use rust_decimal::Decimal;

/// The trailing window used by the scanner (SMA25).
pub const DEFAULT_SMA_WINDOW: usize = 25;

/// Computes simple moving averages over a cleaned price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverageEngine {
    window: usize,
}

impl Default for MovingAverageEngine {
    fn default() -> Self {
        Self { window: DEFAULT_SMA_WINDOW }
    }
}

impl MovingAverageEngine {
    /// Creates an engine for a trailing window of `window` observations.
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(Error::InvalidWindow(window));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Calculates the latest close and the moving average at the last position.
    ///
    /// The average is the plain mean of the final `window` prices; it is absent
    /// when the series holds fewer than `window` points.
    pub fn compute(&self, series: &PriceSeries) -> Result<MovingAverageResult> {
        let latest_close = series
            .points
            .last()
            .map(|p| p.price)
            .ok_or(Error::EmptySeries { rows: 0 })?;

        let len = series.len();
        let latest_sma = if len >= self.window {
            Some(self.window_mean(series.points[len - self.window..].iter().map(|p| p.price))?)
        } else {
            None
        };

        Ok(MovingAverageResult { latest_close, latest_sma })
    }

    /// Calculates the moving average at every position of the series.
    pub fn rolling(&self, series: &PriceSeries) -> Result<RollingSma> {
        let prices: Vec<Decimal> = series.prices().collect();

        let mut values = vec![None; prices.len().min(self.window - 1)];
        for window in prices.windows(self.window) {
            values.push(Some(self.window_mean(window.iter().copied())?));
        }

        Ok(RollingSma {
            window: self.window,
            values,
        })
    }

    // Each mean is taken from the window's own values, never a running total.
    fn window_mean(&self, mut prices: impl Iterator<Item = Decimal>) -> Result<Decimal> {
        let sum = prices.try_fold(Decimal::ZERO, |acc, price| acc.checked_add(price));
        let sum = sum.ok_or(Error::Overflow { window: self.window })?;
        Ok(sum / Decimal::from(self.window))
    }
}
