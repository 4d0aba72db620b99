// In crates/analytics/src/types.rs

use rust_decimal::Decimal;

/// Exact (case-insensitive) price column names, in priority order.
pub const PRICE_COLUMN_CANDIDATES: [&str; 3] = ["close", "price", "last"];

/// Identifies which raw column holds the closing price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceColumnSpec {
    pub index: usize,
    pub name: String,
}

impl PriceColumnSpec {
    /// Picks the price column from a table header.
    ///
    /// The first candidate in `PRICE_COLUMN_CANDIDATES` with an exact match wins;
    /// otherwise the first column whose name contains "close".
    pub fn resolve(columns: &[String]) -> Option<Self> {
        let lowered: Vec<String> = columns.iter().map(|c| c.trim().to_lowercase()).collect();

        let exact = PRICE_COLUMN_CANDIDATES
            .iter()
            .find_map(|candidate| lowered.iter().position(|c| c == candidate));
        let index = exact.or_else(|| lowered.iter().position(|c| c.contains("close")))?;

        Some(Self {
            index,
            name: columns[index].clone(),
        })
    }
}

/// The latest close and latest moving average of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverageResult {
    pub latest_close: Decimal,
    /// Absent when the series is shorter than the window.
    pub latest_sma: Option<Decimal>,
}

/// The moving average at every position of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingSma {
    pub window: usize,
    /// One entry per series position; `None` until a full window is available.
    pub values: Vec<Option<Decimal>>,
}

impl RollingSma {
    pub fn latest(&self) -> Option<Decimal> {
        self.values.last().copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_candidates_follow_priority_order() {
        let spec = PriceColumnSpec::resolve(&cols(&["Date", "Last", "Price"])).unwrap();
        assert_eq!(spec, PriceColumnSpec { index: 2, name: "Price".into() });

        let spec = PriceColumnSpec::resolve(&cols(&["adj_close", "CLOSE"])).unwrap();
        assert_eq!(spec.name, "CLOSE");
    }

    #[test]
    fn falls_back_to_substring_match() {
        let spec = PriceColumnSpec::resolve(&cols(&["date", "Adj Close", "close_ask"])).unwrap();
        assert_eq!(spec.index, 1);
    }

    #[test]
    fn no_candidate_resolves_to_none() {
        assert!(PriceColumnSpec::resolve(&cols(&["date", "open", "volume"])).is_none());
        assert!(PriceColumnSpec::resolve(&[]).is_none());
    }
}
