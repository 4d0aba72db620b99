// In crates/analytics/src/classification.rs

use crate::types::MovingAverageResult;
use core_types::Status;
use rust_decimal::Decimal;

/// Maps a latest close / latest average pair to a `Status`.
///
/// Only a strictly lower close is `Below`; a close equal to its average
/// is `AboveOrEqual`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassificationPolicy;

impl ClassificationPolicy {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, latest_close: Decimal, latest_sma: Option<Decimal>) -> Status {
        match latest_sma {
            None => Status::InsufficientHistory,
            Some(sma) if latest_close < sma => Status::Below,
            Some(_) => Status::AboveOrEqual,
        }
    }

    pub fn classify_result(&self, result: &MovingAverageResult) -> Status {
        self.classify(result.latest_close, result.latest_sma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn equality_is_never_below() {
        let policy = ClassificationPolicy::new();
        for x in [dec!(0), dec!(9.92), dec!(1234.56)] {
            assert_eq!(policy.classify(x, Some(x)), Status::AboveOrEqual);
        }
    }

    #[test]
    fn strict_comparison_decides_direction() {
        let policy = ClassificationPolicy::new();
        assert_eq!(policy.classify(dec!(8), Some(dec!(9.92))), Status::Below);
        assert_eq!(policy.classify(dec!(10.01), Some(dec!(10))), Status::AboveOrEqual);
    }

    #[test]
    fn missing_average_means_insufficient_history() {
        let policy = ClassificationPolicy::new();
        assert_eq!(policy.classify(dec!(0), None), Status::InsufficientHistory);
        assert_eq!(policy.classify(dec!(99999), None), Status::InsufficientHistory);
    }
}
