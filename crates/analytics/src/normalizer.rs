// In crates/analytics/src/normalizer.rs

use crate::types::PriceColumnSpec;
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::{PricePoint, PriceSeries, RawTable};
use rust_decimal::Decimal;
use std::str::FromStr;

const DATE_COLUMN: &str = "date";

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Turns a raw price table into a clean, chronologically ordered `PriceSeries`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceSeriesNormalizer;

impl PriceSeriesNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Cleans and orders a raw table.
    ///
    /// Rows whose price cannot be cleaned into a non-negative number are dropped.
    /// When a date column exists, rows with an unreadable date are dropped too and
    /// the rest are sorted by date (stable, so duplicate dates keep input order).
    /// Without a date column the input order is kept.
    pub fn normalize(&self, table: &RawTable) -> Result<PriceSeries> {
        let price_column = PriceColumnSpec::resolve(&table.columns).ok_or_else(|| {
            Error::NoPriceColumn {
                columns: table.columns.clone(),
            }
        })?;
        let date_index = find_date_column(&table.columns);

        let mut points = Vec::with_capacity(table.len());
        let mut bad_prices = 0usize;
        let mut bad_dates = 0usize;

        for row in 0..table.len() {
            let Some(price) = table.cell(row, price_column.index).and_then(clean_price) else {
                bad_prices += 1;
                continue;
            };

            let date = match date_index {
                Some(index) => match table.cell(row, index).and_then(parse_date) {
                    Some(date) => Some(date),
                    None => {
                        bad_dates += 1;
                        continue;
                    }
                },
                None => None,
            };

            points.push(PricePoint { date, price });
        }

        if bad_prices > 0 || bad_dates > 0 {
            tracing::debug!(
                column = %price_column.name,
                rows = table.len(),
                bad_prices,
                bad_dates,
                "Dropped rows while cleaning price table."
            );
        }

        if date_index.is_some() {
            points.sort_by_key(|p| p.date);
        } else if !points.is_empty() {
            tracing::warn!(
                column = %price_column.name,
                "No date column found; trusting source row order as chronological."
            );
        }

        if points.is_empty() {
            return Err(Error::EmptySeries { rows: table.len() });
        }

        Ok(PriceSeries {
            price_column: price_column.name,
            points,
        })
    }
}

fn find_date_column(columns: &[String]) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.trim().eq_ignore_ascii_case(DATE_COLUMN))
}

/// Strips everything but digits, `.` and `-` and parses the remainder.
///
/// Currency symbols, thousands separators and whitespace disappear, so
/// `"£12.50"` reads as `12.50` and `"1,234.56"` as `1234.56`. Negative or
/// unparsable values yield `None`.
pub fn clean_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let value = Decimal::from_str(&cleaned).ok()?;
    (value >= Decimal::ZERO).then_some(value)
}

/// Parses the date formats seen in MarketStack responses and exported CSVs.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    // MarketStack sends offsets without a colon, e.g. `2025-01-02T00:00:00+0000`.
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.date_naive());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
        let mut t = RawTable::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            t.push_row(row.iter().map(|c| c.to_string()).collect());
        }
        t
    }

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn cleans_currency_and_thousands_separators() {
        assert_eq!(clean_price("£12.50"), Some(dec!(12.50)));
        assert_eq!(clean_price("1,234.56"), Some(dec!(1234.56)));
        assert_eq!(clean_price(" 7 "), Some(dec!(7)));
        assert_eq!(clean_price("n/a"), None);
        assert_eq!(clean_price(""), None);
        assert_eq!(clean_price("1.2.3"), None);
        assert_eq!(clean_price("-4.5"), None);
    }

    #[test]
    fn parses_known_date_shapes() {
        assert_eq!(parse_date("2025-01-02T00:00:00+0000"), ymd(2025, 1, 2));
        assert_eq!(parse_date("2025-01-02T00:00:00Z"), ymd(2025, 1, 2));
        assert_eq!(parse_date("2025-01-02"), ymd(2025, 1, 2));
        assert_eq!(parse_date("02/01/2025"), ymd(2025, 1, 2));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn missing_price_column_is_reported() {
        let raw = table(&["Date", "Open", "Volume"], &[&["2025-01-02", "1", "100"]]);
        let err = PriceSeriesNormalizer::new().normalize(&raw).unwrap_err();
        assert!(matches!(err, Error::NoPriceColumn { ref columns } if columns.len() == 3));
        assert!(err.to_string().starts_with("No valid price column found"));
    }

    #[test]
    fn unparsable_rows_are_dropped_and_rows_sorted_by_date() {
        let raw = table(
            &["Date", "Close"],
            &[
                &["2025-01-03", "£12.50"],
                &["2025-01-01", "1,234.56"],
                &["2025-01-02", "-"],
                &["2025-01-04"],
                &["not a date", "5"],
            ],
        );
        let series = PriceSeriesNormalizer::new().normalize(&raw).unwrap();

        assert_eq!(series.price_column, "Close");
        assert_eq!(
            series.points,
            vec![
                PricePoint { date: ymd(2025, 1, 1), price: dec!(1234.56) },
                PricePoint { date: ymd(2025, 1, 3), price: dec!(12.50) },
            ]
        );
    }

    #[test]
    fn without_dates_input_order_is_kept() {
        let raw = table(&["Price"], &[&["3"], &["1"], &["2"]]);
        let series = PriceSeriesNormalizer::new().normalize(&raw).unwrap();
        let prices: Vec<Decimal> = series.prices().collect();
        assert_eq!(prices, vec![dec!(3), dec!(1), dec!(2)]);
        assert!(!series.has_dates());
    }

    #[test]
    fn duplicate_dates_keep_their_relative_order() {
        let raw = table(
            &["date", "close"],
            &[&["2025-01-02", "2"], &["2025-01-01", "1"], &["2025-01-02", "3"]],
        );
        let series = PriceSeriesNormalizer::new().normalize(&raw).unwrap();
        let prices: Vec<Decimal> = series.prices().collect();
        assert_eq!(prices, vec![dec!(1), dec!(2), dec!(3)]);
    }

    #[test]
    fn all_rows_unparsable_is_an_empty_series() {
        let raw = table(&["Last"], &[&["abc"], &[""]]);
        assert_eq!(
            PriceSeriesNormalizer::new().normalize(&raw),
            Err(Error::EmptySeries { rows: 2 })
        );
    }

    #[test]
    fn normalizing_a_clean_series_again_changes_nothing() {
        let raw = table(
            &["Date", "Adj Close"],
            &[
                &["2025-01-05", "$3.10"],
                &["2025-01-01", "bad"],
                &["2025-01-02", "1,000"],
                &["2025-01-03", "2.5"],
            ],
        );
        let normalizer = PriceSeriesNormalizer::new();
        let once = normalizer.normalize(&raw).unwrap();
        let twice = normalizer.normalize(&once.to_raw_table()).unwrap();
        assert_eq!(once, twice);

        let undated = normalizer.normalize(&table(&["price"], &[&["2"], &["1"]])).unwrap();
        assert_eq!(normalizer.normalize(&undated.to_raw_table()).unwrap(), undated);
    }
}
