// In crates/core-types/src/types.rs

use crate::{Error, Result};
use chrono::{DateTime, Local, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// A stock symbol identifying one instrument's price series (e.g., "JET2.L").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticker(pub String);

impl Ticker {
    /// Builds a ticker from user input, trimming surrounding whitespace.
    ///
    /// Tickers name files in the data folder, so path separators and the
    /// `.`/`..` names are rejected.
    pub fn new(symbol: impl AsRef<str>) -> Result<Self> {
        let trimmed = symbol.as_ref().trim();
        let invalid = trimmed.is_empty()
            || trimmed == "."
            || trimmed == ".."
            || trimmed
                .chars()
                .any(|c| c.is_whitespace() || c == '/' || c == '\\');
        if invalid {
            return Err(Error::InvalidTicker(symbol.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// An untyped table of text cells as delivered by a data source.
///
/// Rows may be shorter or longer than the header; missing cells read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell at `row`/`column`, if the row is wide enough.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

/// One cleaned observation of a price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    /// The trading date, when the source table carried one.
    pub date: Option<NaiveDate>,
    pub price: Decimal,
}

/// A cleaned, ordered price series for one ticker.
///
/// Every price is non-negative; points are date-ascending when dates are known,
/// otherwise they keep the source order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    /// The name of the raw column the prices were read from.
    pub price_column: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn prices(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.iter().map(|p| p.price)
    }

    pub fn has_dates(&self) -> bool {
        self.points.iter().any(|p| p.date.is_some())
    }

    /// Renders the series back into a two-column (or price-only) raw table.
    pub fn to_raw_table(&self) -> RawTable {
        let with_dates = self.has_dates();
        let mut columns = Vec::with_capacity(2);
        if with_dates {
            columns.push("date".to_string());
        }
        columns.push(self.price_column.clone());

        let mut table = RawTable::new(columns);
        for point in &self.points {
            let mut row = Vec::with_capacity(2);
            if with_dates {
                row.push(
                    point
                        .date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                );
            }
            row.push(point.price.to_string());
            table.push_row(row);
        }
        table
    }
}

/// The classification of a ticker's latest close against its moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    AboveOrEqual,
    Below,
    InsufficientHistory,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::AboveOrEqual => "ABOVE_OR_EQUAL",
            Status::Below => "BELOW",
            Status::InsufficientHistory => "INSUFFICIENT-HISTORY",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome for one successfully processed ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRecord {
    pub ticker: Ticker,
    pub latest_close: Decimal,
    /// Absent when the series is shorter than the averaging window.
    pub latest_sma: Option<Decimal>,
    pub status: Status,
}

/// The outcome for a ticker whose processing failed at some step.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub ticker: Ticker,
    pub error: String,
}

/// The aggregate output of one batch run.
///
/// `below_threshold` shares its records with `summary`; both keep ticker
/// processing order.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_at: DateTime<Local>,
    pub summary: Vec<Rc<TickerRecord>>,
    pub below_threshold: Vec<Rc<TickerRecord>>,
    pub errors: Vec<ErrorRecord>,
}

impl RunReport {
    pub fn new(run_at: DateTime<Local>) -> Self {
        Self {
            run_at,
            summary: Vec::new(),
            below_threshold: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// The run timestamp in the `YYYY-MM-DD HH:MM:SS` form used by reports.
    pub fn run_stamp(&self) -> String {
        self.run_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn processed(&self) -> usize {
        self.summary.len() + self.errors.len()
    }
}
