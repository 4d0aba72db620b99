// In crates/reporting/src/lib.rs

pub mod console;
pub mod error;
pub mod export;
pub mod plot;

pub use console::ConsoleReporter;
pub use error::{Error, Result};
pub use export::XlsxExporter;
pub use plot::ChartPlotter;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Converts a price to `f64` for display, charting and spreadsheet cells.
pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
