// In crates/analytics/src/lib.rs

pub mod classification;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod types;

pub use classification::ClassificationPolicy;
pub use engine::{DEFAULT_SMA_WINDOW, MovingAverageEngine};
pub use error::{Error, Result};
pub use normalizer::PriceSeriesNormalizer;
pub use types::{MovingAverageResult, PriceColumnSpec, RollingSma};
