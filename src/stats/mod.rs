//! Numeric summaries: the rolling band, column descriptions, box statistics.

pub mod boxplot;
pub mod describe;
pub mod rolling;

pub use rolling::{BandError, RollingBand, rolling_band};
