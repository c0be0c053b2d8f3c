//! Box-and-whisker summary with Tukey fences.

use super::describe::{percentile, sorted_present};

/// Whiskers reach the furthest value within this many IQRs of the box.
pub const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Values outside the whiskers, ascending.
    pub outliers: Vec<f64>,
}

/// Box statistics for the present values of a numeric column.
/// `None` when the column has no values.
pub fn box_summary(values: &[Option<f64>]) -> Option<BoxSummary> {
    let sorted = sorted_present(values);
    if sorted.is_empty() {
        return None;
    }

    let q1 = percentile(&sorted, 25.0);
    let median = percentile(&sorted, 50.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR * iqr;
    let high_fence = q3 + WHISKER_IQR * iqr;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&v| v >= low_fence)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < lower_whisker || v > upper_whisker)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
    })
}
