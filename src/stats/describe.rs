//! Per-column descriptive summary shown next to the data table.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::data::model::{ColumnData, Dataset};

/// Summary of one column.  The variant follows the column's type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSummary {
    Numeric {
        count: usize,
        mean: f64,
        std: f64,
        min: f64,
        q25: f64,
        median: f64,
        q75: f64,
        max: f64,
    },
    Text {
        count: usize,
        unique: usize,
        top: Option<String>,
        freq: usize,
    },
    DateTime {
        count: usize,
        first: Option<NaiveDateTime>,
        last: Option<NaiveDateTime>,
    },
}

impl ColumnSummary {
    /// Non-null values in the column.
    pub fn count(&self) -> usize {
        match self {
            ColumnSummary::Numeric { count, .. }
            | ColumnSummary::Text { count, .. }
            | ColumnSummary::DateTime { count, .. } => *count,
        }
    }
}

/// Percentile by linear interpolation between closest ranks.
/// `sorted` must be ascending.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Present, non-NaN values sorted ascending.
pub fn sorted_present(values: &[Option<f64>]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

pub fn describe_numeric(values: &[Option<f64>]) -> ColumnSummary {
    let sorted = sorted_present(values);
    let count = sorted.len();
    let mean = if count == 0 {
        f64::NAN
    } else {
        sorted.iter().sum::<f64>() / count as f64
    };
    let std = if count > 1 {
        let var = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        f64::NAN
    };

    ColumnSummary::Numeric {
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: percentile(&sorted, 25.0),
        median: percentile(&sorted, 50.0),
        q75: percentile(&sorted, 75.0),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

pub fn describe_text(values: &[Option<String>]) -> ColumnSummary {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for v in values.iter().flatten() {
        let entry = counts.entry(v.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(v.as_str());
        }
        *entry += 1;
    }

    // ties go to the value seen first
    let mut top: Option<(&str, usize)> = None;
    for v in &first_seen {
        let n = counts[v];
        if top.map_or(true, |(_, best)| n > best) {
            top = Some((*v, n));
        }
    }

    ColumnSummary::Text {
        count: values.iter().flatten().count(),
        unique: counts.len(),
        top: top.map(|(v, _)| v.to_string()),
        freq: top.map_or(0, |(_, n)| n),
    }
}

pub fn describe_datetime(values: &[Option<NaiveDateTime>]) -> ColumnSummary {
    let present = values.iter().flatten();
    ColumnSummary::DateTime {
        count: present.clone().count(),
        first: present.clone().min().copied(),
        last: present.max().copied(),
    }
}

/// Summaries for every column, in column order.
pub fn describe(dataset: &Dataset) -> Vec<(String, ColumnSummary)> {
    dataset
        .columns
        .iter()
        .map(|col| {
            let summary = match &col.data {
                ColumnData::Numeric(v) => describe_numeric(v),
                ColumnData::Text(v) => describe_text(v),
                ColumnData::DateTime { values, .. } => describe_datetime(values),
            };
            (col.name.clone(), summary)
        })
        .collect()
}
