use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{Column, ColumnData, Dataset, RawTable};

/// Name fragments that mark a column as the time axis.
pub const DATETIME_HINTS: &[&str] = &["date", "time"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// First column (in column order) whose name contains a datetime hint,
/// ignoring case.
pub fn find_datetime_column<S: AsRef<str>>(names: &[S]) -> Option<usize> {
    names.iter().position(|name| {
        let lower = name.as_ref().to_lowercase();
        DATETIME_HINTS.iter().any(|hint| lower.contains(hint))
    })
}

/// Parse a timestamp in one of the common export layouts.
/// Returns `None` instead of failing on anything unrecognised.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse a numeric field.  Anything `f64` accepts, after trimming.
pub fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Type the cleaned table column by column.
///
/// The column picked by [`find_datetime_column`] becomes `DateTime`
/// (failed values counted, not fatal).  Any other column whose present
/// values all parse as numbers, with at least one present, is `Numeric`.
/// Everything else stays `Text`.
pub fn classify(table: RawTable) -> (Dataset, Option<String>) {
    let datetime_idx = find_datetime_column(table.headers.as_slice());
    let RawTable { headers, rows } = table;

    let columns = headers
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let fields: Vec<Option<String>> =
                rows.iter().map(|row| row.get(idx).cloned().flatten()).collect();
            let data = if Some(idx) == datetime_idx {
                classify_datetime(fields)
            } else {
                classify_values(fields)
            };
            Column { name, data }
        })
        .collect::<Vec<_>>();

    let datetime_name = datetime_idx.map(|i| columns[i].name.clone());
    (Dataset { columns }, datetime_name)
}

fn classify_datetime(fields: Vec<Option<String>>) -> ColumnData {
    let mut parse_failures = 0;
    let values: Vec<Option<NaiveDateTime>> = fields
        .iter()
        .map(|f| {
            let s = f.as_deref()?;
            let parsed = parse_datetime(s);
            if parsed.is_none() {
                parse_failures += 1;
            }
            parsed
        })
        .collect();
    ColumnData::DateTime {
        values,
        parse_failures,
    }
}

fn classify_values(fields: Vec<Option<String>>) -> ColumnData {
    let numbers: Option<Vec<Option<f64>>> = fields
        .iter()
        .map(|f| match f {
            Some(s) => parse_number(s).map(Some),
            None => Some(None),
        })
        .collect();

    match numbers {
        Some(values) if values.iter().any(Option::is_some) => ColumnData::Numeric(values),
        _ => ColumnData::Text(fields),
    }
}

/// Stable ascending sort of all rows by the named datetime column.
/// Rows with no datetime go last.
pub fn sort_by_datetime(dataset: &mut Dataset, column: &str) {
    let Some(times) = dataset.datetime_values(column) else {
        return;
    };
    let mut order: Vec<usize> = (0..times.len()).collect();
    order.sort_by_key(|&i| (times[i].is_none(), times[i]));
    dataset.reorder_rows(&order);
}
