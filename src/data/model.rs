use std::fmt;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// RawTable – parsed fields before any typing
// ---------------------------------------------------------------------------

/// Header names plus rows of optional text fields, straight from the reader.
/// `None` marks a missing value (empty cell or an NA spelling).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CellValue – a single typed cell
// ---------------------------------------------------------------------------

/// One cell of a [`Dataset`], typed by its column.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnData – per-column classification
// ---------------------------------------------------------------------------

/// The values of one column, tagged with the type inferred for it.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    DateTime {
        values: Vec<Option<NaiveDateTime>>,
        /// Present text values that could not be read as a datetime.
        parse_failures: usize,
    },
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::DateTime { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ColumnData::Numeric(_) => "numeric",
            ColumnData::Text(_) => "text",
            ColumnData::DateTime { .. } => "datetime",
        }
    }

    pub fn cell(&self, row: usize) -> CellValue {
        match self {
            ColumnData::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(CellValue::Null, CellValue::Number),
            ColumnData::Text(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map_or(CellValue::Null, CellValue::Text),
            ColumnData::DateTime { values, .. } => values
                .get(row)
                .copied()
                .flatten()
                .map_or(CellValue::Null, CellValue::DateTime),
        }
    }

    /// Rearrange rows so that new row `i` is old row `order[i]`.
    pub fn reorder(&mut self, order: &[usize]) {
        fn permute<T: Clone>(v: &mut Vec<T>, order: &[usize]) {
            *v = order.iter().map(|&i| v[i].clone()).collect();
        }
        match self {
            ColumnData::Numeric(v) => permute(v, order),
            ColumnData::Text(v) => permute(v, order),
            ColumnData::DateTime { values, .. } => permute(values, order),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the cleaned, typed table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Ordered, uniquely named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub columns: Vec<Column>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of every numeric column, in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.data.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn numeric_values(&self, name: &str) -> Option<&[Option<f64>]> {
        match &self.column(name)?.data {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    pub fn datetime_values(&self, name: &str) -> Option<&[Option<NaiveDateTime>]> {
        match &self.column(name)?.data {
            ColumnData::DateTime { values, .. } => Some(values),
            _ => None,
        }
    }

    /// Add a column, replacing an existing one with the same name in place.
    pub fn set_column(&mut self, name: &str, data: ColumnData) {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(Column {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Apply the same row permutation to every column.
    pub fn reorder_rows(&mut self, order: &[usize]) {
        for col in &mut self.columns {
            col.data.reorder(order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset {
            columns: vec![
                Column {
                    name: "Temp".into(),
                    data: ColumnData::Numeric(vec![Some(1.0), None, Some(3.0)]),
                },
                Column {
                    name: "Site".into(),
                    data: ColumnData::Text(vec![Some("a".into()), Some("b".into()), None]),
                },
            ],
        }
    }

    #[test]
    fn set_column_replaces_same_name() {
        let mut ds = sample();
        ds.set_column("mean", ColumnData::Numeric(vec![Some(0.0); 3]));
        ds.set_column("Temp", ColumnData::Numeric(vec![Some(9.0); 3]));

        assert_eq!(ds.column_names(), vec!["Temp", "Site", "mean"]);
        assert_eq!(ds.numeric_values("Temp").unwrap()[1], Some(9.0));
    }

    #[test]
    fn reorder_moves_all_columns_together() {
        let mut ds = sample();
        ds.reorder_rows(&[2, 0, 1]);

        assert_eq!(ds.numeric_values("Temp").unwrap(), &[Some(3.0), Some(1.0), None]);
        assert_eq!(ds.columns[1].data.cell(0), CellValue::Null);
        assert_eq!(ds.columns[1].data.cell(1), CellValue::Text("a".into()));
    }

    #[test]
    fn null_cells_display_empty() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(sample().numeric_columns(), vec!["Temp"]);
    }
}
