//! The viewer pipeline: upload bytes → cleaned, typed, sorted dataset,
//! then the rolling band for whichever column is selected.

use thiserror::Error;

use crate::data::clean::{self, CleanReport};
use crate::data::loader::{self, LoadError, RawUpload};
use crate::data::model::{ColumnData, Dataset};
use crate::data::schema;
use crate::stats::{BandError, RollingBand, rolling_band};

/// Names of the columns [`attach_band`] adds to a dataset.
pub const BAND_COLUMNS: [&str; 4] = ["mean", "std", "upper", "lower"];

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Band(#[from] BandError),
    #[error("'{0}' is not a numeric column")]
    NotNumeric(String),
}

// ---------------------------------------------------------------------------
// Upload processing
// ---------------------------------------------------------------------------

/// A cleaned upload, ready for band computation and display.
#[derive(Debug, Clone)]
pub struct ProcessedUpload {
    pub file_name: String,
    pub dataset: Dataset,
    pub report: CleanReport,
    /// Line at which the tabular records started.
    pub record_start: usize,
    pub datetime_column: Option<String>,
    pub datetime_failures: usize,
}

impl ProcessedUpload {
    /// User-facing notes about conditions that limit the dashboard.
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        match &self.datetime_column {
            None => out.push(
                "No date/time column found; the time-series chart is not shown.".to_string(),
            ),
            Some(col) if self.datetime_failures > 0 => out.push(format!(
                "{} value(s) in '{col}' could not be read as a date/time.",
                self.datetime_failures
            )),
            Some(_) => {}
        }
        if self.dataset.numeric_columns().is_empty() {
            out.push("No numeric columns found.".to_string());
        }
        out
    }
}

/// Run parse → clean → classify → sort over one upload.
pub fn process_upload(upload: &RawUpload) -> Result<ProcessedUpload, PipelineError> {
    let parsed = loader::parse_upload(&upload.bytes)?;
    let mut table = parsed.table;
    let report = clean::clean(&mut table, parsed.malformed);
    log::debug!(
        "{}: dropped {} malformed, {} empty, {} SDI rows",
        upload.file_name,
        report.malformed,
        report.empty,
        report.sentinel
    );

    let (mut dataset, datetime_column) = schema::classify(table);
    let mut datetime_failures = 0;
    match &datetime_column {
        Some(col) => {
            schema::sort_by_datetime(&mut dataset, col);
            if let Some(ColumnData::DateTime { parse_failures, .. }) =
                dataset.column(col).map(|c| &c.data)
            {
                datetime_failures = *parse_failures;
            }
        }
        None => log::warn!("{}: no date/time column detected", upload.file_name),
    }

    log::info!(
        "Loaded {} rows × {} columns from {} (records start at line {})",
        dataset.len(),
        dataset.columns.len(),
        upload.file_name,
        parsed.record_start
    );

    Ok(ProcessedUpload {
        file_name: upload.file_name.clone(),
        dataset,
        report,
        record_start: parsed.record_start,
        datetime_column,
        datetime_failures,
    })
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which columns the charts are showing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub datetime_column: Option<String>,
    pub series_column: Option<String>,
    pub box_column: Option<String>,
}

impl Selection {
    /// First numeric column for the time series, second (or first again)
    /// for the boxplot.
    pub fn defaults(dataset: &Dataset, datetime_column: Option<String>) -> Self {
        let numeric = dataset.numeric_columns();
        Selection {
            datetime_column,
            series_column: numeric.first().cloned(),
            box_column: numeric.get(1).or(numeric.first()).cloned(),
        }
    }

    /// Keep choices that still name a numeric column; reset the rest.
    pub fn revalidate(&mut self, dataset: &Dataset) {
        let fallback = Selection::defaults(dataset, self.datetime_column.clone());
        let valid = |c: &Option<String>| {
            c.as_deref()
                .is_some_and(|name| dataset.numeric_values(name).is_some())
        };
        if !valid(&self.series_column) {
            self.series_column = fallback.series_column;
        }
        if !valid(&self.box_column) {
            self.box_column = fallback.box_column;
        }
    }
}

// ---------------------------------------------------------------------------
// Band enrichment
// ---------------------------------------------------------------------------

/// Compute the rolling band over `column` and store it in the dataset as
/// `mean`, `std`, `upper` and `lower` columns.
pub fn attach_band(
    dataset: &mut Dataset,
    column: &str,
    window: usize,
) -> Result<RollingBand, PipelineError> {
    let values = dataset
        .numeric_values(column)
        .ok_or_else(|| PipelineError::NotNumeric(column.to_string()))?;
    let band = rolling_band(values, window)?;

    let to_column = |v: &[f64]| {
        ColumnData::Numeric(v.iter().map(|&x| (!x.is_nan()).then_some(x)).collect())
    };
    for (name, values) in BAND_COLUMNS
        .iter()
        .zip([&band.mean, &band.std, &band.upper, &band.lower])
    {
        dataset.set_column(name, to_column(values.as_slice()));
    }

    Ok(band)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(text: &str) -> RawUpload {
        RawUpload {
            file_name: "test.csv".into(),
            bytes: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn sdi_rows_and_metadata_are_removed() {
        let processed = process_upload(&upload(
            "Site 4\nBEGIN RECORD\nSampleDate,Temp\n2024-01-02,5\n2024-01-01,SDI-ERROR\n,\n2024-01-01,4\n",
        ))
        .unwrap();

        assert_eq!(processed.record_start, 2);
        assert_eq!(processed.report.sentinel, 1);
        assert_eq!(processed.report.empty, 1);
        assert_eq!(processed.datetime_column.as_deref(), Some("SampleDate"));
        assert_eq!(
            processed.dataset.numeric_values("Temp").unwrap(),
            &[Some(4.0), Some(5.0)]
        );
        assert!(processed.warnings().is_empty());
    }

    #[test]
    fn missing_datetime_is_a_warning() {
        let processed = process_upload(&upload("Temp,Flow\n1,2\n3,4\n")).unwrap();

        assert!(processed.datetime_column.is_none());
        let warnings = processed.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("time-series"));
    }

    #[test]
    fn selection_defaults() {
        let two = process_upload(&upload("Date,A,Note,B\n2024-01-01,1,x,2\n")).unwrap();
        let sel = Selection::defaults(&two.dataset, two.datetime_column.clone());
        assert_eq!(sel.series_column.as_deref(), Some("A"));
        assert_eq!(sel.box_column.as_deref(), Some("B"));

        let one = process_upload(&upload("Date,A\n2024-01-01,1\n")).unwrap();
        let sel = Selection::defaults(&one.dataset, None);
        assert_eq!(sel.series_column.as_deref(), Some("A"));
        assert_eq!(sel.box_column.as_deref(), Some("A"));
    }

    #[test]
    fn revalidate_keeps_valid_choice() {
        let p = process_upload(&upload("Date,A,B,C\n2024-01-01,1,2,3\n")).unwrap();
        let mut sel = Selection::defaults(&p.dataset, None);
        sel.series_column = Some("C".into());
        sel.box_column = Some("Date".into());
        sel.revalidate(&p.dataset);

        assert_eq!(sel.series_column.as_deref(), Some("C"));
        assert_eq!(sel.box_column.as_deref(), Some("B"));
    }

    #[test]
    fn band_columns_are_attached() {
        let mut p = process_upload(&upload("V\n10\n12\n11\n13\n12\n")).unwrap();
        let band = attach_band(&mut p.dataset, "V", 3).unwrap();

        assert_eq!(p.dataset.column_names(), vec!["V", "mean", "std", "upper", "lower"]);
        assert_eq!(p.dataset.numeric_values("upper").unwrap()[2], Some(band.upper[2]));
        assert!((band.upper[2] - 13.0).abs() < 1e-9);

        // recomputing replaces rather than duplicates
        attach_band(&mut p.dataset, "V", 5).unwrap();
        assert_eq!(p.dataset.columns.len(), 5);
    }

    #[test]
    fn band_needs_numeric_column() {
        let mut p = process_upload(&upload("Name,V\nx,1\n")).unwrap();
        let err = attach_band(&mut p.dataset, "Name", 3).unwrap_err();
        assert!(matches!(err, PipelineError::NotNumeric(_)));
    }
}
