use crate::color::SeriesColors;
use crate::config::{DEFAULT_WINDOW, clamp_window};
use crate::data::loader::RawUpload;
use crate::data::model::Dataset;
use crate::pipeline::{self, ProcessedUpload, Selection};
use crate::stats::RollingBand;
use crate::stats::describe::{self, ColumnSummary};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct AppState {
    /// Cleaned upload (None until the user opens a file).
    pub upload: Option<ProcessedUpload>,

    /// The upload's dataset with the band columns attached.
    pub view: Option<Dataset>,

    /// Band for the current time-series column (cached).
    pub band: Option<RollingBand>,

    /// Column summaries of the cleaned upload (cached).
    pub summary: Vec<(String, ColumnSummary)>,

    pub selection: Selection,

    /// Rolling window size, kept within the slider bounds.
    pub window: usize,

    /// One colour per numeric column.
    pub colors: SeriesColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            upload: None,
            view: None,
            band: None,
            summary: Vec::new(),
            selection: Selection::default(),
            window: DEFAULT_WINDOW,
            colors: SeriesColors::default(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Run the pipeline over a freshly opened file.
    pub fn ingest(&mut self, upload: &RawUpload) -> Result<(), pipeline::PipelineError> {
        let processed = pipeline::process_upload(upload)?;
        self.set_upload(processed);
        Ok(())
    }

    /// Install a processed upload, reset selection and derived views.
    pub fn set_upload(&mut self, processed: ProcessedUpload) {
        self.selection =
            Selection::defaults(&processed.dataset, processed.datetime_column.clone());
        self.colors = SeriesColors::new(&processed.dataset.numeric_columns());
        self.summary = describe::describe(&processed.dataset);
        self.status_message = None;
        self.upload = Some(processed);
        self.refresh_band();
    }

    /// Recompute the band and the enriched view after a control change.
    pub fn refresh_band(&mut self) {
        self.band = None;
        self.view = None;
        let Some(upload) = &self.upload else {
            return;
        };

        let mut view = upload.dataset.clone();
        if let Some(col) = self.selection.series_column.clone() {
            match pipeline::attach_band(&mut view, &col, self.window) {
                Ok(band) => {
                    if !band.is_complete() {
                        log::info!("'{col}' has fewer than two values; no rolling band");
                    }
                    self.band = Some(band);
                }
                Err(e) => {
                    log::error!("Failed to compute rolling band: {e}");
                    self.status_message = Some(format!("Error: {e}"));
                }
            }
        }
        self.view = Some(view);
    }

    pub fn set_series_column(&mut self, col: String) {
        self.selection.series_column = Some(col);
        self.refresh_band();
    }

    pub fn set_box_column(&mut self, col: String) {
        self.selection.box_column = Some(col);
    }

    pub fn set_window(&mut self, window: usize) {
        let window = clamp_window(window);
        if window != self.window {
            self.window = window;
            self.refresh_band();
        }
    }

    /// Numeric columns the user may pick from.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.upload
            .as_ref()
            .map(|u| u.dataset.numeric_columns())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut out = self
            .upload
            .as_ref()
            .map(ProcessedUpload::warnings)
            .unwrap_or_default();
        if self.band.as_ref().is_some_and(|b| !b.is_complete()) {
            if let Some(col) = &self.selection.series_column {
                out.push(format!(
                    "'{col}' needs at least two values for a rolling band."
                ));
            }
        }
        out
    }
}
