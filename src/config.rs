//! Fixed settings shared by both dashboards.

/// Rolling window used until the user moves the slider.
pub const DEFAULT_WINDOW: usize = 30;
/// Slider bounds for the rolling window.
pub const MIN_WINDOW: usize = 5;
pub const MAX_WINDOW: usize = 200;

/// Shape of the random demo table.
pub const DEMO_ROWS: usize = 10;
pub const DEMO_COLUMNS: &[&str] = &["A", "B", "C"];

/// Extensions offered by the open dialog.
pub const UPLOAD_EXTENSIONS: &[&str] = &["txt", "csv"];

pub const VIEWER_SIZE: [f32; 2] = [1280.0, 860.0];
pub const DEMO_SIZE: [f32; 2] = [900.0, 640.0];
pub const MIN_SIZE: [f32; 2] = [600.0, 400.0];

pub const TABLE_HEIGHT: f32 = 260.0;
pub const CHART_HEIGHT: f32 = 320.0;

/// Keep a window size inside the slider bounds.
pub fn clamp_window(window: usize) -> usize {
    window.clamp(MIN_WINDOW, MAX_WINDOW)
}
