use chrono::{DateTime, NaiveDateTime};
use eframe::egui::{self, Color32, Stroke, Ui};
use egui_plot::{
    BoxElem, BoxPlot, BoxSpread, Legend, Line, MarkerShape, Plot, PlotPoints, Points, Polygon,
};

use crate::color::SeriesColors;
use crate::config::CHART_HEIGHT;
use crate::data::model::Dataset;
use crate::state::AppState;
use crate::stats::boxplot::box_summary;

/// Seconds since the epoch, used as the x coordinate of time charts.
fn to_x(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64
}

fn format_time_axis(x: f64) -> String {
    DateTime::from_timestamp(x as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Time series with rolling band
// ---------------------------------------------------------------------------

/// Shaded ±1 std band plus the raw series as line and markers.
/// Draws nothing when the upload has no datetime column.
pub fn band_chart(ui: &mut Ui, state: &AppState) {
    let (Some(view), Some(band)) = (&state.view, &state.band) else {
        return;
    };
    let (Some(time_col), Some(series_col)) = (
        state.selection.datetime_column.as_deref(),
        state.selection.series_column.as_deref(),
    ) else {
        return;
    };
    let (Some(times), Some(values)) = (view.datetime_values(time_col), view.numeric_values(series_col))
    else {
        return;
    };

    let color = state.colors.color_for(series_col);
    let band_fill = color.gamma_multiply(0.25);

    // Rows without a timestamp cannot be placed on the axis.
    let rows: Vec<usize> = (0..times.len()).filter(|&i| times[i].is_some()).collect();
    let x_of = |i: usize| times[i].map(to_x).unwrap_or_default();

    Plot::new("band_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(time_col)
        .y_axis_label(series_col)
        .x_axis_formatter(|mark, _range| format_time_axis(mark.value))
        .label_formatter(|name, point| {
            format!("{name}\n{}\n{:.3}", format_time_axis(point.x), point.y)
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let band_name = format!("±1 std (window {})", state.window);
            for pair in rows.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if [band.upper[a], band.lower[a], band.upper[b], band.lower[b]]
                    .iter()
                    .any(|v| v.is_nan())
                {
                    continue;
                }
                let quad: PlotPoints = vec![
                    [x_of(a), band.lower[a]],
                    [x_of(b), band.lower[b]],
                    [x_of(b), band.upper[b]],
                    [x_of(a), band.upper[a]],
                ]
                .into();
                plot_ui.polygon(
                    Polygon::new(quad)
                        .fill_color(band_fill)
                        .stroke(Stroke::NONE)
                        .name(&band_name),
                );
            }

            let series: Vec<[f64; 2]> = rows
                .iter()
                .filter_map(|&i| values[i].map(|v| [x_of(i), v]))
                .collect();
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .name(series_col)
                    .color(color)
                    .width(1.5),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series))
                    .name(series_col)
                    .color(color)
                    .shape(MarkerShape::Circle)
                    .radius(2.5),
            );
        });
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// Boxplot of the selected column, outliers drawn as points.
pub fn box_chart(ui: &mut Ui, state: &AppState) {
    let Some(upload) = &state.upload else {
        return;
    };
    let Some(col) = state.selection.box_column.as_deref() else {
        return;
    };
    let Some(summary) = upload.dataset.numeric_values(col).and_then(box_summary) else {
        ui.label("No values to plot.");
        return;
    };

    let color = state.colors.color_for(col);

    Plot::new("box_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(col)
        .show_x(false)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let elem = BoxElem::new(
                0.0,
                BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                ),
            )
            .name(col)
            .box_width(0.5)
            .whisker_width(0.25)
            .fill(color.gamma_multiply(0.3))
            .stroke(Stroke::new(1.5, color));
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name(col));

            if !summary.outliers.is_empty() {
                let points: PlotPoints = summary.outliers.iter().map(|&v| [0.0, v]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name("outliers")
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Demo line chart
// ---------------------------------------------------------------------------

/// One line per numeric column against the row index.
pub fn line_chart(ui: &mut Ui, id: &str, dataset: &Dataset, colors: &SeriesColors) {
    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("row")
        .show(ui, |plot_ui| {
            for name in dataset.numeric_columns() {
                let Some(values) = dataset.numeric_values(&name) else {
                    continue;
                };
                let points: PlotPoints = values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|y| [i as f64, y]))
                    .collect();
                plot_ui.line(
                    Line::new(points)
                        .name(&name)
                        .color(colors.color_for(&name))
                        .width(1.5),
                );
            }
        });
}

/// Heading plus a muted note, used above each chart.
pub fn section(ui: &mut Ui, title: &str, note: Option<&str>) {
    ui.add_space(8.0);
    ui.heading(title);
    if let Some(note) = note {
        ui.label(egui::RichText::new(note).color(Color32::GRAY));
    }
}
