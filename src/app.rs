use eframe::egui::{self, ScrollArea, Ui};

use crate::color::SeriesColors;
use crate::config::DEMO_COLUMNS;
use crate::data::model::Dataset;
use crate::demo;
use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// Environmental viewer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ViewerApp {
    pub state: AppState,
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: chart controls ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table, summary, charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            viewer_body(ui, &self.state);
        });
    }
}

fn viewer_body(ui: &mut Ui, state: &AppState) {
    let Some(upload) = &state.upload else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a .txt or .csv file to begin  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            panels::warnings(ui, state);

            plot::section(ui, "Data", Some(upload.file_name.as_str()));
            if let Some(view) = &state.view {
                table::data_table(ui, "data_table", view);
            }

            plot::section(ui, "Summary", None);
            table::summary_table(ui, "summary_table", &state.summary);

            if state.selection.datetime_column.is_some() {
                let note = state
                    .selection
                    .series_column
                    .as_ref()
                    .map(|col| format!("{col} with rolling mean ± 1 std"));
                plot::section(ui, "Time series", note.as_deref());
                plot::band_chart(ui, state);
            }

            plot::section(ui, "Distribution", state.selection.box_column.as_deref());
            plot::box_chart(ui, state);
        });
}

// ---------------------------------------------------------------------------
// Random data demo
// ---------------------------------------------------------------------------

pub struct DemoApp {
    pub table: Dataset,
    colors: SeriesColors,
}

impl Default for DemoApp {
    fn default() -> Self {
        let names: Vec<String> = DEMO_COLUMNS.iter().map(|c| c.to_string()).collect();
        Self {
            table: demo::demo_table(),
            colors: SeriesColors::new(&names),
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("My first dashboard");
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Here is a table of random data:");
                if ui.button("Regenerate").clicked() {
                    self.table = demo::demo_table();
                }
            });
            table::data_table(ui, "demo_table", &self.table);
            ui.add_space(8.0);
            plot::line_chart(ui, "demo_lines", &self.table, &self.colors);
        });
    }
}
