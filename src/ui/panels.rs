use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::{MAX_WINDOW, MIN_WINDOW, UPLOAD_EXTENSIONS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – chart controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    if state.upload.is_none() {
        ui.label("No file loaded.");
        return;
    }

    let columns = state.numeric_columns();
    if columns.is_empty() {
        ui.label("No numeric columns to plot.");
        return;
    }

    // ---- Time-series variable ----
    ui.strong("Time-series variable");
    let current = state.selection.series_column.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("series_column")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    state.set_series_column(col.clone());
                }
            }
        });
    ui.add_space(6.0);

    // ---- Boxplot variable ----
    ui.strong("Boxplot variable");
    let current = state.selection.box_column.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("box_column")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    state.set_box_column(col.clone());
                }
            }
        });
    ui.add_space(6.0);

    // ---- Rolling window ----
    ui.strong("Rolling window");
    let mut window = state.window;
    if ui
        .add(egui::Slider::new(&mut window, MIN_WINDOW..=MAX_WINDOW).text("rows"))
        .changed()
    {
        state.set_window(window);
    }

    ui.separator();
    if let Some(upload) = &state.upload {
        let report = upload.report;
        ui.label(format!("{} rows kept", upload.dataset.len()));
        ui.label(format!("{} malformed lines skipped", report.malformed));
        ui.label(format!("{} empty rows dropped", report.empty));
        ui.label(format!("{} SDI rows dropped", report.sentinel));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.view.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(upload) = &state.upload {
            ui.label(format!(
                "{}: {} rows, {} columns",
                upload.file_name,
                upload.dataset.len(),
                upload.dataset.columns.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Yellow notes for conditions that limit the dashboard.
pub fn warnings(ui: &mut Ui, state: &AppState) {
    for warning in state.warnings() {
        ui.label(RichText::new(format!("⚠ {warning}")).color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open environmental data")
        .add_filter("Data files", UPLOAD_EXTENSIONS)
        .pick_file();

    let Some(path) = file else {
        return;
    };
    let result = crate::data::loader::load_file(&path)
        .and_then(|upload| state.ingest(&upload).map_err(anyhow::Error::from));
    if let Err(e) = result {
        log::error!("Failed to load file: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(view) = &state.view else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export cleaned data")
        .add_filter("CSV", &["csv"])
        .set_file_name("cleaned.csv")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = crate::export::export_to_path(view, &path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
