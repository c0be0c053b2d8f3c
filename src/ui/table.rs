use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::config::TABLE_HEIGHT;
use crate::data::model::Dataset;
use crate::stats::describe::ColumnSummary;

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable grid of every row and column.
pub fn data_table(ui: &mut Ui, id: &str, dataset: &Dataset) {
    if dataset.columns.is_empty() {
        return;
    }
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(TableColumn::auto().at_least(40.0))
            .columns(TableColumn::auto().at_least(70.0), dataset.columns.len())
            .min_scrolled_height(0.0)
            .max_scroll_height(TABLE_HEIGHT)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for col in &dataset.columns {
                    header.col(|ui| {
                        ui.strong(&col.name).on_hover_text(col.data.kind());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                    let i = row.index();
                    row.col(|ui| {
                        ui.weak(i.to_string());
                    });
                    for col in &dataset.columns {
                        row.col(|ui| {
                            ui.label(col.data.cell(i).to_string());
                        });
                    }
                });
            });
    });
}

fn fmt_num(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        format!("{v:.4}")
    }
}

/// One summary row per statistic, one column per dataset column.
/// Statistics that do not apply to a column's type are left blank.
pub fn summary_table(ui: &mut Ui, id: &str, summary: &[(String, ColumnSummary)]) {
    if summary.is_empty() {
        return;
    }

    const STATS: &[&str] = &[
        "count", "mean", "std", "min", "25%", "50%", "75%", "max", "unique", "top", "freq",
        "first", "last",
    ];

    let cell = |s: &ColumnSummary, stat: &str| -> String {
        match s {
            ColumnSummary::Numeric {
                count,
                mean,
                std,
                min,
                q25,
                median,
                q75,
                max,
            } => match stat {
                "count" => count.to_string(),
                "mean" => fmt_num(*mean),
                "std" => fmt_num(*std),
                "min" => fmt_num(*min),
                "25%" => fmt_num(*q25),
                "50%" => fmt_num(*median),
                "75%" => fmt_num(*q75),
                "max" => fmt_num(*max),
                _ => String::new(),
            },
            ColumnSummary::Text {
                count,
                unique,
                top,
                freq,
            } => match stat {
                "count" => count.to_string(),
                "unique" => unique.to_string(),
                "top" => top.clone().unwrap_or_default(),
                "freq" => freq.to_string(),
                _ => String::new(),
            },
            ColumnSummary::DateTime { count, first, last } => match stat {
                "count" => count.to_string(),
                "first" => first.map(|d| d.to_string()).unwrap_or_default(),
                "last" => last.map(|d| d.to_string()).unwrap_or_default(),
                _ => String::new(),
            },
        }
    };

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(TableColumn::auto().at_least(50.0))
            .columns(TableColumn::auto().at_least(70.0), summary.len())
            .min_scrolled_height(0.0)
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|_ui| {});
                for (name, _) in summary {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for &stat in STATS {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.strong(stat);
                        });
                        for (_, s) in summary {
                            row.col(|ui| {
                                ui.label(cell(s, stat));
                            });
                        }
                    });
                }
            });
    });
}
