use eframe::egui::{self, Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export;
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Data grid
// ---------------------------------------------------------------------------

/// Render the first `max_rows` rows of `table` as a scrollable grid.
pub fn data_table(ui: &mut Ui, id: &str, table: &Table, max_rows: usize) {
    let n_rows = table.len().min(max_rows);
    let columns = table.columns();
    if columns.is_empty() {
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(Column::auto().at_least(60.0).clip(true), columns.len())
                .min_scrolled_height(0.0)
                .max_scroll_height(320.0)
                .header(20.0, |mut header| {
                    for name in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, n_rows, |mut row| {
                        let values = &table.rows()[row.index()];
                        for value in values {
                            row.col(|ui: &mut Ui| {
                                ui.label(value.to_string());
                            });
                        }
                    });
                });
        });
    });

    ui.weak(format!("{n_rows} de {} filas", table.len()));
}

// ---------------------------------------------------------------------------
// CSV download
// ---------------------------------------------------------------------------

/// A download button; returns a status line once the user saved (or failed to).
pub fn export_button(ui: &mut Ui, label: &str, table: &Table, file_name: &str) -> Option<String> {
    if !ui.button(format!("⬇ {label}")).clicked() {
        return None;
    }
    let path = rfd::FileDialog::new()
        .set_title(label)
        .set_file_name(file_name)
        .add_filter("CSV", &["csv"])
        .save_file()?;

    match export::write_csv(table, &path) {
        Ok(()) => Some(format!("Guardado: {}", path.display())),
        Err(e) => {
            log::error!("Failed to export CSV: {e:#}");
            Some(format!("Error: {e:#}"))
        }
    }
}
