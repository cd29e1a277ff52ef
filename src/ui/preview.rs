use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::SessionState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// Selection preview (central panel)
// ---------------------------------------------------------------------------

/// Render the rows that the current selection would export.
pub fn selection_preview(ui: &mut Ui, state: &mut SessionState) {
    let Some(metadata) = &state.metadata else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a reference and a metadata file  (File → Open…)");
        });
        return;
    };

    let n_cols = metadata.headers.len();
    let n_total = metadata.len();
    let n_rows = state.matching.len();
    let enabled = state.export_enabled();

    let export_clicked = ui
        .horizontal(|ui: &mut Ui| {
            let export = ui
                .add_enabled(enabled, egui::Button::new(RichText::new("Export…").strong()))
                .on_disabled_hover_text("Select at least one ASV and one timestamp");
            ui.label(format!("{n_rows} of {n_total} rows match"));
            export.clicked()
        })
        .inner;
    if export_clicked {
        panels::export_metadata_dialog(state);
    }
    ui.separator();

    // Re-borrow: the export dialog above may have touched the state.
    let Some(metadata) = &state.metadata else {
        return;
    };
    if n_cols == 0 {
        ui.label("Metadata file is empty.");
        return;
    }
    if metadata.is_empty() {
        ui.label("Metadata file has a header but no rows.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0).clip(true), n_cols)
        .header(20.0, |mut header| {
            for name in &metadata.headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, n_rows, |mut row| {
                let fields = &metadata.rows[state.matching[row.index()]];
                for field in fields {
                    row.col(|ui: &mut Ui| {
                        ui.label(field);
                    });
                }
            });
        });
}
