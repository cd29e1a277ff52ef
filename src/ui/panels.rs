use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{SessionState, StatusKind};

const REFERENCE_EXTENSIONS: &[&str] = &["fasta", "fa", "fna", "fas", "fastq", "fq", "gz"];
const METADATA_EXTENSIONS: &[&str] = &["tsv", "txt", "csv"];

// ---------------------------------------------------------------------------
// Left side panel – ASV checklist
// ---------------------------------------------------------------------------

/// Render the ASV selection list.
pub fn identifier_panel(ui: &mut Ui, state: &mut SessionState) {
    let total = match &state.reference {
        Some(r) => r.len(),
        None => {
            ui.heading("ASVs");
            ui.separator();
            ui.label("No reference loaded.");
            return;
        }
    };
    ui.heading(format!("ASVs  ({}/{total})", state.selection.identifiers.len()));
    ui.separator();

    ui.add(egui::TextEdit::singleline(&mut state.identifier_query).hint_text("Filter…"));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_identifiers();
        }
        if ui.small_button("None").clicked() {
            state.select_no_identifiers();
        }
    });
    ui.separator();

    // Clone the visible names so the loop can mutate state.
    let visible: Vec<(String, usize)> = match &state.reference {
        Some(reference) => state
            .visible_identifiers()
            .into_iter()
            .map(|id| (id.to_string(), reference.get(id).map_or(0, |r| r.len())))
            .collect(),
        None => Vec::new(),
    };

    ScrollArea::vertical()
        .id_salt("asv_list")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (id, len) in &visible {
                let mut checked = state.selection.identifiers.contains(id);
                let response = ui
                    .checkbox(&mut checked, id.as_str())
                    .on_hover_text(format!("{len} bp"));
                if response.changed() {
                    state.toggle_identifier(id);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Right side panel – timestamp checklist
// ---------------------------------------------------------------------------

/// Render the timestamp selection list.
pub fn timestamp_panel(ui: &mut Ui, state: &mut SessionState) {
    let timestamps: Vec<String> = match &state.metadata {
        Some(m) => m.timestamps.iter().cloned().collect(),
        None => {
            ui.heading("Timestamps");
            ui.separator();
            ui.label("No metadata loaded.");
            return;
        }
    };
    ui.heading(format!(
        "Timestamps  ({}/{})",
        state.selection.timestamps.len(),
        timestamps.len()
    ));
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_timestamps();
        }
        if ui.small_button("None").clicked() {
            state.select_no_timestamps();
        }
    });
    ui.separator();

    ScrollArea::vertical()
        .id_salt("timestamp_list")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for ts in &timestamps {
                let mut checked = state.selection.timestamps.contains(ts);
                if ui.checkbox(&mut checked, ts.as_str()).changed() {
                    state.toggle_timestamp(ts);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut SessionState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open reference…").clicked() {
                open_reference_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open metadata…").clicked() {
                open_metadata_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.export_enabled(), egui::Button::new("Export metadata…"))
                .clicked()
            {
                export_metadata_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.export_enabled(), egui::Button::new("Export reference FASTA…"))
                .clicked()
            {
                export_reference_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.reference.is_some(), egui::Button::new("Export ASV lengths…"))
                .clicked()
            {
                export_lengths_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(reference) = &state.reference {
            ui.label(format!("{} ASVs", reference.len()));
        }
        if let Some(metadata) = &state.metadata {
            ui.label(format!(
                "{} rows, {} matching",
                metadata.len(),
                state.matching.len()
            ));
        }

        ui.separator();
        status_label(ui, state);
    });
}

fn status_label(ui: &mut Ui, state: &SessionState) {
    if let Some(status) = &state.status {
        let color = match status.kind {
            StatusKind::Info => ui.visuals().text_color(),
            StatusKind::Warning => Color32::from_rgb(230, 160, 0),
            StatusKind::Error => Color32::RED,
        };
        ui.label(RichText::new(&status.text).color(color));
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_reference_dialog(state: &mut SessionState) {
    let files = rfd::FileDialog::new()
        .set_title("Open reference sequences")
        .add_filter("FASTA / FASTQ", REFERENCE_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_files();

    if let Some(paths) = files {
        // Errors land in the status line; the previous reference stays.
        let _ = state.load_reference(&paths);
    }
}

pub fn open_metadata_dialog(state: &mut SessionState) {
    let file = rfd::FileDialog::new()
        .set_title("Open metadata table")
        .add_filter("Delimited text", METADATA_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        let _ = state.load_metadata(&path);
    }
}

pub fn export_metadata_dialog(state: &mut SessionState) {
    let name = state.config.output_file_name.clone();
    if let Some(path) = save_dialog("Export selected metadata", &name, METADATA_EXTENSIONS) {
        let _ = state.export_metadata(&path);
    }
}

pub fn export_reference_dialog(state: &mut SessionState) {
    if let Some(path) = save_dialog("Export selected ASVs", "selected_asvs.fasta", &["fasta", "fa"]) {
        let _ = state.export_reference(&path);
    }
}

pub fn export_lengths_dialog(state: &mut SessionState) {
    if let Some(path) = save_dialog("Export ASV lengths", "asv_lengths.tsv", &["tsv", "csv"]) {
        let _ = state.export_lengths(&path);
    }
}

fn save_dialog(title: &str, file_name: &str, extensions: &[&str]) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .set_file_name(file_name)
        .add_filter("Output", extensions)
        .save_file()
}
