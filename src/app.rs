use eframe::egui;

use crate::state::SessionState;
use crate::ui::{panels, preview};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AsvSelectApp {
    pub state: SessionState,
}

impl AsvSelectApp {
    pub fn new(state: SessionState) -> Self {
        Self { state }
    }
}

impl eframe::App for AsvSelectApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: ASVs ----
        egui::SidePanel::left("asv_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::identifier_panel(ui, &mut self.state);
            });

        // ---- Right side panel: timestamps ----
        egui::SidePanel::right("timestamp_panel")
            .default_width(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::timestamp_panel(ui, &mut self.state);
            });

        // ---- Central panel: rows to export ----
        egui::CentralPanel::default().show(ctx, |ui| {
            preview::selection_preview(ui, &mut self.state);
        });
    }
}
