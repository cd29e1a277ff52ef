mod app;
mod cli;
mod config;
mod data;
mod error;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::AsvSelectApp;
use clap::Parser;
use cli::Cli;
use config::Config;
use eframe::egui;
use state::SessionState;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref()).context("loading configuration")?;
    log::debug!("Using {config:?}");

    match cli.command {
        Some(command) => cli::run(command, config),
        None => run_gui(config),
    }
}

fn run_gui(config: Config) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 700.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ASV Select",
        options,
        Box::new(|_cc| Ok(Box::new(AsvSelectApp::new(SessionState::new(config))))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))
}
