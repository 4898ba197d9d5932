mod aggregate;
mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use app::DashboardApp;
use eframe::egui;
use state::AppState;

/// Dataset read at startup, relative to the working directory.
const DEFAULT_DATASET: &str = "spotify_tracks_filtered.csv";

fn main() -> Result<()> {
    env_logger::init();

    // Without data there is nothing to show: refuse to open the window.
    let source = PathBuf::from(DEFAULT_DATASET);
    let dataset = data::loader::load_file(&source)
        .inspect_err(|e| log::error!("Failed to load dataset: {e}"))
        .with_context(|| format!("loading {}", source.display()))?;

    if dataset.is_empty() {
        log::warn!("{} contains no tracks", source.display());
    }

    let state = AppState::new(Arc::new(dataset), source);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 860.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Spotify Data Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
