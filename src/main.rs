use std::path::PathBuf;

use anyhow::{Result, anyhow};
use eframe::egui;

use venture_dashboard::app::DashboardApp;
use venture_dashboard::data::loader::load_file;
use venture_dashboard::state::AppState;

/// Loaded on startup when no path is given and the file exists.
const DEFAULT_DATASET: &str = "clean_startup_data.csv";

fn main() -> Result<()> {
    env_logger::init();

    let mut state = AppState::default();

    // An explicit path must load; the default one is optional.
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            let dataset = load_file(&path)?;
            state.set_dataset(dataset, Some(path));
        }
        None => {
            let path = PathBuf::from(DEFAULT_DATASET);
            if path.exists() {
                let dataset = load_file(&path)?;
                state.set_dataset(dataset, Some(path));
            } else {
                log::info!("No dataset given; use File → Open…");
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Venture Success & Failure Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("eframe: {e}"))
}
