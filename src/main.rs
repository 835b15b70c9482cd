mod app;
mod ui;

use app::RustyAtlasApp;
use eframe::egui;
use rusty_atlas::config::AtlasConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AtlasConfig::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Atlas – Proportional Symbols",
        options,
        Box::new(move |_cc| Ok(Box::new(RustyAtlasApp::new(config)))),
    )
}
