use eframe::egui;

use rusty_atlas::config::AtlasConfig;
use rusty_atlas::state::MapState;

use crate::ui::{map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyAtlasApp {
    pub state: MapState,
}

impl RustyAtlasApp {
    /// Build the app and open the configured dataset if it exists.
    pub fn new(config: AtlasConfig) -> Self {
        let mut state = MapState::new(&config);
        if config.data_path.exists() {
            panels::load_into(&mut state, &config.data_path);
        } else {
            log::info!(
                "No dataset at {}; use File → Open…",
                config.data_path.display()
            );
        }
        Self { state }
    }
}

impl eframe::App for RustyAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: year control, legend, details ----
        egui::SidePanel::left("control_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::symbol_map(ui, &mut self.state);
        });
    }
}
