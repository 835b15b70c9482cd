use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use rusty_atlas::data::loader;
use rusty_atlas::series::SEPARATOR;
use rusty_atlas::state::MapState;

use super::legend;

// ---------------------------------------------------------------------------
// Left side panel – year control, legend, feature details
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut MapState) {
    ui.heading("Year");
    ui.separator();

    let Some(series) = state.series.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Sequence control: ◀ slider ▶ ----
    let last = series.len().saturating_sub(1);
    let mut index = state.selected;
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("◀").clicked() {
            state.step(-1);
            index = state.selected;
        }
        let slider = egui::Slider::new(&mut index, 0..=last)
            .show_value(false)
            .clamping(egui::SliderClamping::Always);
        if ui.add_enabled(last > 0, slider).changed() {
            state.select_attribute(index);
        }
        if ui.button("▶").clicked() {
            state.step(1);
        }
    });

    let Some(key) = series.get(state.selected) else {
        return;
    };
    ui.label(RichText::new(&key.year).size(20.0).strong());
    ui.label(RichText::new(&key.name).small().color(Color32::GRAY));

    let mut shade = state.style.shade_by_value;
    if ui.checkbox(&mut shade, "Shade by value").changed() {
        state.set_shade_by_value(shade);
    }
    ui.separator();

    // ---- Legend ----
    if let Some(circles) = &state.legend {
        let label = key.prefix.replace(SEPARATOR, " ");
        let title = if key.year.is_empty() {
            label
        } else {
            format!("{label} in {}", key.year)
        };
        legend::legend(ui, circles, &state.style, &title);
        ui.label(
            RichText::new(format!(
                "{} of {} features in view",
                state.visible_indices.len(),
                state.dataset.as_ref().map_or(0, |ds| ds.len())
            ))
            .small(),
        );
    }

    for warning in &state.warnings {
        ui.label(RichText::new(warning.to_string()).color(Color32::YELLOW).small());
    }
    ui.separator();

    // ---- Attributes of the clicked feature ----
    ui.strong("Selected feature");
    let feature = state
        .popup
        .as_ref()
        .and_then(|p| p.feature_index)
        .zip(state.dataset.as_ref())
        .and_then(|(i, ds)| ds.features.get(i));
    let Some(feature) = feature else {
        ui.label("Click a symbol to inspect it.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto())
                .column(Column::remainder())
                .header(18.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Attribute");
                    });
                    header.col(|ui| {
                        ui.strong("Value");
                    });
                })
                .body(|mut body| {
                    for (name, value) in feature.attributes() {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                let text = RichText::new(name);
                                if name.eq_ignore_ascii_case("city") {
                                    ui.label(text.strong());
                                } else {
                                    ui.label(text);
                                }
                            });
                            row.col(|ui| {
                                ui.label(value.to_string());
                            });
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut MapState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} features loaded, {} years",
                ds.len(),
                state.series.as_ref().map_or(0, |s| s.len())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut MapState) {
    let file = rfd::FileDialog::new()
        .set_title("Open point data")
        .add_filter("Supported files", &["geojson", "json", "csv"])
        .add_filter("GeoJSON", &["geojson", "json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

/// Load `path` into `state`, reporting failures in the status line.
pub fn load_into(state: &mut MapState, path: &Path) {
    match loader::load_file(path) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} features with columns {:?}",
                dataset.len(),
                dataset.column_names
            );
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
