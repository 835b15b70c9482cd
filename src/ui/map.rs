use eframe::egui::{self, Color32, Pos2, RichText, Ui};
use egui_plot::{MarkerShape, Plot, PlotPoint, PlotTransform, Points};

use rusty_atlas::data::filter::ViewBounds;
use rusty_atlas::marker::MarkerSymbol;
use rusty_atlas::state::MapState;

// ---------------------------------------------------------------------------
// Proportional symbol map (central panel)
// ---------------------------------------------------------------------------

/// Render the markers on a lon/lat plot and route clicks and viewport
/// changes back into the state.
pub fn symbol_map(ui: &mut Ui, state: &mut MapState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a GeoJSON file to view the map  (File → Open…)");
        });
        return;
    }

    // Large circles first so small ones stay on top and clickable.
    let mut order: Vec<&MarkerSymbol> = state.markers.iter().collect();
    order.sort_by(|a, b| b.radius.total_cmp(&a.radius));

    let response = Plot::new("symbol_map")
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for m in &order {
                let radius = m.radius as f32;
                plot_ui.points(
                    Points::new(vec![m.position])
                        .shape(MarkerShape::Circle)
                        .radius(radius)
                        .filled(true)
                        .color(m.fill),
                );
                plot_ui.points(
                    Points::new(vec![m.position])
                        .shape(MarkerShape::Circle)
                        .radius(radius)
                        .filled(false)
                        .color(m.stroke),
                );
            }
        });

    let transform = response.transform;
    let bounds = transform.bounds();
    state.set_view_bounds(ViewBounds {
        min: bounds.min(),
        max: bounds.max(),
    });

    if response.response.clicked() {
        if let Some(pos) = response.response.interact_pointer_pos() {
            let at = transform.value_from_position(pos);
            let hit = hit_test(&state.markers, &transform, pos);
            state.click_at([at.x, at.y], hit);
        }
    }

    show_popup(ui.ctx(), state, &transform);
}

/// Smallest marker whose circle contains the screen position `pos`.
fn hit_test(markers: &[MarkerSymbol], transform: &PlotTransform, pos: Pos2) -> Option<usize> {
    markers
        .iter()
        .filter(|m| {
            let center = transform.position_from_point(&PlotPoint::new(m.position[0], m.position[1]));
            center.distance(pos) <= m.radius as f32
        })
        .min_by(|a, b| a.radius.total_cmp(&b.radius))
        .map(|m| m.feature_index)
}

fn show_popup(ctx: &egui::Context, state: &mut MapState, transform: &PlotTransform) {
    let Some(open) = &state.popup else {
        return;
    };
    let anchor = transform.position_from_point(&PlotPoint::new(open.anchor[0], open.anchor[1]));
    if !transform.frame().contains(anchor) {
        return;
    }

    let mut close = false;
    egui::Area::new(egui::Id::new("map_popup"))
        .fixed_pos(anchor + egui::vec2(8.0, 8.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui: &mut Ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui: &mut Ui| {
                for line in &open.popup.lines {
                    let mut text = RichText::new(&line.text);
                    if line.emphasis {
                        text = text.strong();
                    }
                    ui.label(text);
                }
                if ui.small_button(RichText::new("close").color(Color32::GRAY)).clicked() {
                    close = true;
                }
            });
        });

    if close {
        state.close_popup();
    }
}
