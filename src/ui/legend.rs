use eframe::egui::{self, Align2, Color32, FontId, Stroke, Ui};

use rusty_atlas::marker::MarkerStyle;
use rusty_atlas::symbol::LegendCircles;

const LABEL_GAP: f32 = 12.0;
const LABEL_WIDTH: f32 = 90.0;

// ---------------------------------------------------------------------------
// Nested-circle legend
// ---------------------------------------------------------------------------

/// Draw max/mean/min circles sharing a common bottom edge, each with a
/// leader line to its value label.
pub fn legend(ui: &mut Ui, legend: &LegendCircles, style: &MarkerStyle, title: &str) {
    ui.strong(title);

    let outer = legend.outer_radius() as f32;
    let size = egui::vec2(2.0 * outer + LABEL_GAP + LABEL_WIDTH, 2.0 * outer + 4.0);
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;

    let bottom = rect.top() + 2.0 * outer + 2.0;
    let cx = rect.left() + outer + 1.0;
    let text_color = ui.visuals().text_color();
    let stroke = Stroke::new(style.stroke_width, style.stroke);

    for circle in &legend.circles {
        let r = circle.radius as f32;
        let center = egui::pos2(cx, bottom - r);
        painter.circle(center, r, style.fill.gamma_multiply(style.fill_opacity), stroke);

        let top = egui::pos2(cx, bottom - 2.0 * r);
        let label_x = rect.left() + 2.0 * outer + LABEL_GAP;
        painter.line_segment(
            [top, egui::pos2(label_x - 2.0, top.y)],
            Stroke::new(0.5, Color32::GRAY),
        );
        painter.text(
            egui::pos2(label_x, top.y),
            Align2::LEFT_CENTER,
            format!("{} {:.1}", circle.label, circle.value),
            FontId::proportional(11.0),
            text_color,
        );
    }
}
