use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::stats::StatsSnapshot;

// ---------------------------------------------------------------------------
// Hex colours
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` / `#rgb` (leading `#` optional).
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let rgb = Srgb::<u8>::from_str(hex.trim()).ok()?;
    Some(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Apply an opacity in `0..=1` to an opaque colour.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a)
}

// ---------------------------------------------------------------------------
// Value shading
// ---------------------------------------------------------------------------

/// Lightness at the low / high end of the value range.
const LIGHTNESS_LOW: f32 = 0.75;
const LIGHTNESS_HIGH: f32 = 0.35;

/// Shade `base` by where `value` falls between `stats.min` and `stats.max`:
/// the larger the value, the darker the fill. Hue and saturation are kept.
pub fn shade_for(base: Color32, value: f64, stats: &StatsSnapshot) -> Color32 {
    let range = stats.max - stats.min;
    let t = if range.abs() < f64::EPSILON {
        0.5
    } else {
        ((value - stats.min) / range).clamp(0.0, 1.0) as f32
    };

    let rgb = Srgb::new(
        base.r() as f32 / 255.0,
        base.g() as f32 / 255.0,
        base.b() as f32 / 255.0,
    );
    let mut hsl: Hsl = rgb.into_color();
    hsl.lightness = LIGHTNESS_LOW + (LIGHTNESS_HIGH - LIGHTNESS_LOW) * t;
    let out: Srgb = hsl.into_color();
    Color32::from_rgb(
        (out.red.clamp(0.0, 1.0) * 255.0) as u8,
        (out.green.clamp(0.0, 1.0) * 255.0) as u8,
        (out.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leaflet_defaults() {
        assert_eq!(parse_hex("#ff7800"), Some(Color32::from_rgb(255, 120, 0)));
        assert_eq!(parse_hex("#000"), Some(Color32::BLACK));
        assert_eq!(parse_hex("not a colour"), None);
    }

    #[test]
    fn larger_values_are_darker() {
        let stats = StatsSnapshot {
            min: 0.0,
            mean: 50.0,
            max: 100.0,
        };
        let base = Color32::from_rgb(255, 120, 0);
        let light = shade_for(base, 0.0, &stats);
        let dark = shade_for(base, 100.0, &stats);
        let sum = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        assert!(sum(light) > sum(dark));
    }

    #[test]
    fn opacity_sets_alpha() {
        assert_eq!(with_opacity(Color32::BLACK, 0.8).a(), 204);
    }
}
