//! Drawable marker records handed to the map view.

use eframe::egui::Color32;

use crate::color;
use crate::data::model::{Feature, FeatureDataset};
use crate::series::SeriesKey;
use crate::stats::StatsSnapshot;
use crate::symbol::SymbolScale;

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Fill and outline shared by all markers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub fill: Color32,
    pub stroke: Color32,
    pub stroke_width: f32,
    pub opacity: f32,
    pub fill_opacity: f32,
    /// Darken the fill with increasing value.
    pub shade_by_value: bool,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        MarkerStyle {
            fill: Color32::from_rgb(0xff, 0x78, 0x00),
            stroke: Color32::BLACK,
            stroke_width: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
            shade_by_value: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Popup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PopupLine {
    pub text: String,
    pub emphasis: bool,
}

/// Text shown when a marker (or empty map space) is clicked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Popup {
    pub lines: Vec<PopupLine>,
}

impl Popup {
    /// Every non-series attribute in document order (`city` emphasised),
    /// followed by the selected attribute's value for its year. Other years
    /// of the series are left out.
    pub fn for_feature(feature: &Feature, key: &SeriesKey) -> Self {
        let mut lines: Vec<PopupLine> = feature
            .attributes()
            .filter(|(name, _)| !SeriesKey::parse(name).prefix.eq_ignore_ascii_case(&key.prefix))
            .map(|(name, value)| PopupLine {
                text: format!("{name}: {value}"),
                emphasis: name.eq_ignore_ascii_case("city"),
            })
            .collect();

        let value = feature
            .number(&key.name)
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "No data".to_string());
        let label = key.prefix.replace(crate::series::SEPARATOR, " ");
        let text = if key.year.is_empty() {
            format!("{label}: {value}")
        } else {
            format!("{label} in {}: {value}", key.year)
        };
        lines.push(PopupLine {
            text,
            emphasis: false,
        });
        Popup { lines }
    }

    /// Position readout for a click on empty map space.
    pub fn for_coordinate(lon: f64, lat: f64) -> Self {
        Popup {
            lines: vec![
                PopupLine {
                    text: format!("Latitude: {lat:.5}"),
                    emphasis: false,
                },
                PopupLine {
                    text: format!("Longitude: {lon:.5}"),
                    emphasis: false,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Marker
// ---------------------------------------------------------------------------

/// Immutable display state for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSymbol {
    pub feature_index: usize,
    /// `[lon, lat]`.
    pub position: [f64; 2],
    pub value: Option<f64>,
    pub radius: f64,
    pub fill: Color32,
    pub stroke: Color32,
    pub stroke_width: f32,
    pub popup: Popup,
}

/// Build markers for every positioned feature.
///
/// Features without a value for `key` still get a minimum-size marker so
/// they stay clickable.
pub fn build_markers(
    dataset: &FeatureDataset,
    key: &SeriesKey,
    scale: SymbolScale,
    style: &MarkerStyle,
    stats: &StatsSnapshot,
) -> Vec<MarkerSymbol> {
    let stroke = color::with_opacity(style.stroke, style.opacity);
    dataset
        .features
        .iter()
        .enumerate()
        .filter_map(|(i, feature)| {
            let position = feature.position?;
            let value = feature.number(&key.name).filter(|v| *v >= 0.0);
            let radius = match value {
                Some(v) => scale.radius_for(v),
                None => scale.min_radius,
            };
            let base = match value {
                Some(v) if style.shade_by_value => color::shade_for(style.fill, v, stats),
                _ => style.fill,
            };
            Some(MarkerSymbol {
                feature_index: i,
                position,
                value,
                radius,
                fill: color::with_opacity(base, style.fill_opacity),
                stroke,
                stroke_width: style.stroke_width,
                popup: Popup::for_feature(feature, key),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AttributeValue;

    fn dataset() -> FeatureDataset {
        FeatureDataset::from_features(vec![
            Feature::at(
                10.0,
                50.0,
                [
                    ("City".to_string(), AttributeValue::Text("Prague".into())),
                    ("Green_percapita_2000".to_string(), AttributeValue::Text("314.16".into())),
                ],
            ),
            Feature::at(
                12.0,
                48.0,
                [("Green_percapita_2000".to_string(), AttributeValue::Text("-".into()))],
            ),
            Feature::new(None, [("City".to_string(), AttributeValue::Text("Nowhere".into()))]),
        ])
    }

    #[test]
    fn popup_lists_city_then_value() {
        let ds = dataset();
        let key = SeriesKey::parse("Green_percapita_2000");
        let popup = Popup::for_feature(&ds.features[0], &key);
        assert_eq!(popup.lines.len(), 2);
        assert_eq!(popup.lines[0].text, "City: Prague");
        assert!(popup.lines[0].emphasis);
        assert_eq!(popup.lines[1].text, "Green percapita in 2000: 314.16");
    }

    #[test]
    fn popup_lists_other_properties_but_not_other_years() {
        let feature = Feature::at(
            0.0,
            0.0,
            [
                ("Population".to_string(), AttributeValue::Number(1200.0)),
                ("city".to_string(), AttributeValue::Text("Lyon".into())),
                ("Green_percapita_1990".to_string(), AttributeValue::Number(1.0)),
                ("Green_percapita_2000".to_string(), AttributeValue::Number(2.0)),
            ],
        );
        let popup = Popup::for_feature(&feature, &SeriesKey::parse("Green_percapita_2000"));
        let texts: Vec<(&str, bool)> = popup
            .lines
            .iter()
            .map(|l| (l.text.as_str(), l.emphasis))
            .collect();
        assert_eq!(
            texts,
            [
                ("Population: 1200", false),
                ("city: Lyon", true),
                ("Green percapita in 2000: 2.00", false),
            ]
        );
    }

    #[test]
    fn coordinate_popup_has_five_decimals() {
        let popup = Popup::for_coordinate(-89.401234567, 43.0731);
        assert_eq!(popup.lines[0].text, "Latitude: 43.07310");
        assert_eq!(popup.lines[1].text, "Longitude: -89.40123");
    }

    #[test]
    fn markers_only_for_positioned_features() {
        let ds = dataset();
        let key = SeriesKey::parse("Green_percapita_2000");
        let stats = StatsSnapshot::default();
        let markers = build_markers(&ds, &key, SymbolScale::default(), &MarkerStyle::default(), &stats);
        assert_eq!(markers.len(), 2);

        // area 314.16 → radius ≈ 10
        assert!((markers[0].radius - 10.0).abs() < 1e-3);
        assert_eq!(markers[0].fill.a(), 204);

        assert_eq!(markers[1].value, None);
        assert_eq!(markers[1].radius, 5.0);
        assert_eq!(markers[1].popup.lines[0].text, "Green percapita in 2000: No data");
    }
}
