use crate::config::AtlasConfig;
use crate::data::filter::{visible_indices, ViewBounds};
use crate::data::model::FeatureDataset;
use crate::error::SymbolWarning;
use crate::marker::{build_markers, MarkerStyle, MarkerSymbol, Popup};
use crate::series::{select_series, AttributeSeries, DiscoveryScope, KnownYears, PrefixMatcher};
use crate::stats::{compute_global_stats, compute_stats, StatsSnapshot};
use crate::symbol::{LegendCircles, SymbolScale};

// ---------------------------------------------------------------------------
// Open popup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct OpenPopup {
    /// `[lon, lat]` the popup is anchored to.
    pub anchor: [f64; 2],
    /// Feature the popup belongs to, `None` for a coordinate readout.
    pub feature_index: Option<usize>,
    pub popup: Popup,
}

// ---------------------------------------------------------------------------
// Map state
// ---------------------------------------------------------------------------

/// The full map state, independent of rendering.
///
/// Every mutating operation recomputes statistics, markers and legend
/// before returning, so readers never observe a half-updated state.
pub struct MapState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<FeatureDataset>,

    /// Ordered attribute series of the dataset.
    pub series: Option<AttributeSeries>,

    /// Index into `series` of the attribute being shown.
    pub selected: usize,

    /// Current viewport.
    pub bounds: ViewBounds,

    /// Indices of features inside `bounds` (cached).
    pub visible_indices: Vec<usize>,

    /// Statistics of the selected attribute over visible features.
    pub stats: StatsSnapshot,

    /// Dataset-wide statistics over the whole series.
    pub global_stats: StatsSnapshot,

    /// One marker per positioned feature.
    pub markers: Vec<MarkerSymbol>,

    /// Legend circles for `stats`.
    pub legend: Option<LegendCircles>,

    /// Popup currently shown on the map.
    pub popup: Option<OpenPopup>,

    /// Conditions raised by the last recomputation.
    pub warnings: Vec<SymbolWarning>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub matcher: PrefixMatcher,
    pub known_years: KnownYears,
    pub discovery: DiscoveryScope,
    pub fallback_attribute: String,
    pub scale: SymbolScale,
    pub max_legend_radius: f64,
    pub style: MarkerStyle,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new(&AtlasConfig::default())
    }
}

impl MapState {
    pub fn new(config: &AtlasConfig) -> Self {
        Self {
            dataset: None,
            series: None,
            selected: 0,
            bounds: ViewBounds::WORLD,
            visible_indices: Vec::new(),
            stats: StatsSnapshot::default(),
            global_stats: StatsSnapshot::default(),
            markers: Vec::new(),
            legend: None,
            popup: None,
            warnings: Vec::new(),
            status_message: None,
            matcher: config.matcher(),
            known_years: config.known_years(),
            discovery: config.discovery,
            fallback_attribute: config.fallback_attribute.clone(),
            scale: config.scale(),
            max_legend_radius: config.max_legend_radius,
            style: config.marker_style(),
        }
    }

    /// Ingest a newly loaded dataset: discover the series, compute the
    /// global baseline and render the first attribute.
    pub fn set_dataset(&mut self, dataset: FeatureDataset) {
        let selection = select_series(
            &dataset.features,
            &self.matcher,
            &self.known_years,
            self.discovery,
            &self.fallback_attribute,
        );
        let global = compute_global_stats(&dataset.features, &self.matcher);

        self.warnings = selection.warning.into_iter().chain(global.warning).collect();
        self.global_stats = global.snapshot;
        self.stats = global.snapshot;
        self.series = Some(selection.series);
        self.selected = 0;
        self.visible_indices = visible_indices(&dataset, &self.bounds);
        self.popup = None;
        self.dataset = Some(dataset);
        self.status_message = None;

        self.recompute();
    }

    /// Name of the attribute being shown.
    pub fn selected_attribute(&self) -> Option<&str> {
        self.series
            .as_ref()?
            .get(self.selected)
            .map(|k| k.name.as_str())
    }

    /// Year label of the attribute being shown.
    pub fn selected_year(&self) -> Option<&str> {
        self.series
            .as_ref()?
            .get(self.selected)
            .map(|k| k.year.as_str())
    }

    /// Show the attribute at `index` (clamped to the series).
    pub fn select_attribute(&mut self, index: usize) {
        let Some(len) = self.series.as_ref().map(AttributeSeries::len) else {
            return;
        };
        self.selected = index.min(len.saturating_sub(1));
        self.recompute();
    }

    /// Move forward (`+1`) or backward (`-1`) through the series, wrapping
    /// around at both ends.
    pub fn step(&mut self, delta: isize) {
        let Some(len) = self.series.as_ref().map(AttributeSeries::len) else {
            return;
        };
        let len = len as isize;
        let next = (self.selected as isize + delta).rem_euclid(len);
        self.select_attribute(next as usize);
    }

    /// Viewport changed; recompute only when it actually moved.
    pub fn set_view_bounds(&mut self, bounds: ViewBounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        if let Some(ds) = &self.dataset {
            self.visible_indices = visible_indices(ds, &bounds);
            self.recompute();
        }
    }

    /// Toggle value shading of marker fills.
    pub fn set_shade_by_value(&mut self, on: bool) {
        self.style.shade_by_value = on;
        self.recompute();
    }

    /// Handle a click at `[lon, lat]`: open the popup of `hit` or a
    /// coordinate readout when no marker was hit.
    pub fn click_at(&mut self, at: [f64; 2], hit: Option<usize>) {
        self.popup = Some(match hit.and_then(|i| self.markers.iter().find(|m| m.feature_index == i)) {
            Some(marker) => OpenPopup {
                anchor: marker.position,
                feature_index: Some(marker.feature_index),
                popup: marker.popup.clone(),
            },
            None => OpenPopup {
                anchor: at,
                feature_index: None,
                popup: Popup::for_coordinate(at[0], at[1]),
            },
        });
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Recompute statistics → markers → legend for the current selection.
    fn recompute(&mut self) {
        let (Some(ds), Some(series)) = (&self.dataset, &self.series) else {
            return;
        };
        let Some(key) = series.get(self.selected) else {
            return;
        };

        let visible = self.visible_indices.iter().map(|&i| &ds.features[i]);
        let outcome = compute_stats(visible, &key.name, self.global_stats);
        self.warnings.retain(|w| !matches!(w, SymbolWarning::NoDataForAttribute { .. }));
        self.warnings.extend(outcome.warning);
        self.stats = outcome.snapshot;

        self.markers = build_markers(ds, key, self.scale, &self.style, &self.stats);
        self.legend = Some(LegendCircles::new(&self.stats, self.scale, self.max_legend_radius));

        // Refresh an open feature popup with the new attribute's text.
        if let Some(open) = &mut self.popup {
            if let Some(idx) = open.feature_index {
                if let Some(m) = self.markers.iter().find(|m| m.feature_index == idx) {
                    open.popup = m.popup.clone();
                }
            }
        }

        log::debug!(
            "{}: {} visible, min {:.2} mean {:.2} max {:.2}",
            key.name,
            self.visible_indices.len(),
            self.stats.min,
            self.stats.mean,
            self.stats.max
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AttributeValue, Feature};

    fn city(lon: f64, lat: f64, values: [&str; 3]) -> Feature {
        Feature::at(
            lon,
            lat,
            [
                ("City".to_string(), AttributeValue::Text(format!("{lon}"))),
                ("Green_percapita_2010".to_string(), AttributeValue::Text(values[2].into())),
                ("Green_percapita_1990".to_string(), AttributeValue::Text(values[0].into())),
                ("Green_percapita_2000".to_string(), AttributeValue::Text(values[1].into())),
            ],
        )
    }

    fn loaded() -> MapState {
        let mut state = MapState::default();
        state.set_dataset(FeatureDataset::from_features(vec![
            city(0.0, 0.0, ["100", "", "10"]),
            city(10.0, 10.0, ["200", "", "20"]),
            city(20.0, 20.0, ["300", "", "30"]),
        ]));
        state
    }

    #[test]
    fn loading_selects_first_year() {
        let state = loaded();
        assert_eq!(state.selected_attribute(), Some("Green_percapita_1990"));
        assert_eq!(state.series.as_ref().unwrap().len(), 3);
        assert_eq!(
            state.stats,
            StatsSnapshot {
                min: 100.0,
                mean: 200.0,
                max: 300.0
            }
        );
        assert_eq!(state.global_stats.max, 300.0);
        assert_eq!(state.markers.len(), 3);
        assert!(state.warnings.is_empty());
    }

    const GLOBAL: StatsSnapshot = StatsSnapshot {
        min: 10.0,
        mean: 110.0,
        max: 300.0,
    };

    #[test]
    fn empty_year_falls_back_to_global_stats() {
        let mut state = loaded();
        assert_eq!(state.global_stats, GLOBAL);

        state.step(1);
        assert_eq!(state.selected_year(), Some("2000"));
        assert_eq!(state.stats, GLOBAL);
        assert!(matches!(
            state.warnings.as_slice(),
            [SymbolWarning::NoDataForAttribute { .. }]
        ));
        assert_eq!(state.legend.as_ref().unwrap().circles[0].value, 300.0);

        state.step(1);
        assert_eq!(state.selected_year(), Some("2010"));
        assert_eq!(state.stats.mean, 20.0);
        assert!(state.warnings.is_empty());
    }

    #[test]
    fn empty_viewport_does_not_carry_stale_stats() {
        let mut state = loaded();
        state.select_attribute(2);
        assert_eq!(state.stats.max, 30.0);

        state.set_view_bounds(ViewBounds {
            min: [100.0, 60.0],
            max: [120.0, 80.0],
        });
        assert!(state.visible_indices.is_empty());
        state.select_attribute(0);
        assert_eq!(state.selected_year(), Some("1990"));
        assert_eq!(state.stats, GLOBAL);
    }

    #[test]
    fn stepping_wraps_around() {
        let mut state = loaded();
        state.step(-1);
        assert_eq!(state.selected_year(), Some("2010"));
        state.step(1);
        assert_eq!(state.selected_year(), Some("1990"));
    }

    #[test]
    fn stats_follow_the_viewport() {
        let mut state = loaded();
        state.set_view_bounds(ViewBounds {
            min: [5.0, 5.0],
            max: [25.0, 25.0],
        });
        assert_eq!(state.visible_indices, [1, 2]);
        assert_eq!(state.stats.min, 200.0);
        // markers exist for every feature, not only visible ones
        assert_eq!(state.markers.len(), 3);
    }

    #[test]
    fn popup_updates_with_selection() {
        let mut state = loaded();
        state.click_at([10.0, 10.0], Some(1));
        let text = |s: &MapState| s.popup.as_ref().unwrap().popup.lines[1].text.clone();
        assert_eq!(text(&state), "Green percapita in 1990: 200.00");
        state.select_attribute(2);
        assert_eq!(text(&state), "Green percapita in 2010: 20.00");

        state.click_at([3.0, 4.0], None);
        let open = state.popup.as_ref().unwrap();
        assert_eq!(open.feature_index, None);
        assert_eq!(open.popup.lines[0].text, "Latitude: 4.00000");
    }

    #[test]
    fn dataset_without_series_uses_fallback() {
        let mut state = MapState::default();
        state.set_dataset(FeatureDataset::from_features(vec![Feature::at(
            0.0,
            0.0,
            [("Population".to_string(), AttributeValue::Number(5.0))],
        )]));
        assert_eq!(state.selected_attribute(), Some("Green_percapita_1990"));
        assert!(state
            .warnings
            .iter()
            .any(|w| matches!(w, SymbolWarning::NoAttributesFound { .. })));
        assert_eq!(state.markers.len(), 1);
        assert_eq!(state.markers[0].radius, 5.0);
    }
}
