use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::color;
use crate::marker::MarkerStyle;
use crate::series::{DiscoveryScope, KnownYears, PrefixMatcher};
use crate::symbol::{SymbolScale, DEFAULT_MIN_RADIUS, DEFAULT_SCALE_FACTOR};

/// Looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "atlas.json";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Every field is optional in the file; missing ones take the defaults.
///
/// ```json
/// { "attribute_prefix": "Green_percapita", "known_years": ["1990", "2000"] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Dataset opened at startup when it exists.
    pub data_path: PathBuf,
    pub attribute_prefix: String,
    pub known_years: Vec<String>,
    /// Used when no attribute matches the prefix.
    pub fallback_attribute: String,
    pub discovery: DiscoveryScope,
    pub scale_factor: f64,
    pub min_radius: f64,
    pub max_legend_radius: f64,
    pub fill_color: String,
    pub stroke_color: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        AtlasConfig {
            data_path: PathBuf::from("data/green.geojson"),
            attribute_prefix: "Green_percapita".into(),
            known_years: ["1990", "2000", "2010", "2020"].map(String::from).to_vec(),
            fallback_attribute: "Green_percapita_1990".into(),
            discovery: DiscoveryScope::FirstFeature,
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_radius: DEFAULT_MIN_RADIUS,
            max_legend_radius: 40.0,
            fill_color: "#ff7800".into(),
            stroke_color: "#000".into(),
        }
    }
}

impl AtlasConfig {
    /// Read a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// [`CONFIG_FILE`] if present, defaults otherwise. A broken file is
    /// logged and ignored.
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(cfg) => {
                log::info!("Loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                log::error!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }

    pub fn matcher(&self) -> PrefixMatcher {
        PrefixMatcher::new(&self.attribute_prefix)
    }

    pub fn known_years(&self) -> KnownYears {
        KnownYears::new(self.known_years.iter().cloned())
    }

    pub fn scale(&self) -> SymbolScale {
        SymbolScale::new(self.scale_factor, self.min_radius)
    }

    /// Marker style; unparseable colours keep their defaults.
    pub fn marker_style(&self) -> MarkerStyle {
        let defaults = MarkerStyle::default();
        let pick = |hex: &str, fallback| {
            color::parse_hex(hex).unwrap_or_else(|| {
                log::warn!("Invalid colour '{hex}'");
                fallback
            })
        };
        MarkerStyle {
            fill: pick(&self.fill_color, defaults.fill),
            stroke: pick(&self.stroke_color, defaults.stroke),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: AtlasConfig = serde_json::from_str(
            r#"{ "attribute_prefix": "Tree_cover", "discovery": "all_features" }"#,
        )
        .unwrap();
        assert_eq!(cfg.attribute_prefix, "Tree_cover");
        assert_eq!(cfg.discovery, DiscoveryScope::AllFeatures);
        assert_eq!(cfg.min_radius, 5.0);
        assert_eq!(cfg.known_years.len(), 4);
    }

    #[test]
    fn default_style_matches_marker_defaults() {
        assert_eq!(AtlasConfig::default().marker_style(), MarkerStyle::default());
    }

    #[test]
    fn bad_colour_falls_back() {
        let cfg = AtlasConfig {
            fill_color: "orange-ish".into(),
            ..Default::default()
        };
        assert_eq!(cfg.marker_style().fill, MarkerStyle::default().fill);
    }
}
