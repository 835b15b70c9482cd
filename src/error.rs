use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Load failures (fatal for the load, never for the viewer)
// ---------------------------------------------------------------------------

/// Failure to turn a file into a [`FeatureDataset`](crate::data::model::FeatureDataset).
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("expected a FeatureCollection or Feature, found a bare geometry")]
    NotFeatureCollection,

    #[error("CSV missing '{0}' coordinate column")]
    MissingCoordinateColumn(&'static str),
}

// ---------------------------------------------------------------------------
// Recoverable conditions
// ---------------------------------------------------------------------------

/// Non-fatal conditions raised while deriving display state. The call that
/// raises one still succeeds with a documented fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SymbolWarning {
    #[error("no attribute matches '{prefix}', using '{fallback}'")]
    NoAttributesFound { prefix: String, fallback: String },

    #[error("no numeric values for '{attribute}', keeping previous statistics")]
    NoDataForAttribute { attribute: String },
}
