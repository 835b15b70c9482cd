use std::io::Read;
use std::path::Path;

use geojson::GeoJson;

use super::model::{AttributeValue, Feature, FeatureDataset};
use crate::error::DataLoadError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a feature dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.geojson` / `.json` – a FeatureCollection (or a single Feature)
/// * `.csv`               – one point per row, `lon`/`lat` columns plus attributes
pub fn load_file(path: &Path) -> Result<FeatureDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "geojson" | "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_geojson(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            read_csv(file)
        }
        other => Err(DataLoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// GeoJSON loader
// ---------------------------------------------------------------------------

/// Parse GeoJSON text.
///
/// ```json
/// {
///   "type": "FeatureCollection",
///   "features": [
///     { "type": "Feature",
///       "geometry": { "type": "Point", "coordinates": [-89.4, 43.07] },
///       "properties": { "City": "Madison", "Green_percapita_1990": "41.2" } }
///   ]
/// }
/// ```
pub fn parse_geojson(text: &str) -> Result<FeatureDataset, DataLoadError> {
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => return Err(DataLoadError::NotFeatureCollection),
    };

    let features = features
        .into_iter()
        .map(|f| {
            let attributes = f
                .properties
                .iter()
                .flat_map(|props| props.iter())
                .map(|(k, v)| (k.clone(), AttributeValue::from(v)))
                .collect::<Vec<_>>();
            Feature::new(f.geometry, attributes)
        })
        .collect();

    Ok(FeatureDataset::from_features(features))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

const LON_COLUMNS: [&str; 3] = ["lon", "lng", "longitude"];
const LAT_COLUMNS: [&str; 2] = ["lat", "latitude"];

/// CSV layout: header row with column names, one point per row.
/// Longitude/latitude columns are matched case-insensitively; all other
/// columns become attributes.
pub fn read_csv<R: Read>(input: R) -> Result<FeatureDataset, DataLoadError> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    };
    let lon_idx = find(&LON_COLUMNS).ok_or(DataLoadError::MissingCoordinateColumn("lon"))?;
    let lat_idx = find(&LAT_COLUMNS).ok_or(DataLoadError::MissingCoordinateColumn("lat"))?;

    let mut features = Vec::new();
    for result in reader.records() {
        let record = result?;

        let coord = |idx: usize| record.get(idx).and_then(|s| s.trim().parse::<f64>().ok());
        let attributes = record
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != lon_idx && *i != lat_idx)
            .map(|(i, value)| (headers[i].clone(), guess_attribute_type(value)))
            .collect::<Vec<_>>();

        let feature = match (coord(lon_idx), coord(lat_idx)) {
            (Some(lon), Some(lat)) => Feature::at(lon, lat, attributes),
            _ => {
                log::warn!("CSV row {}: unreadable coordinates", features.len());
                Feature::new(None, attributes)
            }
        };
        features.push(feature);
    }

    Ok(FeatureDataset::from_features(features))
}

/// Cells stay text when they are not clearly something else; numeric text
/// is parsed later on demand either way.
fn guess_attribute_type(s: &str) -> AttributeValue {
    if s.is_empty() {
        return AttributeValue::Null;
    }
    if let Ok(f) = s.parse::<f64>() {
        return AttributeValue::Number(f);
    }
    if s == "true" || s == "false" {
        return AttributeValue::Bool(s == "true");
    }
    AttributeValue::Text(s.to_string())
}
