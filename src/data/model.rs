use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use geojson::{Geometry, Value as GeometryValue};

// ---------------------------------------------------------------------------
// AttributeValue – a single property of a feature
// ---------------------------------------------------------------------------

/// A dynamically-typed property value as it appears in the source file.
///
/// Numbers frequently arrive as text (`"12.5"`), so numeric interpretation
/// happens on demand through [`AttributeValue::as_number`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => write!(f, "{s}"),
            AttributeValue::Number(v) => write!(f, "{v}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Null => write!(f, "<null>"),
        }
    }
}

impl AttributeValue {
    /// Interpret the value as a finite number.
    ///
    /// Missing, empty, non-numeric and non-finite values are absent, not zero.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            AttributeValue::Number(v) => *v,
            AttributeValue::Text(s) => s.trim().parse::<f64>().ok()?,
            AttributeValue::Bool(_) | AttributeValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<&serde_json::Value> for AttributeValue {
    fn from(val: &serde_json::Value) -> Self {
        match val {
            serde_json::Value::String(s) => AttributeValue::Text(s.clone()),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(AttributeValue::Number)
                .unwrap_or_else(|| AttributeValue::Text(n.to_string())),
            serde_json::Value::Bool(b) => AttributeValue::Bool(*b),
            serde_json::Value::Null => AttributeValue::Null,
            other => AttributeValue::Text(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Feature – one geographic record
// ---------------------------------------------------------------------------

/// A single record: opaque geometry plus named attributes.
#[derive(Debug, Clone, Default)]
pub struct Feature {
    /// Geometry exactly as read; never inspected beyond the point position.
    pub geometry: Option<Geometry>,
    /// `[lon, lat]` when the geometry is a point.
    pub position: Option<[f64; 2]>,
    /// Attribute names in document order.
    pub attribute_names: Vec<String>,
    attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    /// Build a feature, keeping the attribute order of `attributes`.
    pub fn new(
        geometry: Option<Geometry>,
        attributes: impl IntoIterator<Item = (String, AttributeValue)>,
    ) -> Self {
        let position = geometry.as_ref().and_then(point_position);
        let mut feature = Feature {
            geometry,
            position,
            ..Default::default()
        };
        for (name, value) in attributes {
            feature.insert(name, value);
        }
        feature
    }

    /// Point feature without a stored geometry object (CSV rows, tests).
    pub fn at(
        lon: f64,
        lat: f64,
        attributes: impl IntoIterator<Item = (String, AttributeValue)>,
    ) -> Self {
        let mut feature = Feature::new(
            Some(Geometry::new(GeometryValue::Point(vec![lon, lat]))),
            attributes,
        );
        feature.position = Some([lon, lat]);
        feature
    }

    fn insert(&mut self, name: String, value: AttributeValue) {
        if self.attributes.insert(name.clone(), value).is_none() {
            self.attribute_names.push(name);
        }
    }

    /// Raw attribute lookup.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Numeric value of `name`, if present and parseable.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(AttributeValue::as_number)
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attribute_names
            .iter()
            .filter_map(|n| self.attributes.get(n).map(|v| (n.as_str(), v)))
    }
}

fn point_position(geometry: &Geometry) -> Option<[f64; 2]> {
    match &geometry.value {
        GeometryValue::Point(coords) if coords.len() >= 2 => Some([coords[0], coords[1]]),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// FeatureDataset – the complete loaded collection
// ---------------------------------------------------------------------------

/// The parsed feature collection with a pre-computed attribute index.
#[derive(Debug, Clone, Default)]
pub struct FeatureDataset {
    /// All features in file order.
    pub features: Vec<Feature>,
    /// Sorted union of attribute names across all features.
    pub column_names: Vec<String>,
}

impl FeatureDataset {
    pub fn from_features(features: Vec<Feature>) -> Self {
        let column_names: BTreeSet<String> = features
            .iter()
            .flat_map(|f| f.attribute_names.iter().cloned())
            .collect();
        FeatureDataset {
            features,
            column_names: column_names.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
