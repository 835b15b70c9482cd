//! Discovery and chronological ordering of time-varying attributes.
//!
//! A series is every attribute whose name contains a common prefix and ends
//! in a year token, e.g. `Green_percapita_1990`, `Green_percapita_2010`.

use serde::Deserialize;

use crate::data::model::Feature;
use crate::error::SymbolWarning;

/// Separator between the parts of a series attribute name.
pub const SEPARATOR: &str = "_";

/// Index of the year token among the separator-delimited segments.
const YEAR_SEGMENT: usize = 2;

// ---------------------------------------------------------------------------
// Matching and keys
// ---------------------------------------------------------------------------

/// Case-insensitive substring matcher for the attribute-name prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    prefix: String,
    needle: String,
}

impl PrefixMatcher {
    pub fn new(prefix: &str) -> Self {
        PrefixMatcher {
            prefix: prefix.to_string(),
            needle: prefix.to_lowercase(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.needle)
    }
}

/// Ordered reference list of recognised year tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownYears(Vec<String>);

impl KnownYears {
    pub fn new<S: Into<String>>(years: impl IntoIterator<Item = S>) -> Self {
        KnownYears(years.into_iter().map(Into::into).collect())
    }

    /// Position of `token` in the reference list, `None` when unrecognised.
    pub fn position(&self, token: &str) -> Option<usize> {
        self.0.iter().position(|y| y == token)
    }
}

/// An attribute name split once into its prefix and year token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKey {
    /// Full attribute name as it appears in the data.
    pub name: String,
    /// Everything before the year token.
    pub prefix: String,
    /// Year token; empty when the name has too few segments.
    pub year: String,
}

impl SeriesKey {
    pub fn parse(name: &str) -> Self {
        let segments: Vec<&str> = name.split(SEPARATOR).collect();
        let year = segments.get(YEAR_SEGMENT).copied().unwrap_or_default();
        let prefix_len = segments.len().min(YEAR_SEGMENT);
        SeriesKey {
            name: name.to_string(),
            prefix: segments[..prefix_len].join(SEPARATOR),
            year: year.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Which features contribute attribute names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryScope {
    /// Only the first feature's attributes are inspected.
    #[default]
    FirstFeature,
    /// Union over all features, in first-seen order.
    AllFeatures,
}

/// Chronologically ordered attribute names; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSeries {
    keys: Vec<SeriesKey>,
}

impl AttributeSeries {
    pub fn keys(&self) -> &[SeriesKey] {
        &self.keys
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.name.as_str())
    }

    pub fn get(&self, index: usize) -> Option<&SeriesKey> {
        self.keys.get(index)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Result of [`select_series`]; `warning` is set when the fallback was used.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSelection {
    pub series: AttributeSeries,
    pub warning: Option<SymbolWarning>,
}

/// Discover and order the attribute series.
///
/// Names are ordered by the position of their year token in `known_years`.
/// Unrecognised tokens sort before every known year and otherwise keep
/// discovery order. When nothing matches, the series is `[fallback]` and a
/// [`SymbolWarning::NoAttributesFound`] is attached.
pub fn select_series(
    features: &[Feature],
    matcher: &PrefixMatcher,
    known_years: &KnownYears,
    scope: DiscoveryScope,
    fallback: &str,
) -> SeriesSelection {
    let mut names: Vec<&str> = Vec::new();
    let sources = match scope {
        DiscoveryScope::FirstFeature => features.get(..1).unwrap_or_default(),
        DiscoveryScope::AllFeatures => features,
    };
    for feature in sources {
        for name in &feature.attribute_names {
            if matcher.matches(name) && !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
    }

    if names.is_empty() {
        let warning = SymbolWarning::NoAttributesFound {
            prefix: matcher.prefix().to_string(),
            fallback: fallback.to_string(),
        };
        log::warn!("{warning}");
        return SeriesSelection {
            series: AttributeSeries {
                keys: vec![SeriesKey::parse(fallback)],
            },
            warning: Some(warning),
        };
    }

    let mut keys: Vec<SeriesKey> = names.into_iter().map(SeriesKey::parse).collect();
    // `None < Some(_)`, so unknown years lead; the sort is stable.
    keys.sort_by_key(|k| known_years.position(&k.year));

    SeriesSelection {
        series: AttributeSeries { keys },
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AttributeValue;
    use pretty_assertions::assert_eq;

    fn feature(names: &[&str]) -> Feature {
        Feature::at(
            0.0,
            0.0,
            names
                .iter()
                .enumerate()
                .map(|(i, n)| (n.to_string(), AttributeValue::Number(i as f64))),
        )
    }

    fn years() -> KnownYears {
        KnownYears::new(["1990", "2000", "2010", "2020"])
    }

    fn select(features: &[Feature], scope: DiscoveryScope) -> SeriesSelection {
        select_series(
            features,
            &PrefixMatcher::new("green_percapita"),
            &years(),
            scope,
            "Green_percapita_1990",
        )
    }

    #[test]
    fn orders_matching_names_by_year() {
        let features = [feature(&["Green_percapita_2010", "Green_percapita_1990", "Other"])];
        let sel = select(&features, DiscoveryScope::FirstFeature);
        let names: Vec<&str> = sel.series.names().collect();
        assert_eq!(names, ["Green_percapita_1990", "Green_percapita_2010"]);
        assert_eq!(sel.warning, None);
    }

    #[test]
    fn unknown_years_sort_first_in_discovery_order() {
        let features = [feature(&[
            "Green_percapita_2020",
            "Green_percapita_1985",
            "Green_percapita_1990",
            "Green_percapita",
        ])];
        let sel = select(&features, DiscoveryScope::FirstFeature);
        let names: Vec<&str> = sel.series.names().collect();
        assert_eq!(
            names,
            [
                "Green_percapita_1985",
                "Green_percapita",
                "Green_percapita_1990",
                "Green_percapita_2020",
            ]
        );
    }

    #[test]
    fn no_match_falls_back_with_warning() {
        let features = [feature(&["Population", "Area"])];
        let sel = select(&features, DiscoveryScope::FirstFeature);
        let names: Vec<&str> = sel.series.names().collect();
        assert_eq!(names, ["Green_percapita_1990"]);
        assert_eq!(
            sel.warning,
            Some(SymbolWarning::NoAttributesFound {
                prefix: "green_percapita".into(),
                fallback: "Green_percapita_1990".into(),
            })
        );
    }

    #[test]
    fn empty_collection_falls_back() {
        let sel = select(&[], DiscoveryScope::FirstFeature);
        assert_eq!(sel.series.len(), 1);
        assert!(sel.warning.is_some());
    }

    #[test]
    fn only_first_feature_is_inspected_by_default() {
        let features = [
            feature(&["Green_percapita_1990"]),
            feature(&["Green_percapita_1990", "Green_percapita_2000"]),
        ];
        let first = select(&features, DiscoveryScope::FirstFeature);
        assert_eq!(first.series.len(), 1);

        let all = select(&features, DiscoveryScope::AllFeatures);
        let names: Vec<&str> = all.series.names().collect();
        assert_eq!(names, ["Green_percapita_1990", "Green_percapita_2000"]);
    }

    #[test]
    fn key_splits_prefix_and_year() {
        let key = SeriesKey::parse("Green_percapita_2010");
        assert_eq!(key.prefix, "Green_percapita");
        assert_eq!(key.year, "2010");

        let short = SeriesKey::parse("Green");
        assert_eq!(short.prefix, "Green");
        assert_eq!(short.year, "");
    }
}
