//! Min/mean/max over a numeric attribute.

use crate::data::model::Feature;
use crate::error::SymbolWarning;
use crate::series::PrefixMatcher;

/// `{min, mean, max}` over one attribute of one feature subset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// A snapshot plus the condition raised while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsOutcome {
    pub snapshot: StatsSnapshot,
    /// `Some` when the fallback was returned.
    pub warning: Option<SymbolWarning>,
}

#[derive(Debug, Clone, Copy)]
struct Accumulator {
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn new() -> Self {
        Accumulator {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            count: 0,
        }
    }

    fn push(&mut self, v: f64) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
        self.sum += v;
        self.count += 1;
    }

    fn finish(self) -> Option<StatsSnapshot> {
        (self.count > 0).then(|| StatsSnapshot {
            min: self.min,
            mean: self.sum / self.count as f64,
            max: self.max,
        })
    }
}

fn outcome(acc: Accumulator, label: &str, fallback: StatsSnapshot) -> StatsOutcome {
    match acc.finish() {
        Some(snapshot) => StatsOutcome {
            snapshot,
            warning: None,
        },
        None => {
            let warning = SymbolWarning::NoDataForAttribute {
                attribute: label.to_string(),
            };
            log::warn!("{warning}");
            StatsOutcome {
                snapshot: fallback,
                warning: Some(warning),
            }
        }
    }
}

/// Statistics of `attribute` across `features`.
///
/// Values that are missing or do not parse as finite numbers are skipped.
/// With no surviving values, `fallback` is returned unchanged alongside
/// [`SymbolWarning::NoDataForAttribute`].
pub fn compute_stats<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    attribute: &str,
    fallback: StatsSnapshot,
) -> StatsOutcome {
    let mut acc = Accumulator::new();
    for v in features.into_iter().filter_map(|f| f.number(attribute)) {
        acc.push(v);
    }
    outcome(acc, attribute, fallback)
}

/// Dataset-wide statistics over every attribute matching `matcher`.
///
/// Used as the fallback baseline for [`compute_stats`] and as the legend's
/// reference scale. Falls back to an all-zero snapshot when nothing is numeric.
pub fn compute_global_stats<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    matcher: &PrefixMatcher,
) -> StatsOutcome {
    let mut acc = Accumulator::new();
    for feature in features {
        for (name, value) in feature.attributes() {
            if let Some(v) = value.as_number().filter(|_| matcher.matches(name)) {
                acc.push(v);
            }
        }
    }
    outcome(acc, matcher.prefix(), StatsSnapshot::default())
}
