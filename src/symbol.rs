//! Area-proportional circle sizing.
//!
//! A value is drawn as a circle whose *area* is `value * scale_factor`, so
//! visual weight grows linearly with the data instead of quadratically.

use std::f64::consts::PI;

use crate::stats::StatsSnapshot;

pub const DEFAULT_SCALE_FACTOR: f64 = 1.0;
pub const DEFAULT_MIN_RADIUS: f64 = 5.0;

/// Radius of a circle with area `value * scale_factor`, never below `min_radius`.
///
/// Negative or NaN input yields `min_radius`; callers are expected to drop
/// such values before they get here.
pub fn radius_for(value: f64, scale_factor: f64, min_radius: f64) -> f64 {
    let area = value * scale_factor;
    (area / PI).sqrt().max(min_radius)
}

/// Scale parameters shared by every symbol of one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolScale {
    pub scale_factor: f64,
    pub min_radius: f64,
}

impl Default for SymbolScale {
    fn default() -> Self {
        SymbolScale {
            scale_factor: DEFAULT_SCALE_FACTOR,
            min_radius: DEFAULT_MIN_RADIUS,
        }
    }
}

impl SymbolScale {
    pub fn new(scale_factor: f64, min_radius: f64) -> Self {
        SymbolScale {
            scale_factor,
            min_radius,
        }
    }

    pub fn radius_for(&self, value: f64) -> f64 {
        radius_for(value, self.scale_factor, self.min_radius)
    }

    /// Shrink the scale so that `max_value` draws at most `max_radius` wide.
    ///
    /// The result is meant to be computed once per legend render and reused
    /// for every circle in it. Scales that already fit are returned as-is.
    pub fn fit_legend(&self, max_value: f64, max_radius: f64) -> SymbolScale {
        let min_radius = self.min_radius.min(max_radius);
        let unclamped = (max_value * self.scale_factor / PI).sqrt();
        let scale_factor = if unclamped > max_radius {
            // Area scales with the factor, so the radius ratio enters squared.
            self.scale_factor * (max_radius / unclamped).powi(2)
        } else {
            self.scale_factor
        };
        SymbolScale {
            scale_factor,
            min_radius,
        }
    }
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// One nested legend circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendCircle {
    pub label: &'static str,
    pub value: f64,
    pub radius: f64,
}

/// The max/mean/min triplet drawn in the legend, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendCircles {
    pub circles: [LegendCircle; 3],
    /// Effective scale used for all three circles.
    pub scale: SymbolScale,
}

impl LegendCircles {
    pub fn new(stats: &StatsSnapshot, base: SymbolScale, max_legend_radius: f64) -> Self {
        let scale = base.fit_legend(stats.max, max_legend_radius);
        let circle = |label, value| LegendCircle {
            label,
            value,
            radius: scale.radius_for(value),
        };
        LegendCircles {
            circles: [
                circle("max", stats.max),
                circle("mean", stats.mean),
                circle("min", stats.min),
            ],
            scale,
        }
    }

    /// Largest radius, i.e. the canvas half-height needed.
    pub fn outer_radius(&self) -> f64 {
        self.circles
            .iter()
            .map(|c| c.radius)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_clamps_to_min_radius() {
        assert_eq!(radius_for(0.0, 1.0, 5.0), 5.0);
    }

    #[test]
    fn area_is_proportional_to_value() {
        let r = radius_for(100.0 * PI, 1.0, 0.0);
        assert!((r - 10.0).abs() < 1e-12);
        let r4 = radius_for(400.0 * PI, 1.0, 0.0);
        assert!((r4 - 2.0 * r).abs() < 1e-12);
    }

    #[test]
    fn invalid_input_yields_min_radius() {
        assert_eq!(radius_for(-10.0, 1.0, 5.0), 5.0);
        assert_eq!(radius_for(f64::NAN, 1.0, 5.0), 5.0);
    }

    #[test]
    fn legend_fits_largest_circle() {
        let stats = StatsSnapshot {
            min: 100.0,
            mean: 2_500.0,
            max: 10_000.0,
        };
        let legend = LegendCircles::new(&stats, SymbolScale::default(), 30.0);
        assert!((legend.circles[0].radius - 30.0).abs() < 1e-9);
        assert!(legend.circles[1].radius < legend.circles[0].radius);
        assert!(legend.circles[2].radius <= legend.circles[1].radius);
        // mean is a quarter of max, so half the radius under a shared scale
        assert!((legend.circles[1].radius - 15.0).abs() < 1e-9);
        assert_eq!(legend.outer_radius(), legend.circles[0].radius);
    }

    #[test]
    fn legend_keeps_scale_that_already_fits() {
        let stats = StatsSnapshot {
            min: 1.0,
            mean: 2.0,
            max: 3.0,
        };
        let legend = LegendCircles::new(&stats, SymbolScale::default(), 50.0);
        assert_eq!(legend.scale, SymbolScale::default());
    }

    proptest! {
        #[test]
        fn radius_is_monotonic(a in 0.0f64..1e9, b in 0.0f64..1e9, k in 0.01f64..100.0, m in 0.0f64..20.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(radius_for(lo, k, m) <= radius_for(hi, k, m));
        }

        #[test]
        fn area_is_never_under_represented(v in 0.0f64..1e9, k in 0.01f64..100.0, m in 0.0f64..20.0) {
            let r = radius_for(v, k, m);
            prop_assert!(r >= m);
            let area = PI * r * r;
            prop_assert!(area >= v * k * (1.0 - 1e-12));
        }
    }
}
