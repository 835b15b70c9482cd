use super::model::FeatureDataset;

// ---------------------------------------------------------------------------
// Viewport predicate: which features are currently on screen
// ---------------------------------------------------------------------------

/// Longitude/latitude rectangle of the visible map area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    /// `[lon, lat]` of the lower-left corner.
    pub min: [f64; 2],
    /// `[lon, lat]` of the upper-right corner.
    pub max: [f64; 2],
}

impl ViewBounds {
    /// The whole globe.
    pub const WORLD: ViewBounds = ViewBounds {
        min: [-180.0, -90.0],
        max: [180.0, 90.0],
    };

    pub fn contains(&self, [lon, lat]: [f64; 2]) -> bool {
        (self.min[0]..=self.max[0]).contains(&lon) && (self.min[1]..=self.max[1]).contains(&lat)
    }
}

/// Return indices of features whose point lies inside `bounds`.
///
/// Features without a point position are never visible.
pub fn visible_indices(dataset: &FeatureDataset, bounds: &ViewBounds) -> Vec<usize> {
    dataset
        .features
        .iter()
        .enumerate()
        .filter(|(_, f)| f.position.is_some_and(|p| bounds.contains(p)))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Feature;

    #[test]
    fn keeps_points_inside_bounds() {
        let ds = FeatureDataset::from_features(vec![
            Feature::at(10.0, 10.0, []),
            Feature::at(50.0, 10.0, []),
            Feature::new(None, []),
            Feature::at(-5.0, -5.0, []),
        ]);
        let bounds = ViewBounds {
            min: [-10.0, -10.0],
            max: [20.0, 20.0],
        };
        assert_eq!(visible_indices(&ds, &bounds), [0, 3]);
        assert_eq!(visible_indices(&ds, &ViewBounds::WORLD), [0, 1, 3]);
    }
}
