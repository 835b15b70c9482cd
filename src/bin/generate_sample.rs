use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

/// City name, longitude, latitude.
const CITIES: [(&str, f64, f64); 16] = [
    ("New York", -74.006, 40.7128),
    ("Los Angeles", -118.2437, 34.0522),
    ("Chicago", -87.6298, 41.8781),
    ("Houston", -95.3698, 29.7604),
    ("Phoenix", -112.074, 33.4484),
    ("Philadelphia", -75.1652, 39.9526),
    ("San Antonio", -98.4936, 29.4241),
    ("San Diego", -117.1611, 32.7157),
    ("Dallas", -96.797, 32.7767),
    ("Denver", -104.9903, 39.7392),
    ("Seattle", -122.3321, 47.6062),
    ("Minneapolis", -93.265, 44.9778),
    ("Madison", -89.4012, 43.0731),
    ("Atlanta", -84.388, 33.749),
    ("Miami", -80.1918, 25.7617),
    ("Portland", -122.6765, 45.5152),
];

const YEARS: [&str; 4] = ["1990", "2000", "2010", "2020"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let mut features = Vec::with_capacity(CITIES.len());

    for (i, &(city, lon, lat)) in CITIES.iter().enumerate() {
        let mut properties = Map::new();
        properties.insert("City".into(), json!(city));

        // m² of green space per resident, drifting a little each decade.
        let mut value = 20.0 + rng.next_f64() * 280.0;
        for year in YEARS {
            value *= 0.85 + rng.next_f64() * 0.35;
            // Every fifth city lacks the 2000 survey.
            let cell = if i % 5 == 4 && year == "2000" {
                String::new()
            } else {
                format!("{value:.2}")
            };
            properties.insert(format!("Green_percapita_{year}"), Value::String(cell));
        }

        features.push(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [lon, lat] },
            "properties": properties,
        }));
    }

    let collection = json!({ "type": "FeatureCollection", "features": features });

    let output_path = Path::new("data/green.geojson");
    if let Some(dir) = output_path.parent() {
        std::fs::create_dir_all(dir).context("creating data directory")?;
    }
    let text = serde_json::to_string_pretty(&collection).context("serialising GeoJSON")?;
    std::fs::write(output_path, text)
        .with_context(|| format!("writing {}", output_path.display()))?;

    println!(
        "Wrote {} features ({} years each) to {}",
        features.len(),
        YEARS.len(),
        output_path.display()
    );
    Ok(())
}
