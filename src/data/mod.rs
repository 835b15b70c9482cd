//! Data layer: core types, loading, and viewport filtering.
//!
//! Architecture:
//! ```text
//!  .geojson / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → FeatureDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────────┐
//!   │ FeatureDataset │  Vec<Feature>, column index
//!   └────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  map viewport → visible indices
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod filter;
