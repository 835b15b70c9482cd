//! Proportional-symbol mapping of time-series GeoJSON attributes.
//!
//! ```text
//!  file ─▶ data::loader ─▶ series::select_series ─▶ stats ─▶ symbol ─▶ marker
//!                                                    ▲
//!                                     state::MapState (viewport, selection)
//! ```
//!
//! Everything here is pure computation; the `ui` module of the viewer binary
//! is the only part that draws.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod marker;
pub mod series;
pub mod state;
pub mod stats;
pub mod symbol;
