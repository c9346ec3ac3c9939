//! Level layer: geometry, tiles, corridor routing and rasterization.
//!
//! Everything here is pure given a [`LevelConfig`](crate::config::LevelConfig)
//! and an RNG; nothing keeps global state.

pub mod corridor;
pub mod geometry;
pub mod grid;
pub mod raster;
pub mod tile;

pub use corridor::{Bend, Corridor, Router};
pub use geometry::{Feature, Point, Rect, Room, overlaps, overlaps_any};
pub use grid::Grid;
pub use raster::{rasterize, ring};
pub use tile::{FeatureKind, Tile};
