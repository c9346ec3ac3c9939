// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Gendun: evolves dungeon levels for a tile-based game.
//!
//! A genetic algorithm searches over room layouts. Each candidate is
//! rasterized into a grid of single-character tiles and scored by a fixed
//! weighted sum of level metrics. The best grid is written as plain text for
//! the game to load.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Evolution Driver (gp)          │
//! ├─────────────────────────────────────┤
//! │  Fitness Evaluator │ Runner (rayon) │
//! ├─────────────────────────────────────┤
//! │  Router │ Rasterizer │ Geometry     │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod gp;
pub mod level;

pub use config::{EvolutionConfig, FitnessWeights, LevelConfig, SelectionConfig};
pub use error::{ConfigError, EvaluationError, EvolutionError, GridError, RasterError};

// Re-export key level types at crate root for convenience
pub use level::{Corridor, Grid, Point, Rect, Room, Tile};
