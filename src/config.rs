//! Tunable constants for level generation, scoring and evolution.
//!
//! Every component takes its configuration by reference, so two runs with
//! different tunings can share a process without interfering.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Level geometry and generation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Level width in tiles.
    pub width: i32,
    /// Level height in tiles.
    pub height: i32,
    /// Maximum number of rooms a mutation may grow a layout to.
    pub max_rooms: usize,
    /// Minimum room width/height.
    pub min_room_extent: i32,
    /// Maximum room width/height.
    pub max_room_extent: i32,
    /// Extra random room-to-room joins per mutation.
    pub random_connections: usize,
    /// Random spur corridors per mutation.
    pub random_spurs: usize,
    /// Maximum weapon pickups placed in one level.
    pub max_weapons: usize,
    /// Maximum rooms sampled per mutation.
    pub max_new_rooms: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            max_rooms: 15,
            min_room_extent: 5,
            max_room_extent: 15,
            random_connections: 1,
            random_spurs: 3,
            max_weapons: 3,
            max_new_rooms: 2,
        }
    }
}

impl LevelConfig {
    /// Check that rooms and spur points always fit inside the level.
    ///
    /// # Errors
    ///
    /// Returns an error if the extent range is empty or the level is too
    /// small for a maximal room plus its 1-cell wall margin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_room_extent < 1 || self.min_room_extent > self.max_room_extent {
            return Err(ConfigError::InvalidExtent {
                min: self.min_room_extent,
                max: self.max_room_extent,
            });
        }
        // Spur points are drawn from [2, size - 2], so at least 4 cells.
        let needed = (self.max_room_extent + 2).max(4);
        if self.width < needed || self.height < needed {
            return Err(ConfigError::LevelTooSmall {
                width: self.width,
                height: self.height,
                max_extent: self.max_room_extent,
            });
        }
        Ok(())
    }
}

/// Coefficients of the weighted fitness sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessWeights {
    /// Weight of reachable floor over total floor.
    pub free_space: f64,
    /// Weight of the leniency (danger) score.
    pub leniency: f64,
    /// Weight of floor over level area.
    pub free_percentage: f64,
    /// Weight of decorations over level area.
    pub decoration_percentage: f64,
    /// Weight of the room-count bonus.
    pub room_count: f64,
    /// Weight of the unique-piece score.
    pub legal_pieces: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            free_space: 0.6,
            leniency: 0.5,
            free_percentage: 0.6,
            decoration_percentage: 0.5,
            room_count: 1.0,
            legal_pieces: 5.0,
        }
    }
}

/// Steady-state selection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Share of the population that breeds, and share that is replaced.
    pub steady_state_fraction: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            steady_state_fraction: 0.25,
        }
    }
}

/// Configuration for a whole evolution run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Level geometry and generation limits.
    pub level: LevelConfig,
    /// Fitness coefficients.
    pub weights: FitnessWeights,
    /// Selection parameters.
    pub selection: SelectionConfig,
    /// Upper bound on population size.
    pub population_limit: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
    /// Worker threads for fitness evaluation (default: CPU count).
    pub threads: Option<usize>,
    /// Where the best level is written after every generation.
    pub output: PathBuf,
    /// Where the best individual is saved as JSON when the run ends.
    pub snapshot: Option<PathBuf>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            weights: FitnessWeights::default(),
            selection: SelectionConfig::default(),
            population_limit: 480,
            seed: 42,
            threads: None,
            output: PathBuf::from("levels/last.txt"),
            snapshot: None,
        }
    }
}

impl EvolutionConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate every nested section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level.validate()?;
        if self.population_limit == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        let fraction = self.selection.steady_state_fraction;
        if !(fraction > 0.0 && fraction <= 0.5) {
            return Err(ConfigError::InvalidFraction(fraction));
        }
        Ok(())
    }
}
