//! Error types for level generation and evolution.

use std::path::PathBuf;

/// Invalid tuning or an unreadable configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Room extents are zero or inverted.
    #[error("invalid room extent range {min}..={max}")]
    InvalidExtent {
        /// Minimum room width/height.
        min: i32,
        /// Maximum room width/height.
        max: i32,
    },
    /// The level cannot hold a maximal room with its wall margin.
    #[error("level {width}x{height} is too small for rooms up to {max_extent} cells")]
    LevelTooSmall {
        /// Configured level width.
        width: i32,
        /// Configured level height.
        height: i32,
        /// Configured maximum room extent.
        max_extent: i32,
    },
    /// Population limit of zero.
    #[error("population limit must be at least 1")]
    EmptyPopulation,
    /// Steady-state fraction outside (0, 0.5].
    #[error("steady-state fraction {0} must lie in (0, 0.5]")]
    InvalidFraction(f64),
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Config file is not valid JSON for the config schema.
    #[error("failed to parse config {path}: {source}")]
    Json {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Failure to parse the level text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Input held no rows.
    #[error("level text is empty")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
    /// A character outside the tile alphabet.
    #[error("unknown tile symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        col: usize,
    },
}

/// A rasterizer write landed outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tile write at ({x}, {y}) is outside the {width}x{height} level")]
pub struct RasterError {
    /// Column of the write.
    pub x: i32,
    /// Row of the write.
    pub y: i32,
    /// Level width.
    pub width: usize,
    /// Level height.
    pub height: usize,
}

/// One individual failed to build or score.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// Rasterization rejected the layout.
    #[error("individual {index}: {source}")]
    Raster {
        /// Position of the individual in its batch.
        index: usize,
        /// The failed write.
        source: RasterError,
    },
    /// The worker panicked while building or scoring.
    #[error("individual {index} panicked: {message}")]
    Panicked {
        /// Position of the individual in its batch.
        index: usize,
        /// Panic payload, if it was a string.
        message: String,
    },
}

impl EvaluationError {
    /// Batch position of the failed individual.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Raster { index, .. } | Self::Panicked { index, .. } => *index,
        }
    }
}

/// Error during evolution.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// Configuration rejected before the run started.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Some individuals in a generation failed; the generation was discarded.
    #[error("generation {generation}: {} of {total} individuals failed to evaluate", failures.len())]
    Batch {
        /// Generation whose batch failed (0 is the initial population).
        generation: usize,
        /// Batch size.
        total: usize,
        /// Every failure in the batch.
        failures: Vec<EvaluationError>,
    },
    /// Writing a level or snapshot failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_message_counts_failures() {
        let err = EvolutionError::Batch {
            generation: 3,
            total: 10,
            failures: vec![
                EvaluationError::Panicked {
                    index: 1,
                    message: "boom".to_string(),
                },
                EvaluationError::Raster {
                    index: 4,
                    source: RasterError {
                        x: -1,
                        y: 0,
                        width: 8,
                        height: 8,
                    },
                },
            ],
        };
        let text = err.to_string();
        assert!(text.contains("generation 3"));
        assert!(text.contains("2 of 10"));
    }

    #[test]
    fn test_grid_error_is_copy() {
        let err = GridError::UnknownSymbol {
            symbol: 'x',
            row: 1,
            col: 3,
        };
        let copied = err;
        assert_eq!(err, copied);
        assert_eq!(err.to_string(), "unknown tile symbol 'x' at row 1, column 3");
    }

    #[test]
    fn test_evaluation_error_index() {
        let err = EvaluationError::Panicked {
            index: 7,
            message: String::new(),
        };
        assert_eq!(err.index(), 7);
    }
}
