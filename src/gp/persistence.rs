//! Level files and snapshots.
//!
//! The level file is the plain-text grid the game reads: one line per row,
//! one symbol per tile. Snapshots are JSON and carry enough to re-score a
//! level later.

use crate::error::GridError;
use crate::gp::fitness::LevelMetrics;
use crate::gp::individual::Individual;
use crate::level::{Grid, Room};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Best individual of a run, in a form that survives the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Generations completed when the snapshot was taken.
    pub generation: usize,
    /// Fitness of the individual.
    pub fitness: f64,
    /// Metrics behind the fitness.
    pub metrics: Option<LevelMetrics>,
    /// Room list.
    pub rooms: Vec<Room>,
    /// The level in its text format.
    pub level: String,
}

impl Snapshot {
    /// Capture an individual.
    #[must_use]
    pub fn new(individual: &Individual, generation: usize) -> Self {
        Self {
            generation,
            fitness: individual.fitness(),
            metrics: individual.metrics().copied(),
            rooms: individual.rooms().to_vec(),
            level: individual.grid().to_text(),
        }
    }

    /// Parse the stored level.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text is not a valid level.
    pub fn grid(&self) -> Result<Grid, GridError> {
        self.level.parse()
    }
}

fn create_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

/// Write a level file, replacing any previous one.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write_level(path: &Path, grid: &Grid) -> io::Result<()> {
    create_parent(path)?;
    fs::write(path, grid.to_text())
}

/// Read a level file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or `InvalidData` if it is
/// not a rectangular grid of known symbols.
pub fn read_level(path: &Path) -> io::Result<Grid> {
    let text = fs::read_to_string(path)?;
    text.parse()
        .map_err(|e: GridError| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Save a snapshot as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or file I/O fails.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    create_parent(path)?;
    fs::write(path, json)
}

/// Load a snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a snapshot.
pub fn load_snapshot(path: &Path) -> io::Result<Snapshot> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
