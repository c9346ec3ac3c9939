//! One candidate dungeon.

use crate::config::{FitnessWeights, LevelConfig};
use crate::error::RasterError;
use crate::gp::crossover::crossover;
use crate::gp::fitness::LevelMetrics;
use crate::gp::mutation::mutate;
use crate::level::{Corridor, Grid, Room};
use rand::Rng;

/// A room list together with the corridors and grid derived from it.
///
/// Fitness is computed when the individual is built and never changes
/// afterwards; a new room list always means a new individual.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    rooms: Vec<Room>,
    corridors: Vec<Corridor>,
    grid: Grid,
    metrics: Option<LevelMetrics>,
    fitness: f64,
}

impl Individual {
    /// Score a rasterized layout.
    ///
    /// An empty room list gets fitness 0 and no metrics.
    #[must_use]
    pub fn new(
        rooms: Vec<Room>,
        corridors: Vec<Corridor>,
        grid: Grid,
        level: &LevelConfig,
        weights: &FitnessWeights,
    ) -> Self {
        let metrics = (!rooms.is_empty()).then(|| LevelMetrics::measure(&grid, &rooms, level));
        let fitness = metrics.map_or(0.0, |m| m.score(weights));
        Self {
            rooms,
            corridors,
            grid,
            metrics,
            fitness,
        }
    }

    /// Rooms, in the order they were added.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Corridors routed for this layout.
    #[must_use]
    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// The rasterized level.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Metrics behind the fitness, if there are any rooms.
    #[must_use]
    pub const fn metrics(&self) -> Option<&LevelMetrics> {
        self.metrics.as_ref()
    }

    /// Weighted fitness.
    #[must_use]
    pub const fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Room list a child of `self` and `other` starts from.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Vec<Room> {
        crossover(&self.rooms, &other.rooms, rng)
    }

    /// Breed a child: crossover with `other`, then mutate.
    ///
    /// # Errors
    ///
    /// Returns an error if the child layout cannot be rasterized.
    pub fn generate_children<R: Rng + ?Sized>(
        &self,
        other: &Self,
        level: &LevelConfig,
        weights: &FitnessWeights,
        rng: &mut R,
    ) -> Result<Self, RasterError> {
        let rooms = self.crossover(other, rng);
        mutate(&rooms, level, weights, rng)
    }
}

/// Sort individuals by descending fitness. Ties keep their order.
pub fn sort_by_fitness(population: &mut [Individual]) {
    population.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}
