//! Steady-state selection.
//!
//! Each generation the top bracket of the population breeds and the bottom
//! bracket is replaced by the children; everyone in between survives as is.

// Bracket sizes and statistics use intentional casts
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::config::SelectionConfig;
use rand::Rng;

/// Which individuals survive and which pairs breed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteadyState {
    /// Indices kept unchanged, best first.
    pub survivors: Vec<usize>,
    /// `(parent, mate)` pairs. Every top-bracket index appears once as
    /// `parent`; mates are drawn from the top bracket with replacement.
    pub pairs: Vec<(usize, usize)>,
    /// Indices dropped from the population.
    pub replaced: Vec<usize>,
}

/// Size of the top and bottom brackets: `fraction` of the population, at
/// least one.
#[must_use]
pub fn bracket_size(population: usize, config: &SelectionConfig) -> usize {
    ((population as f64 * config.steady_state_fraction) as usize).max(1)
}

/// Run steady-state selection over a fitness table.
///
/// Individuals are ranked by descending fitness. When the population is so
/// small that the brackets overlap, the top bracket wins: it is never
/// discarded.
#[must_use]
pub fn select_steady_state<R: Rng + ?Sized>(
    fitness: &[f64],
    config: &SelectionConfig,
    rng: &mut R,
) -> SteadyState {
    let n = fitness.len();
    if n == 0 {
        return SteadyState {
            survivors: Vec::new(),
            pairs: Vec::new(),
            replaced: Vec::new(),
        };
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| fitness[b].total_cmp(&fitness[a]));

    let bracket = bracket_size(n, config).min(n);
    let keep = bracket.max(n - bracket);
    let top = &order[..bracket];

    let pairs = top
        .iter()
        .map(|&parent| (parent, top[rng.gen_range(0..top.len())]))
        .collect();

    SteadyState {
        survivors: order[..keep].to_vec(),
        pairs,
        replaced: order[keep..].to_vec(),
    }
}

/// Fitness statistics of a population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationStats {
    /// Mean fitness.
    pub mean_fitness: f64,
    /// Best fitness.
    pub best_fitness: f64,
    /// Worst fitness.
    pub worst_fitness: f64,
    /// Standard deviation of fitness.
    pub fitness_std: f64,
}

impl PopulationStats {
    /// Calculate statistics from fitness values.
    #[must_use]
    pub fn from_fitness(fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self {
                mean_fitness: 0.0,
                best_fitness: 0.0,
                worst_fitness: 0.0,
                fitness_std: 0.0,
            };
        }

        let mean = fitness.iter().sum::<f64>() / fitness.len() as f64;
        let best = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let variance = fitness.iter().map(|f| (f - mean).powi(2)).sum::<f64>() / fitness.len() as f64;

        Self {
            mean_fitness: mean,
            best_fitness: best,
            worst_fitness: worst,
            fitness_std: variance.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_brackets_of_twenty() {
        let mut rng = SmallRng::seed_from_u64(42);
        let fitness: Vec<f64> = (0..20).map(f64::from).collect();
        let result = select_steady_state(&fitness, &SelectionConfig::default(), &mut rng);

        // Top 5 are indices 19..=15, bottom 5 are 4..=0.
        assert_eq!(result.pairs.len(), 5);
        assert_eq!(result.survivors.len(), 15);
        assert_eq!(result.survivors[0], 19);
        let mut replaced = result.replaced.clone();
        replaced.sort_unstable();
        assert_eq!(replaced, vec![0, 1, 2, 3, 4]);
        for &(parent, mate) in &result.pairs {
            assert!(parent >= 15);
            assert!(mate >= 15);
        }
    }

    #[test]
    fn test_every_top_individual_breeds_once() {
        let mut rng = SmallRng::seed_from_u64(7);
        let fitness = vec![0.3, 0.9, 0.1, 0.8, 0.5, 0.2, 0.7, 0.6];
        let result = select_steady_state(&fitness, &SelectionConfig::default(), &mut rng);
        let mut parents: Vec<usize> = result.pairs.iter().map(|p| p.0).collect();
        parents.sort_unstable();
        assert_eq!(parents, vec![1, 3]);
    }

    #[test]
    fn test_tiny_population_keeps_top() {
        let mut rng = SmallRng::seed_from_u64(1);
        let result = select_steady_state(&[1.0], &SelectionConfig::default(), &mut rng);
        assert_eq!(result.survivors, vec![0]);
        assert_eq!(result.pairs, vec![(0, 0)]);
        assert!(result.replaced.is_empty());

        let result = select_steady_state(&[1.0, 2.0], &SelectionConfig::default(), &mut rng);
        assert_eq!(result.survivors, vec![1]);
        assert_eq!(result.replaced, vec![0]);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = SmallRng::seed_from_u64(1);
        let result = select_steady_state(&[], &SelectionConfig::default(), &mut rng);
        assert!(result.survivors.is_empty() && result.pairs.is_empty());
    }

    #[test]
    fn test_population_stats() {
        let stats = PopulationStats::from_fitness(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stats.mean_fitness - 2.5).abs() < 1e-12);
        assert!((stats.best_fitness - 4.0).abs() < f64::EPSILON);
        assert!((stats.worst_fitness - 1.0).abs() < f64::EPSILON);
        assert!((stats.fitness_std - 1.25f64.sqrt()).abs() < 1e-12);
    }
}
