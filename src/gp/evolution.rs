//! Main evolution loop.
//!
//! The driver alternates a serial breeding step (selection and crossover)
//! with a parallel build-and-score barrier. There is no stopping rule: the
//! loop runs until a [`CancelToken`] is set, and cancellation is only
//! observed between generations.

// Timings are reported as float milliseconds
#![allow(clippy::cast_precision_loss)]

use crate::config::EvolutionConfig;
use crate::error::EvolutionError;
use crate::gp::individual::{Individual, sort_by_fitness};
use crate::gp::persistence::{Snapshot, save_snapshot, write_level};
use crate::gp::runner::{Offspring, Runner};
use crate::gp::selection::{PopulationStats, select_steady_state};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Shared stop flag, checked at generation boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop after the current generation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Summary of one completed generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationReport {
    /// Generation number, starting at 1.
    pub generation: usize,
    /// Fitness statistics of the new population.
    pub stats: PopulationStats,
    /// Size of the new population.
    pub population: usize,
    /// Children bred this generation.
    pub children: usize,
    /// Individuals dropped by the population cap.
    pub truncated: usize,
    /// Time spent on selection and crossover.
    pub breed_time: Duration,
    /// Time spent in the parallel build-and-score barrier.
    pub evaluate_time: Duration,
}

/// Result of a cancelled run.
#[derive(Debug)]
pub struct EvolutionOutcome {
    /// Last fully evaluated population, best first.
    pub population: Vec<Individual>,
    /// Generations completed.
    pub generations: usize,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

impl EvolutionOutcome {
    /// Fittest individual of the final population.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.population.first()
    }
}

/// Evolution state between generations.
#[derive(Debug)]
pub struct Evolution {
    config: EvolutionConfig,
    runner: Runner,
    rng: SmallRng,
    population: Vec<Individual>,
    generation: usize,
}

impl Evolution {
    /// Validate the config and build the initial population.
    ///
    /// Every initial individual is the mutation of an empty room list.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the worker pool cannot be
    /// built, or any initial individual fails.
    pub fn new(config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;
        let runner = Runner::new(config.threads)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let start = Instant::now();
        let batch: Vec<Offspring> = (0..config.population_limit)
            .map(|_| Offspring {
                parent_rooms: Vec::new(),
                seed: rng.r#gen(),
            })
            .collect();
        let total = batch.len();
        let mut population = runner
            .evaluate(batch, &config.level, &config.weights)
            .map_err(|failures| EvolutionError::Batch {
                generation: 0,
                total,
                failures,
            })?;
        sort_by_fitness(&mut population);

        info!(
            population = population.len(),
            threads = runner.threads(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            "initial population evaluated"
        );

        Ok(Self {
            config,
            runner,
            rng,
            population,
            generation: 0,
        })
    }

    /// Run one generation.
    ///
    /// The top bracket breeds, the bottom bracket is replaced by the
    /// children, and the merged population is sorted and capped. If any
    /// child fails to evaluate the previous population is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EvolutionError::Batch`] if any child fails.
    pub fn step(&mut self) -> Result<GenerationReport, EvolutionError> {
        let generation = self.generation + 1;

        let breed_start = Instant::now();
        let fitness: Vec<f64> = self.population.iter().map(Individual::fitness).collect();
        let selection = select_steady_state(&fitness, &self.config.selection, &mut self.rng);
        debug!(
            generation,
            survivors = selection.survivors.len(),
            breeders = selection.pairs.len(),
            replaced = selection.replaced.len(),
            "steady state"
        );

        let batch: Vec<Offspring> = selection
            .pairs
            .iter()
            .map(|&(parent, mate)| Offspring {
                parent_rooms: self.population[parent].crossover(&self.population[mate], &mut self.rng),
                seed: self.rng.r#gen(),
            })
            .collect();
        let breed_time = breed_start.elapsed();

        let eval_start = Instant::now();
        let total = batch.len();
        let children = self
            .runner
            .evaluate(batch, &self.config.level, &self.config.weights)
            .map_err(|failures| EvolutionError::Batch {
                generation,
                total,
                failures,
            })?;
        let evaluate_time = eval_start.elapsed();

        let mut keep = vec![false; self.population.len()];
        for &idx in &selection.survivors {
            keep[idx] = true;
        }
        let child_count = children.len();
        let mut next: Vec<Individual> = std::mem::take(&mut self.population)
            .into_iter()
            .zip(keep)
            .filter_map(|(ind, kept)| kept.then_some(ind))
            .collect();
        next.extend(children);
        sort_by_fitness(&mut next);

        let truncated = next.len().saturating_sub(self.config.population_limit);
        if truncated > 0 {
            debug!(generation, truncated, "population over limit");
            next.truncate(self.config.population_limit);
        }

        self.population = next;
        self.generation = generation;

        let fitness: Vec<f64> = self.population.iter().map(Individual::fitness).collect();
        Ok(GenerationReport {
            generation,
            stats: PopulationStats::from_fitness(&fitness),
            population: self.population.len(),
            children: child_count,
            truncated,
            breed_time,
            evaluate_time,
        })
    }

    /// Fittest individual.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.population.first()
    }

    /// Current population, best first.
    #[must_use]
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Generations completed.
    #[must_use]
    pub const fn generation(&self) -> usize {
        self.generation
    }

    /// Configuration of this run.
    #[must_use]
    pub const fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Worker threads used for evaluation.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.runner.threads()
    }

    /// Take the population, best first.
    #[must_use]
    pub fn into_population(self) -> Vec<Individual> {
        self.population
    }
}

/// Run the evolution until `cancel` is set.
///
/// After every generation the best level is written to `config.output` and
/// `observer` is called with the report and the best individual. When the
/// run is cancelled the best individual is saved to `config.snapshot`, if
/// set.
///
/// # Errors
///
/// Returns an error if the config is invalid, a generation fails to
/// evaluate, or the snapshot cannot be written. A failed level write is
/// only logged.
pub fn evolve<F>(
    config: EvolutionConfig,
    cancel: &CancelToken,
    mut observer: F,
) -> Result<EvolutionOutcome, EvolutionError>
where
    F: FnMut(&GenerationReport, &Individual),
{
    let start = Instant::now();
    let mut evolution = Evolution::new(config)?;

    while !cancel.is_cancelled() {
        let report = evolution.step()?;
        info!(
            generation = report.generation,
            best = report.stats.best_fitness,
            mean = report.stats.mean_fitness,
            std = report.stats.fitness_std,
            population = report.population,
            breed_ms = report.breed_time.as_secs_f64() * 1e3,
            evaluate_ms = report.evaluate_time.as_secs_f64() * 1e3,
            "generation complete"
        );

        if let Some(best) = evolution.best() {
            let output = &evolution.config().output;
            if let Err(e) = write_level(output, best.grid()) {
                warn!(path = %output.display(), error = %e, "failed to write best level");
            }
            observer(&report, best);
        }
    }

    let generations = evolution.generation();
    let snapshot_path = evolution.config().snapshot.clone();
    let population = evolution.into_population();

    if let (Some(path), Some(best)) = (snapshot_path, population.first()) {
        save_snapshot(&Snapshot::new(best, generations), &path)
            .map_err(|source| EvolutionError::Io { path: path.clone(), source })?;
        info!(path = %path.display(), "snapshot saved");
    }

    Ok(EvolutionOutcome {
        population,
        generations,
        elapsed: start.elapsed(),
    })
}
