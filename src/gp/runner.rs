//! Parallel build-and-score of a generation.
//!
//! Every task is independent: it owns its parent room list and its own RNG,
//! and returns a finished [`Individual`]. [`Runner::evaluate`] is the
//! barrier the driver waits on between generations.

use crate::config::{FitnessWeights, LevelConfig};
use crate::error::{EvaluationError, RasterError};
use crate::gp::individual::Individual;
use crate::gp::mutation::mutate;
use crate::level::Room;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// Blueprint for one new individual.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offspring {
    /// Room list the mutation starts from; empty for the initial population.
    pub parent_rooms: Vec<Room>,
    /// Seed for the task's private RNG.
    pub seed: u64,
}

/// Fixed-size worker pool.
#[derive(Debug)]
pub struct Runner {
    pool: ThreadPool,
}

impl Runner {
    /// Build a pool with `threads` workers, or one per CPU.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created.
    pub fn new(threads: Option<usize>) -> Result<Self, ThreadPoolBuildError> {
        let mut builder = ThreadPoolBuilder::new().thread_name(|i| format!("gendun-worker-{i}"));
        if let Some(threads) = threads {
            builder = builder.num_threads(threads);
        }
        Ok(Self {
            pool: builder.build()?,
        })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Mutate and score every blueprint.
    ///
    /// # Errors
    ///
    /// Returns every failure if any task failed; the successful results of
    /// that batch are discarded.
    pub fn evaluate(
        &self,
        batch: Vec<Offspring>,
        level: &LevelConfig,
        weights: &FitnessWeights,
    ) -> Result<Vec<Individual>, Vec<EvaluationError>> {
        self.run(batch, |offspring| {
            let mut rng = SmallRng::seed_from_u64(offspring.seed);
            mutate(&offspring.parent_rooms, level, weights, &mut rng)
        })
    }

    /// Run `task` over a batch and wait for all of it.
    ///
    /// Results come back in input order. A task that panics is reported as
    /// [`EvaluationError::Panicked`] without affecting the others.
    ///
    /// # Errors
    ///
    /// Returns every failure if any task failed.
    pub fn run<T, U, F>(&self, batch: Vec<T>, task: F) -> Result<Vec<U>, Vec<EvaluationError>>
    where
        T: Send,
        U: Send,
        F: Fn(T) -> Result<U, RasterError> + Sync,
    {
        let results: Vec<Result<U, EvaluationError>> = self.pool.install(|| {
            batch
                .into_par_iter()
                .enumerate()
                .map(|(index, item)| isolate(index, || task(item)))
                .collect()
        });

        let mut done = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(value) => done.push(value),
                Err(e) => {
                    warn!(index = e.index(), error = %e, "evaluation failed");
                    failures.push(e);
                }
            }
        }

        if failures.is_empty() { Ok(done) } else { Err(failures) }
    }
}

fn isolate<U>(index: usize, f: impl FnOnce() -> Result<U, RasterError>) -> Result<U, EvaluationError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(EvaluationError::Raster { index, source }),
        Err(payload) => Err(EvaluationError::Panicked {
            index,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blueprints(n: u64) -> Vec<Offspring> {
        (0..n)
            .map(|seed| Offspring {
                parent_rooms: Vec::new(),
                seed,
            })
            .collect()
    }

    #[test]
    fn test_thread_count() {
        let runner = Runner::new(Some(3)).unwrap();
        assert_eq!(runner.threads(), 3);
    }

    #[test]
    fn test_evaluate_preserves_order_and_is_deterministic() {
        let level = LevelConfig::default();
        let weights = FitnessWeights::default();
        let one = Runner::new(Some(1)).unwrap();
        let four = Runner::new(Some(4)).unwrap();

        let a = one.evaluate(blueprints(16), &level, &weights).unwrap();
        let b = four.evaluate(blueprints(16), &level, &weights).unwrap();
        assert_eq!(a, b);

        let mut rng = SmallRng::seed_from_u64(5);
        let direct = mutate(&[], &level, &weights, &mut rng).unwrap();
        assert_eq!(a[5], direct);
    }

    #[test]
    fn test_failures_are_isolated_and_all_reported() {
        let runner = Runner::new(Some(2)).unwrap();
        let batch: Vec<u32> = (0..10).collect();
        let result = runner.run(batch, |i| match i {
            3 => panic!("task {i} exploded"),
            7 => Err(RasterError {
                x: -1,
                y: 0,
                width: 4,
                height: 4,
            }),
            _ => Ok(i * 2),
        });

        let mut failures = result.unwrap_err();
        failures.sort_by_key(EvaluationError::index);
        assert_eq!(failures.len(), 2);
        assert!(
            matches!(&failures[0], EvaluationError::Panicked { index: 3, message } if message == "task 3 exploded")
        );
        assert!(matches!(failures[1], EvaluationError::Raster { index: 7, .. }));
    }

    #[test]
    fn test_run_success() {
        let runner = Runner::new(Some(2)).unwrap();
        let out = runner.run((0..100u32).collect(), |i| Ok(i + 1)).unwrap();
        assert_eq!(out, (1..=100).collect::<Vec<_>>());
    }
}
