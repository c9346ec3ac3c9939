//! Genetic algorithm over dungeon layouts.
//!
//! An individual is a room list plus the corridors and grid derived from
//! it. Each generation the fittest quarter breeds, the weakest quarter is
//! replaced, and the children are built and scored in parallel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Evolution Loop              │
//! ├─────────────────────────────────────┤
//! │  Selection │ Crossover (serial)     │
//! ├─────────────────────────────────────┤
//! │  Runner: Mutation + Fitness (pool)  │
//! ├─────────────────────────────────────┤
//! │  Level: rooms → corridors → grid    │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use gendun::gp::{CancelToken, evolve};
//! use gendun::EvolutionConfig;
//!
//! let cancel = CancelToken::new();
//! let outcome = evolve(EvolutionConfig::default(), &cancel, |_, _| {})?;
//! println!("best: {:?}", outcome.best().map(|b| b.fitness()));
//! # Ok::<(), gendun::EvolutionError>(())
//! ```

mod crossover;
mod evolution;
mod fitness;
mod individual;
mod mutation;
mod persistence;
mod runner;
mod selection;

pub use crossover::crossover;
pub use evolution::{CancelToken, Evolution, EvolutionOutcome, GenerationReport, evolve};
pub use fitness::{LevelMetrics, evaluate, legal_pieces, reachable_floor};
pub use individual::{Individual, sort_by_fitness};
pub use mutation::{grow_rooms, mutate, route};
pub use persistence::{Snapshot, load_snapshot, read_level, save_snapshot, write_level};
pub use runner::{Offspring, Runner};
pub use selection::{PopulationStats, SteadyState, bracket_size, select_steady_state};
