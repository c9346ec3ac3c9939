//! CLI command for evolving levels.

#![allow(clippy::needless_pass_by_value)]

use crate::cli::CliError;
use crate::cli::output::format_outcome;
use gendun::EvolutionConfig;
use gendun::gp::{CancelToken, evolve};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) population: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) threads: Option<usize>,
    pub(crate) output: Option<PathBuf>,
    pub(crate) snapshot: Option<PathBuf>,
    pub(crate) width: Option<i32>,
    pub(crate) height: Option<i32>,
}

impl Overrides {
    /// Apply every flag that was given. Without a config file and without
    /// `--seed`, the seed comes from the clock.
    fn apply(self, config: &mut EvolutionConfig, from_file: bool) {
        if let Some(population) = self.population {
            config.population_limit = population;
        }
        match self.seed {
            Some(seed) => config.seed = seed,
            None if !from_file => config.seed = clock_seed(),
            None => {}
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.snapshot.is_some() {
            config.snapshot = self.snapshot;
        }
        if let Some(width) = self.width {
            config.level.width = width;
        }
        if let Some(height) = self.height {
            config.level.height = height;
        }
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(42)
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Execute the evolve command.
pub(crate) fn execute(
    config_path: Option<PathBuf>,
    overrides: Overrides,
    progress: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut config = match &config_path {
        Some(path) => EvolutionConfig::from_json_file(path)?,
        None => EvolutionConfig::default(),
    };
    overrides.apply(&mut config, config_path.is_some());
    config.validate()?;

    let cancel = CancelToken::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || handler.cancel())?;

    let output = config.output.clone();
    if !quiet {
        println!("Starting evolution:");
        println!("  Population: {}", config.population_limit);
        println!("  Level: {}x{}", config.level.width, config.level.height);
        println!("  Seed: {}", config.seed);
        println!("  Output: {}", output.display());
        println!("  Press Ctrl+C to stop");
        println!();
    }

    let pb = progress.then(spinner);
    let outcome = evolve(config, &cancel, |report, _best| {
        if let Some(pb) = &pb {
            pb.set_message(format!(
                "gen {} | best {:.4} | mean {:.4}",
                report.generation, report.stats.best_fitness, report.stats.mean_fitness
            ));
        }
    });
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    print!("{}", format_outcome(&outcome?, &output));
    Ok(())
}
