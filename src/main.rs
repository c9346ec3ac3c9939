//! Gendun CLI: evolve dungeon levels and inspect level files.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gendun - evolve dungeon levels with a genetic algorithm
#[derive(Parser, Debug)]
#[command(name = "gendun")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve levels until interrupted with Ctrl-C
    Evolve {
        /// JSON config file (missing fields use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Population cap (default: 480)
        #[arg(short, long)]
        population: Option<usize>,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Worker threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Where the best level is written every generation
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Save the best individual as JSON when the run ends
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Level width in tiles
        #[arg(long)]
        width: Option<i32>,

        /// Level height in tiles
        #[arg(long)]
        height: Option<i32>,

        /// Show a progress spinner
        #[arg(long)]
        progress: bool,

        /// Only log warnings and errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the metrics and fitness of a level file
    Metrics {
        /// Level file
        #[arg(required = true)]
        level: PathBuf,

        /// Snapshot holding the level's room list
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// JSON config file with level size and fitness weights
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Commands::Evolve {
            config,
            population,
            seed,
            threads,
            output,
            snapshot,
            width,
            height,
            progress,
            quiet,
        } => {
            init_tracing(quiet);
            let overrides = cli::evolve::Overrides {
                population,
                seed,
                threads,
                output,
                snapshot,
                width,
                height,
            };
            cli::evolve::execute(config, overrides, progress, quiet)
        }

        Commands::Metrics {
            level,
            snapshot,
            config,
            format,
        } => {
            init_tracing(true);
            cli::metrics::execute(level, snapshot, config, format)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
