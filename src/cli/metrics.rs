//! CLI command for scoring an existing level file.

#![allow(clippy::needless_pass_by_value)]

use crate::cli::output::{JsonMetrics, format_metrics};
use crate::cli::{CliError, OutputFormat};
use gendun::EvolutionConfig;
use gendun::gp::{LevelMetrics, load_snapshot, read_level};
use std::path::PathBuf;

/// Execute the metrics command.
pub(crate) fn execute(
    level: PathBuf,
    snapshot: Option<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let config = match config {
        Some(path) => EvolutionConfig::from_json_file(&path)?,
        None => EvolutionConfig::default(),
    };

    let grid = read_level(&level)
        .map_err(|e| CliError::new(format!("{}: {e}", level.display())))?;
    let rooms = match snapshot {
        Some(path) => load_snapshot(&path)
            .map_err(|e| CliError::new(format!("{}: {e}", path.display())))?
            .rooms,
        None => Vec::new(),
    };

    let metrics = LevelMetrics::measure(&grid, &rooms, &config.level);
    let fitness = metrics.score(&config.weights);

    match format {
        OutputFormat::Text => print!("{}", format_metrics(&level, &metrics, fitness)),
        OutputFormat::Json => {
            let report = JsonMetrics {
                level: level.display().to_string(),
                width: grid.width(),
                height: grid.height(),
                fitness,
                metrics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
