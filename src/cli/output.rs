//! Output formatting utilities for CLI.

use gendun::gp::{EvolutionOutcome, LevelMetrics};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// JSON-serializable metrics report.
#[derive(Debug, Serialize)]
pub(super) struct JsonMetrics {
    /// Level file that was scored.
    pub(super) level: String,
    /// Level width.
    pub(super) width: usize,
    /// Level height.
    pub(super) height: usize,
    /// Weighted fitness.
    pub(super) fitness: f64,
    /// Every metric.
    #[serde(flatten)]
    pub(super) metrics: LevelMetrics,
}

/// Format level metrics as human-readable text.
pub(super) fn format_metrics(path: &Path, m: &LevelMetrics, fitness: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Level: {}", path.display());
    let _ = writeln!(out, "  Fitness:          {fitness:.4}");
    let _ = writeln!(out, "  Free space:       {:.4} ({} of {} floor reachable)", m.free_space, m.reachable, m.floor);
    let _ = writeln!(out, "  Free percentage:  {:.4}", m.free_percentage);
    let _ = writeln!(out, "  Decoration:       {:.4}", m.decoration_percentage);
    let _ = writeln!(out, "  Leniency:         {:.1}", m.leniency);
    let _ = writeln!(out, "  Legal pieces:     {:.0}", m.legal_pieces);
    let _ = writeln!(out, "  Room count:       {:.4} ({} rooms)", m.room_count, m.rooms);
    let _ = writeln!(
        out,
        "  Tiles: {} enemies, {} items, {} traps, {} doors, {} player, {} boss, {} key",
        m.enemies, m.items, m.traps, m.doors, m.players, m.bosses, m.keys
    );
    out
}

/// Format the end-of-run summary.
pub(super) fn format_outcome(outcome: &EvolutionOutcome, output: &Path) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "Evolution stopped.");
    match outcome.best() {
        Some(best) => {
            let _ = writeln!(out, "  Best fitness: {:.4}", best.fitness());
            let _ = writeln!(out, "  Rooms: {}", best.rooms().len());
        }
        None => {
            let _ = writeln!(out, "  Population is empty");
        }
    }
    let _ = writeln!(out, "  Generations: {}", outcome.generations);
    let _ = writeln!(out, "  Elapsed time: {:.1}s", outcome.elapsed.as_secs_f64());
    if outcome.generations > 0 {
        let _ = writeln!(out, "  Best level: {}", output.display());
    }
    out
}
