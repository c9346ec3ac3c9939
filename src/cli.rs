//! CLI command implementations for Gendun.

pub(crate) mod evolve;
pub(crate) mod metrics;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format for the `metrics` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gendun::ConfigError> for CliError {
    fn from(e: gendun::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<gendun::EvolutionError> for CliError {
    fn from(e: gendun::EvolutionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {e}"))
    }
}

impl From<ctrlc::Error> for CliError {
    fn from(e: ctrlc::Error) -> Self {
        Self::new(format!("failed to install Ctrl-C handler: {e}"))
    }
}
