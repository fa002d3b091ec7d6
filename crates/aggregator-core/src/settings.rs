use clap::Parser;
use std::path::PathBuf;

use crate::error::{AggregatorError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Batch aggregation of per-user fitness records
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fitness-aggregator",
    about = "Merge, clean and aggregate per-user fitness records from CSV and JSON sources",
    version
)]
pub struct Settings {
    /// CSV input file (header row: date, user_id, steps, calories, sleep_minutes)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// JSON input file (array of record objects with the same field set)
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the JSON report to this path instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,
}

impl Settings {
    /// Validate cross-flag constraints that clap cannot express.
    ///
    /// At least one of `--csv` / `--json` must be given; absence of one
    /// source is valid when the other is present.
    pub fn validate(&self) -> Result<()> {
        if self.csv.is_none() && self.json.is_none() {
            return Err(AggregatorError::NoInputs);
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
