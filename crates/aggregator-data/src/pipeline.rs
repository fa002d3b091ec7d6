//! Top-level batch pipeline: read sources, merge, clean, compute, export.
//!
//! One invocation operates on a freshly merged dataset and retains no state
//! across runs; callers in a service context can run one pipeline per
//! request without synchronisation.

use std::path::Path;

use aggregator_core::error::{AggregatorError, Result};
use aggregator_core::models::{CleaningReport, Source, StructuredReport};
use chrono::Utc;
use tracing::{info, warn};

use crate::cleaner::DataCleaner;
use crate::export::ResultExporter;
use crate::merger::RecordMerger;
use crate::reader;
use crate::stats::StatsEngine;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the pipeline result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PipelineMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Number of records in the merged dataset before cleaning.
    pub records_merged: usize,
    /// Number of provided sources that failed to load and were skipped.
    pub sources_skipped: usize,
    /// Wall-clock seconds spent reading the input files.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent cleaning and computing statistics.
    pub process_time_seconds: f64,
}

/// The complete output of [`run_pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// The canonical report for the presentation layer.
    pub report: StructuredReport,
    /// Counters from the cleaning stage.
    pub cleaning: CleaningReport,
    /// Metadata about this run.
    pub metadata: PipelineMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full batch pipeline over the given source files.
///
/// 1. Read each provided source. A source that fails to load is logged,
///    counted and skipped; the run fails with
///    [`AggregatorError::NoReadableSources`] only when every provided
///    source failed.
/// 2. Merge the surviving sources into one dataset. Zero records →
///    [`AggregatorError::EmptyDataset`].
/// 3. Clean (normalise, coerce, deduplicate, impute).
/// 4. Compute user statistics and daily rankings, and export the report.
pub fn run_pipeline(csv_path: Option<&Path>, json_path: Option<&Path>) -> Result<PipelineResult> {
    if csv_path.is_none() && json_path.is_none() {
        return Err(AggregatorError::NoInputs);
    }

    // ── Step 1: Read sources ──────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let mut sources = Vec::new();
    let mut sources_skipped = 0usize;

    if let Some(path) = csv_path {
        match reader::read_csv_rows(path) {
            Ok(rows) => {
                info!("CSV loaded: {} records", rows.len());
                sources.push((rows, Source::Csv));
            }
            Err(e) => {
                warn!("Skipping CSV source {}: {}", path.display(), e);
                sources_skipped += 1;
            }
        }
    }

    if let Some(path) = json_path {
        match reader::read_json_rows(path) {
            Ok(rows) => {
                info!("JSON loaded: {} records", rows.len());
                sources.push((rows, Source::Json));
            }
            Err(e) => {
                warn!("Skipping JSON source {}: {}", path.display(), e);
                sources_skipped += 1;
            }
        }
    }

    if sources.is_empty() {
        return Err(AggregatorError::NoReadableSources);
    }
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Merge ─────────────────────────────────────────────────────────
    let dataset = RecordMerger::merge(sources);
    if dataset.is_empty() {
        return Err(AggregatorError::EmptyDataset);
    }
    let records_merged = dataset.len();

    // ── Step 3: Clean ─────────────────────────────────────────────────────────
    let process_start = std::time::Instant::now();
    let (cleaned, cleaning) = DataCleaner::clean(dataset);
    info!(
        "Cleaned dataset: {} -> {} records, {} duplicates removed",
        cleaning.initial_count, cleaning.final_count, cleaning.duplicates_removed
    );

    // ── Step 4: Stats and export ──────────────────────────────────────────────
    let user_stats = StatsEngine::compute_user_stats(&cleaned);
    let daily_top_user = StatsEngine::compute_daily_top_user(&cleaned);
    let report = ResultExporter::export(user_stats, daily_top_user);
    let process_time = process_start.elapsed().as_secs_f64();

    let metadata = PipelineMetadata {
        generated_at: Utc::now().to_rfc3339(),
        records_merged,
        sources_skipped,
        load_time_seconds: load_time,
        process_time_seconds: process_time,
    };

    Ok(PipelineResult {
        report,
        cleaning,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
