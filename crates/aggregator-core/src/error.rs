use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the fitness aggregator.
///
/// Field-level problems (unparseable dates, non-numeric cells) never appear
/// here: the cleaning stage absorbs them and surfaces counts in the
/// [`CleaningReport`](crate::models::CleaningReport) instead. Only structural
/// failures reach the caller.
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// A source file could not be opened or read from disk.
    #[error("Failed to read source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file was read but is not a table of records.
    #[error("Source {path} is not tabular: {detail}")]
    SourceShape { path: PathBuf, detail: String },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A CSV document could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// The caller provided neither a CSV nor a JSON source.
    #[error("No input sources were provided")]
    NoInputs,

    /// Every provided source failed to load.
    #[error("None of the provided sources could be read")]
    NoReadableSources,

    /// The merge produced zero records; there is nothing to process.
    #[error("No records to process after merging")]
    EmptyDataset,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the aggregator crates.
pub type Result<T> = std::result::Result<T, AggregatorError>;
