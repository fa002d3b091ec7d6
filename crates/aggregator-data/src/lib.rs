//! Data ingestion and aggregation pipeline for the fitness aggregator.
//!
//! Responsible for reading the CSV and JSON sources, merging them into one
//! provenance-tagged dataset, cleaning it (date normalisation, numeric
//! coercion, deduplication, calorie imputation) and computing the per-user
//! and per-day statistics consumed by the report exporter.

pub mod cleaner;
pub mod export;
pub mod grouping;
pub mod merger;
pub mod pipeline;
pub mod reader;
pub mod stats;

pub use aggregator_core as core;
