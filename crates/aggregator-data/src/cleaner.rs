//! Data cleaning: date normalisation, numeric coercion, deduplication and
//! calorie imputation, in that order.
//!
//! Each step feeds the next, so the order is load-bearing: dates must be
//! canonical before `(date, user_id)` deduplication can collapse the same
//! day written in two formats, and imputation averages only the coerced
//! numeric values that survived deduplication.

use std::collections::HashSet;

use aggregator_core::dates::DateNormalizer;
use aggregator_core::models::{Cell, CleaningReport, Dataset, Record};
use tracing::debug;

use crate::grouping::group_records_by;

/// Runs the ordered cleaning pass over a merged dataset.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean the dataset and report what happened.
    ///
    /// 1. Normalise every date; records whose date cannot be parsed are
    ///    dropped.
    /// 2. Coerce `steps`, `calories` and `sleep_minutes` to numeric,
    ///    nulling unparseable values without dropping the record.
    /// 3. Deduplicate on `(date, user_id)`, keeping the first record in
    ///    current row order.
    /// 4. Impute missing calories: first from the user's own rounded mean,
    ///    then from the rounded global mean, else leave null.
    ///
    /// This stage never fails on malformed data; running it again on its
    /// own output yields the same records with zero duplicates removed.
    pub fn clean(dataset: Dataset) -> (Dataset, CleaningReport) {
        let Dataset { records, columns } = dataset;
        let initial_count = records.len();

        // ── Step 1: Date normalisation ────────────────────────────────────────
        let mut records: Vec<Record> = records
            .into_iter()
            .filter_map(|mut record| match DateNormalizer::normalize(&record.date) {
                Some(canonical) => {
                    record.date = Cell::Text(canonical);
                    Some(record)
                }
                None => None,
            })
            .collect();

        let dates_dropped = initial_count - records.len();
        if dates_dropped > 0 {
            debug!("Dropped {} records with unparseable dates", dates_dropped);
        }

        // ── Step 2: Numeric coercion ──────────────────────────────────────────
        for record in &mut records {
            record.steps = record.steps.coerce_numeric();
            record.calories = record.calories.coerce_numeric();
            record.sleep_minutes = record.sleep_minutes.coerce_numeric();
        }

        // ── Step 3: Deduplication ─────────────────────────────────────────────
        let before_dedup = records.len();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        records.retain(|record| {
            let date = record.date.as_text().unwrap_or_default().to_string();
            seen.insert((date, record.user_id.clone()))
        });
        let duplicates_removed = before_dedup - records.len();

        // ── Step 4: Calorie imputation ────────────────────────────────────────
        if columns.calories {
            Self::impute_calories(&mut records);
        }

        let report = CleaningReport {
            initial_count,
            final_count: records.len(),
            duplicates_removed,
        };

        (Dataset { records, columns }, report)
    }

    /// Two-tier mean imputation for missing calories.
    ///
    /// Tier 1 fills each user's nulls with that user's own mean over
    /// non-null values, rounded to the nearest integer. Tier 2 fills
    /// whatever is still null with the global mean, which at that point
    /// includes the tier-1 fills. With no calorie data anywhere, nulls
    /// stay null.
    fn impute_calories(records: &mut [Record]) {
        let groups = group_records_by(records, |r| Some(r.user_id.clone()));

        for (_, indices) in &groups {
            let values: Vec<f64> = indices
                .iter()
                .filter_map(|&i| records[i].calories.as_number())
                .collect();
            if values.is_empty() {
                continue;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            let fill = Cell::Number(mean.round());
            for &i in indices {
                if records[i].calories.is_null() {
                    records[i].calories = fill.clone();
                }
            }
        }

        let all: Vec<f64> = records
            .iter()
            .filter_map(|r| r.calories.as_number())
            .collect();
        if all.is_empty() {
            return;
        }
        let global = (all.iter().sum::<f64>() / all.len() as f64).round();
        for record in records.iter_mut() {
            if record.calories.is_null() {
                record.calories = Cell::Number(global);
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
