//! Per-user and per-day statistics over a cleaned dataset.
//!
//! Read-only: both computations take the cleaned dataset by reference and
//! are fully deterministic given its row order.

use std::collections::BTreeMap;

use aggregator_core::dates::week_key;
use aggregator_core::models::{Cell, DailyTopUser, Dataset, Record, UserStat};

use crate::grouping::{group_records_by, group_subset_by};

/// Computes aggregate statistics from cleaned records.
pub struct StatsEngine;

impl StatsEngine {
    /// Compute per-user totals and weekly step averages.
    ///
    /// Users appear in first-appearance order. Totals are null-skipping
    /// sums truncated to integer; a column absent from every source counts
    /// as total 0. Weekly buckets are fixed 7-day chunks of the month (see
    /// [`week_key`]); each bucket maps to the truncated mean of the user's
    /// non-null steps in it. Records whose week key cannot be derived are
    /// excluded from the partition silently.
    pub fn compute_user_stats(dataset: &Dataset) -> Vec<UserStat> {
        let records = &dataset.records;
        let users = group_records_by(records, |r| Some(r.user_id.clone()));

        let mut stats = Vec::with_capacity(users.len());
        for (user_id, indices) in users {
            let total_steps =
                Self::column_total(records, &indices, dataset.columns.steps, |r| &r.steps);
            let total_calories =
                Self::column_total(records, &indices, dataset.columns.calories, |r| &r.calories);

            let mut weekly_avg_steps: BTreeMap<String, i64> = BTreeMap::new();
            let buckets =
                group_subset_by(records, &indices, |r| r.date.as_text().and_then(week_key));
            for (key, bucket) in buckets {
                let avg = if dataset.columns.steps {
                    Self::truncated_mean(records, &bucket, |r| &r.steps)
                } else {
                    0
                };
                weekly_avg_steps.insert(key, avg);
            }

            stats.push(UserStat {
                user_id,
                total_steps,
                total_calories,
                weekly_avg_steps,
            });
        }

        stats
    }

    /// Find the top stepper for each distinct date.
    ///
    /// Empty when the steps column is absent from the whole dataset.
    /// Within a date the first record holding the maximum steps wins (a
    /// strict `>` comparison preserves the first-wins tie-break); dates
    /// where every record's steps is null are omitted. Output is sorted
    /// ascending by date string, which for canonical dates is
    /// chronological.
    pub fn compute_daily_top_user(dataset: &Dataset) -> Vec<DailyTopUser> {
        if !dataset.columns.steps {
            return Vec::new();
        }

        let records = &dataset.records;
        let days = group_records_by(records, |r| r.date.as_text().map(str::to_string));

        let mut top_users: Vec<DailyTopUser> = Vec::new();
        for (date, indices) in days {
            let mut best: Option<(usize, f64)> = None;
            for &i in &indices {
                let Some(steps) = records[i].steps.as_number() else {
                    continue;
                };
                match best {
                    Some((_, top)) if steps <= top => {}
                    _ => best = Some((i, steps)),
                }
            }

            if let Some((i, steps)) = best {
                top_users.push(DailyTopUser {
                    date,
                    user_id: records[i].user_id.clone(),
                    steps: steps as i64,
                });
            }
        }

        top_users.sort_by(|a, b| a.date.cmp(&b.date));
        top_users
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Null-skipping sum over a column, truncated to integer.
    /// Absent columns total 0 rather than being an error.
    fn column_total<F>(records: &[Record], indices: &[usize], present: bool, field: F) -> i64
    where
        F: Fn(&Record) -> &Cell,
    {
        if !present {
            return 0;
        }
        let sum: f64 = indices
            .iter()
            .filter_map(|&i| field(&records[i]).as_number())
            .sum();
        sum.trunc() as i64
    }

    /// Mean of the non-null values, truncated toward zero. A group with no
    /// numeric values averages to 0.
    fn truncated_mean<F>(records: &[Record], indices: &[usize], field: F) -> i64
    where
        F: Fn(&Record) -> &Cell,
    {
        let values: Vec<f64> = indices
            .iter()
            .filter_map(|&i| field(&records[i]).as_number())
            .collect();
        if values.is_empty() {
            return 0;
        }
        (values.iter().sum::<f64>() / values.len() as f64).trunc() as i64
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
