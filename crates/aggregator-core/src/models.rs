use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Source ────────────────────────────────────────────────────────────────────

/// Provenance tag stamped on every record during the merge.
///
/// Not business data: it records which input file a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Row originated from the delimited (CSV) source.
    Csv,
    /// Row originated from the JSON array source.
    Json,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Csv => write!(f, "csv"),
            Source::Json => write!(f, "json"),
        }
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One tabular field value as it moves through the pipeline.
///
/// Raw input values from either reader land here unchanged; the cleaning
/// stage coerces `Text` that parses numerically into `Number` and everything
/// else non-numeric into `Null`. Because cleaned cells are themselves valid
/// inputs, `clean` can be re-run on its own output without changing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Missing / unparseable value.
    Null,
    /// A numeric value.
    Number(f64),
    /// A raw string value.
    Text(String),
}

impl Cell {
    /// Convert a raw [`serde_json::Value`] into a cell.
    ///
    /// Booleans are carried as text (they will coerce to null later);
    /// arrays and objects are not tabular values and become null.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Null,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => Cell::Number(f),
                None => Cell::Null,
            },
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            serde_json::Value::Bool(b) => Cell::Text(b.to_string()),
            _ => Cell::Null,
        }
    }

    /// `true` when the cell holds no value.
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// The numeric value, if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text value, if this cell holds one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce the cell to numeric.
    ///
    /// Text that parses as a number becomes `Number`; any other text becomes
    /// `Null`. Numbers and nulls pass through unchanged, so coercion is
    /// idempotent.
    pub fn coerce_numeric(&self) -> Cell {
        match self {
            Cell::Number(n) => Cell::Number(*n),
            Cell::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => Cell::Number(n),
                Err(_) => Cell::Null,
            },
            Cell::Null => Cell::Null,
        }
    }
}

// ── Record / Dataset ──────────────────────────────────────────────────────────

/// One fitness observation: a single row of the merged table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Raw date value before cleaning; canonical `YYYY-MM-DD` text after.
    pub date: Cell,
    /// User identifier. A missing input field becomes the empty string,
    /// which then forms its own group downstream.
    pub user_id: String,
    /// Step count for the day.
    pub steps: Cell,
    /// Calories burned. May be filled by imputation during cleaning.
    pub calories: Cell,
    /// Minutes slept.
    pub sleep_minutes: Cell,
    /// Which input file this row came from.
    pub source: Source,
}

/// Which of the three numeric columns appeared in any merged source.
///
/// Mirrors column-presence checks on the original tabular data: a column
/// that no source carried is treated as "total 0" by the stats engine and
/// skipped by imputation, rather than being an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnSet {
    pub steps: bool,
    pub calories: bool,
    pub sleep_minutes: bool,
}

impl ColumnSet {
    /// Record that `key` was present as a column in some source row.
    pub fn observe(&mut self, key: &str) {
        match key {
            "steps" => self.steps = true,
            "calories" => self.calories = true,
            "sleep_minutes" => self.sleep_minutes = true,
            _ => {}
        }
    }
}

/// The unified table produced by the merge and mutated by cleaning.
///
/// Row order is stable: source order, then original row order within each
/// source. All downstream tie-breaks depend on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub columns: ColumnSet,
}

impl Dataset {
    /// Number of records currently in the table.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Derived outputs ───────────────────────────────────────────────────────────

/// Aggregate statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStat {
    pub user_id: String,
    /// Sum of the user's steps, 0 when the column is absent.
    pub total_steps: i64,
    /// Sum of the user's calories, 0 when the column is absent.
    pub total_calories: i64,
    /// Average steps per week-of-month bucket, keyed by
    /// `{year}-{month:02}-week-{n}` and truncated to integer.
    pub weekly_avg_steps: BTreeMap<String, i64>,
}

/// The user with the highest step count on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTopUser {
    /// Canonical `YYYY-MM-DD` date.
    pub date: String,
    pub user_id: String,
    pub steps: i64,
}

/// Counters surfaced by the cleaning stage for observability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Records present before date normalisation.
    pub initial_count: usize,
    /// Records remaining after all cleaning steps.
    pub final_count: usize,
    /// Records discarded by `(date, user_id)` deduplication.
    pub duplicates_removed: usize,
}

/// The canonical JSON-serialisable report consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub user_stats: Vec<UserStat>,
    pub daily_top_user: Vec<DailyTopUser>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
