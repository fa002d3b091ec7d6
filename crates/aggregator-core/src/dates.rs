use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::models::Cell;

// ── DateNormalizer ────────────────────────────────────────────────────────────

/// The recognised input formats, tried strictly in this order.
///
/// The order is part of the contract: a structurally ambiguous value such as
/// `03-04-2025` resolves to whichever format is tried first (here
/// day-month-year), and reordering the list changes historical output.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2025-09-01
    "%d/%m/%Y", // 01/09/2025
    "%d-%m-%Y", // 08-09-2025
    "%m-%d-%Y", // 09-08-2025
    "%Y/%m/%d", // 2025/09/01
];

/// Parses heterogeneous date values into canonical `YYYY-MM-DD` strings.
pub struct DateNormalizer;

impl DateNormalizer {
    /// Normalise a raw date cell.
    ///
    /// * `Null` → `None`.
    /// * Numbers are stringified before matching (they fail all five
    ///   formats, but the attempt mirrors how the raw table treats them).
    /// * Text is trimmed and tried against the format list above; the
    ///   first format that parses wins.
    ///
    /// Returns the canonical `YYYY-MM-DD` string, or `None` when the value
    /// matches none of the formats. Pure function.
    pub fn normalize(value: &Cell) -> Option<String> {
        let raw = match value {
            Cell::Null => return None,
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => n.to_string(),
        };

        if raw.is_empty() {
            return None;
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(&raw, fmt) {
                return Some(date.format("%Y-%m-%d").to_string());
            }
        }

        debug!("DateNormalizer: unrecognised date value \"{}\"", raw);
        None
    }
}

// ── Week keys ─────────────────────────────────────────────────────────────────

/// Derive the week-of-month bucket key for a canonical `YYYY-MM-DD` date.
///
/// Weeks here are fixed 7-day chunks of the month starting at day 1, NOT
/// ISO calendar weeks: days 1-7 are week 1, days 8-14 week 2, and so on,
/// giving four or five buckets depending on month length. Key format:
/// `{year}-{month:02}-week-{n}`.
///
/// Returns `None` when the input is not a canonical date.
pub fn week_key(date_str: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()?;
    let week = (date.day() - 1) / 7 + 1;
    Some(format!("{}-{:02}-week-{}", date.year(), date.month(), week))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
