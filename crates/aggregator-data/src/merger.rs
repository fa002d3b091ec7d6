//! Merging of raw source rows into one provenance-tagged dataset.

use aggregator_core::models::{Cell, ColumnSet, Dataset, Record, Source};
use serde_json::Value;
use tracing::debug;

use crate::reader::RawRow;

/// Combines rows from multiple sources into one unified [`Dataset`].
pub struct RecordMerger;

impl RecordMerger {
    /// Concatenate all source tables into one dataset.
    ///
    /// Row order is source order, then original row order within each
    /// source. Every record is stamped with its origin tag; fields a source
    /// did not carry become null. Column presence is the union over all
    /// rows of all sources, so a column that only one source carried still
    /// counts as present.
    pub fn merge(sources: Vec<(Vec<RawRow>, Source)>) -> Dataset {
        let mut records: Vec<Record> = Vec::new();
        let mut columns = ColumnSet::default();

        for (rows, source) in sources {
            debug!("Merging {} rows from {} source", rows.len(), source);
            for row in rows {
                for key in row.keys() {
                    columns.observe(key);
                }
                records.push(Self::to_record(&row, source));
            }
        }

        Dataset { records, columns }
    }

    fn to_record(row: &RawRow, source: Source) -> Record {
        Record {
            date: Self::cell(row, "date"),
            user_id: Self::string(row, "user_id"),
            steps: Self::cell(row, "steps"),
            calories: Self::cell(row, "calories"),
            sleep_minutes: Self::cell(row, "sleep_minutes"),
            source,
        }
    }

    fn cell(row: &RawRow, key: &str) -> Cell {
        row.get(key).map(Cell::from_value).unwrap_or(Cell::Null)
    }

    /// Read a required string field. Missing or null values become the
    /// empty string; numeric identifiers are stringified.
    fn string(row: &RawRow, key: &str) -> String {
        match row.get(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_merge_concatenates_in_source_order() {
        let csv_rows = vec![
            row(&[
                ("date", Value::from("2025-09-01")),
                ("user_id", Value::from("u1")),
            ]),
            row(&[
                ("date", Value::from("2025-09-02")),
                ("user_id", Value::from("u2")),
            ]),
        ];
        let json_rows = vec![row(&[
            ("date", Value::from("2025-09-03")),
            ("user_id", Value::from("u3")),
        ])];

        let dataset = RecordMerger::merge(vec![
            (csv_rows, Source::Csv),
            (json_rows, Source::Json),
        ]);

        assert_eq!(dataset.len(), 3);
        let users: Vec<&str> = dataset
            .records
            .iter()
            .map(|r| r.user_id.as_str())
            .collect();
        assert_eq!(users, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_merge_stamps_provenance() {
        let dataset = RecordMerger::merge(vec![
            (vec![row(&[("user_id", Value::from("a"))])], Source::Csv),
            (vec![row(&[("user_id", Value::from("b"))])], Source::Json),
        ]);

        assert_eq!(dataset.records[0].source, Source::Csv);
        assert_eq!(dataset.records[1].source, Source::Json);
    }

    #[test]
    fn test_merge_missing_fields_become_null() {
        let dataset = RecordMerger::merge(vec![(
            vec![row(&[
                ("date", Value::from("2025-09-01")),
                ("user_id", Value::from("u1")),
            ])],
            Source::Json,
        )]);

        let record = &dataset.records[0];
        assert!(record.steps.is_null());
        assert!(record.calories.is_null());
        assert!(record.sleep_minutes.is_null());
    }

    #[test]
    fn test_merge_missing_user_id_becomes_empty() {
        let dataset = RecordMerger::merge(vec![(
            vec![row(&[("date", Value::from("2025-09-01"))])],
            Source::Csv,
        )]);
        assert_eq!(dataset.records[0].user_id, "");
    }

    #[test]
    fn test_merge_numeric_user_id_stringified() {
        let dataset = RecordMerger::merge(vec![(
            vec![row(&[("user_id", Value::from(42))])],
            Source::Json,
        )]);
        assert_eq!(dataset.records[0].user_id, "42");
    }

    #[test]
    fn test_merge_column_union_across_sources() {
        let csv_rows = vec![row(&[
            ("date", Value::from("2025-09-01")),
            ("user_id", Value::from("u1")),
            ("steps", Value::from("1000")),
        ])];
        let json_rows = vec![row(&[
            ("date", Value::from("2025-09-01")),
            ("user_id", Value::from("u2")),
            ("calories", Value::from(300)),
        ])];

        let dataset = RecordMerger::merge(vec![
            (csv_rows, Source::Csv),
            (json_rows, Source::Json),
        ]);

        assert!(dataset.columns.steps);
        assert!(dataset.columns.calories);
        assert!(!dataset.columns.sleep_minutes);
    }

    #[test]
    fn test_merge_extra_columns_ignored() {
        let dataset = RecordMerger::merge(vec![(
            vec![row(&[
                ("user_id", Value::from("u1")),
                ("heart_rate", Value::from(70)),
            ])],
            Source::Csv,
        )]);

        assert_eq!(dataset.len(), 1);
        assert!(!dataset.columns.steps);
    }

    #[test]
    fn test_merge_no_sources_is_empty() {
        let dataset = RecordMerger::merge(vec![]);
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns, ColumnSet::default());
    }

    #[test]
    fn test_merge_keeps_raw_values_untouched() {
        // Coercion belongs to the cleaner; the merger must not interpret.
        let dataset = RecordMerger::merge(vec![(
            vec![row(&[
                ("user_id", Value::from("u1")),
                ("steps", Value::from("1000")),
                ("calories", Value::from(250.5)),
            ])],
            Source::Csv,
        )]);

        let record = &dataset.records[0];
        assert_eq!(record.steps, Cell::Text("1000".to_string()));
        assert_eq!(record.calories, Cell::Number(250.5));
    }
}
