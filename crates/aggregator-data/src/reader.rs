//! File readers for the two supported input sources.
//!
//! Converts a delimited file with a header row, or a JSON array of objects,
//! into uniform [`RawRow`] maps for the merger. Row-level problems are
//! skipped with a warning; only structural unreadability is an error.

use std::path::Path;

use aggregator_core::error::{AggregatorError, Result};
use serde_json::Value;
use tracing::{debug, warn};

/// One raw input row: field name → raw JSON value.
///
/// CSV fields arrive as strings (empty cell → null); JSON fields keep
/// whatever scalar type the document carried.
pub type RawRow = serde_json::Map<String, Value>;

// ── CSV ───────────────────────────────────────────────────────────────────────

/// Read a delimited file with a header row into raw rows.
///
/// Every field is carried as text; numeric coercion happens later in the
/// cleaning stage. Extra columns are kept in the row (the merger ignores
/// them). Rows that fail to parse are skipped with a warning rather than
/// failing the whole source.
pub fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).map_err(|e| AggregatorError::SourceRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(AggregatorError::SourceShape {
            path: path.to_path_buf(),
            detail: "missing header row".to_string(),
        });
    }

    let mut rows: Vec<RawRow> = Vec::new();
    let mut rows_skipped = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                // +2: records() starts after the header and lines are 1-based.
                warn!(
                    "Skipping row {} of {}: {}",
                    idx + 2,
                    path.display(),
                    e
                );
                rows_skipped += 1;
                continue;
            }
        };

        let mut row = RawRow::new();
        for (col, header) in headers.iter().enumerate() {
            let field = record.get(col).unwrap_or("");
            let value = if field.is_empty() {
                Value::Null
            } else {
                Value::String(field.to_string())
            };
            row.insert(header.to_string(), value);
        }
        rows.push(row);
    }

    debug!(
        "CSV {}: {} rows read, {} skipped",
        path.display(),
        rows.len(),
        rows_skipped
    );

    Ok(rows)
}

// ── JSON ──────────────────────────────────────────────────────────────────────

/// Read a JSON file containing a top-level array of record objects.
///
/// Anything other than an array of objects is a structural failure for the
/// whole source.
pub fn read_json_rows(path: &Path) -> Result<Vec<RawRow>> {
    let content = std::fs::read_to_string(path).map_err(|e| AggregatorError::SourceRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let document: Value = serde_json::from_str(&content)?;

    let Value::Array(items) = document else {
        return Err(AggregatorError::SourceShape {
            path: path.to_path_buf(),
            detail: "expected a top-level JSON array".to_string(),
        });
    };

    let mut rows: Vec<RawRow> = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) => rows.push(map),
            other => {
                return Err(AggregatorError::SourceShape {
                    path: path.to_path_buf(),
                    detail: format!("element {} is not an object: {}", idx, type_name(&other)),
                });
            }
        }
    }

    debug!("JSON {}: {} rows read", path.display(), rows.len());

    Ok(rows)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    // ── read_csv_rows ─────────────────────────────────────────────────────────

    #[test]
    fn test_read_csv_rows_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "data.csv",
            "date,user_id,steps,calories,sleep_minutes\n\
             2025-09-01,u1,1000,200,400\n\
             2025-09-02,u2,2000,300,420\n",
        );

        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], Value::String("2025-09-01".to_string()));
        assert_eq!(rows[0]["user_id"], Value::String("u1".to_string()));
        assert_eq!(rows[0]["steps"], Value::String("1000".to_string()));
        assert_eq!(rows[1]["user_id"], Value::String("u2".to_string()));
    }

    #[test]
    fn test_read_csv_rows_empty_fields_become_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "data.csv",
            "date,user_id,steps,calories\n2025-09-01,u1,,200\n",
        );

        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows[0]["steps"], Value::Null);
        assert_eq!(rows[0]["calories"], Value::String("200".to_string()));
    }

    #[test]
    fn test_read_csv_rows_short_row_fills_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "data.csv",
            "date,user_id,steps\n2025-09-01,u1\n",
        );

        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["steps"], Value::Null);
    }

    #[test]
    fn test_read_csv_rows_extra_columns_carried() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "data.csv",
            "date,user_id,heart_rate\n2025-09-01,u1,72\n",
        );

        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows[0]["heart_rate"], Value::String("72".to_string()));
    }

    #[test]
    fn test_read_csv_rows_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "data.csv",
            "date, user_id\n 2025-09-01 , u1 \n",
        );

        let rows = read_csv_rows(&path).unwrap();
        assert_eq!(rows[0]["date"], Value::String("2025-09-01".to_string()));
        assert_eq!(rows[0]["user_id"], Value::String("u1".to_string()));
    }

    #[test]
    fn test_read_csv_rows_missing_file() {
        let result = read_csv_rows(Path::new("/tmp/does-not-exist-aggregator-test.csv"));
        assert!(matches!(
            result,
            Err(AggregatorError::SourceRead { .. })
        ));
    }

    // ── read_json_rows ────────────────────────────────────────────────────────

    #[test]
    fn test_read_json_rows_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "data.json",
            r#"[{"date": "2025-09-01", "user_id": "u1", "steps": 1000},
                {"date": "2025-09-02", "user_id": "u2", "steps": "2000"}]"#,
        );

        let rows = read_json_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["steps"], Value::from(1000));
        assert_eq!(rows[1]["steps"], Value::String("2000".to_string()));
    }

    #[test]
    fn test_read_json_rows_preserves_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "data.json",
            r#"[{"date": "2025-09-01", "user_id": "u1", "calories": null}]"#,
        );

        let rows = read_json_rows(&path).unwrap();
        assert_eq!(rows[0]["calories"], Value::Null);
    }

    #[test]
    fn test_read_json_rows_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "data.json", "[]");
        let rows = read_json_rows(&path).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_json_rows_object_document_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "data.json", r#"{"date": "2025-09-01"}"#);
        assert!(matches!(
            read_json_rows(&path),
            Err(AggregatorError::SourceShape { .. })
        ));
    }

    #[test]
    fn test_read_json_rows_non_object_element_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "data.json", r#"[{"user_id": "u1"}, 42]"#);
        let err = read_json_rows(&path).unwrap_err();
        assert!(err.to_string().contains("element 1 is not an object"));
    }

    #[test]
    fn test_read_json_rows_malformed_document() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "data.json", "[{broken");
        assert!(matches!(
            read_json_rows(&path),
            Err(AggregatorError::JsonParse(_))
        ));
    }

    #[test]
    fn test_read_json_rows_missing_file() {
        let result = read_json_rows(Path::new("/tmp/does-not-exist-aggregator-test.json"));
        assert!(matches!(
            result,
            Err(AggregatorError::SourceRead { .. })
        ));
    }
}
