//! JSON record loader.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single JSON object
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Records are flat; objects whose fields hold arrays or nested objects are rejected.

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Record;

/// Load JSON records from a file.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Record>> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Load JSON records from an in-memory string.
pub fn ingest_json_from_str(input: &str) -> IngestionResult<Vec<Record>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => json_values_to_records(&items),
            serde_json::Value::Object(_) => json_values_to_records(std::slice::from_ref(&v)),
            _ => Err(IngestionError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| IngestionError::SchemaMismatch {
                message: format!("invalid ndjson at line {}: {}", i + 1, e),
            })?;
            values.push(v);
        }
        json_values_to_records(&values)
    }
}

fn json_values_to_records(values: &[serde_json::Value]) -> IngestionResult<Vec<Record>> {
    values
        .iter()
        .enumerate()
        .map(|(idx0, v)| {
            Record::try_from_json(v).map_err(|message| IngestionError::SchemaMismatch {
                message: format!("row {}: {message}", idx0 + 1),
            })
        })
        .collect()
}
