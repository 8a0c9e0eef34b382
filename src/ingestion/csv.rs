//! CSV record loader.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Record, Value};

/// Load a CSV file into records.
///
/// Rules:
///
/// - CSV must have headers; each header becomes a field name.
/// - Every cell is kept as a trimmed string ([`Value::Utf8`]); numeric interpretation is left to
///   the reducers.
/// - Empty cells become [`Value::Null`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Load records from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Vec<Record>> {
    let headers = rdr.headers()?.clone();
    if headers.iter().any(|h| h.trim().is_empty()) {
        return Err(IngestionError::SchemaMismatch {
            message: format!(
                "csv headers must be non-empty. headers={:?}",
                headers.iter().collect::<Vec<_>>()
            ),
        });
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, raw)| (name.trim(), parse_cell(raw)))
            .collect();
        records.push(record);
    }

    Ok(records)
}

fn parse_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::Utf8(trimmed.to_owned())
    }
}
