//! Record loaders.
//!
//! These turn common file formats into the `Vec<Record>` the aggregation pipeline consumes:
//! - [`csv`]: header row + string cells
//! - [`json`]: array of objects, a single object, or NDJSON

pub mod csv;
pub mod json;

pub use self::csv::{ingest_csv_from_path, ingest_csv_from_reader};
pub use self::json::{ingest_json_from_path, ingest_json_from_str};
