//! `rust-data-aggregation` groups flat key-value [`types::Record`]s by a set of dimension fields
//! and folds every group into one summary record using named metric reducers.
//!
//! The primary entrypoint is [`aggregate`]:
//!
//! - **dataset**: a slice of records; records need not share the same fields
//! - **dimensions**: field names whose values form the group key (empty = one global group)
//! - **metrics**: a [`processing::MetricTable`] mapping output field names to reducers, either a
//!   built-in name (`"sum"`, `"average"`) or a user closure
//!
//! Each output record holds exactly the dimension and metric fields. Built-in reducers read
//! metric fields leniently: missing or non-numeric values count as zero.
//!
//! ## Quick example
//!
//! ```rust
//! use rust_data_aggregation::aggregate;
//! use rust_data_aggregation::processing::MetricTable;
//! use rust_data_aggregation::types::{Record, Value};
//!
//! let ds: Vec<Record> = vec![
//!     [("source", "a"), ("revenue", "10")].into_iter().collect(),
//!     [("source", "a"), ("revenue", "20")].into_iter().collect(),
//!     [("source", "b"), ("revenue", "5")].into_iter().collect(),
//! ];
//! let metrics = MetricTable::new().with("revenue", "sum");
//!
//! let by_source = aggregate(&ds, &["source"], &metrics).unwrap();
//! assert_eq!(by_source.len(), 2);
//!
//! let total = aggregate(&ds, &[] as &[&str], &metrics).unwrap();
//! assert_eq!(total[0].value("revenue"), &Value::Float64(35.0));
//! ```
//!
//! ## Untyped input
//!
//! [`aggregate_json`] accepts `serde_json::Value`s and validates their shape first, failing with
//! [`AggregationError::InvalidDataset`], [`AggregationError::InvalidDimensions`] or
//! [`AggregationError::InvalidMetrics`]:
//!
//! ```rust
//! use rust_data_aggregation::{aggregate_json, AggregationError};
//! use serde_json::json;
//!
//! let err = aggregate_json(&json!([{"source": "a"}]), &json!(["source"]), &json!({"x": "median"}))
//!     .unwrap_err();
//! assert!(matches!(err, AggregationError::InvalidMetrics { .. }));
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: validation, group keys, reducers, folding, and the aggregation pipeline
//! - [`execution`]: an engine that runs the pipeline with metrics and observer hooks
//! - [`ingestion`]: CSV/JSON loaders producing records
//! - [`types`]: [`types::Record`] and [`types::Value`]
//! - [`error`]: error types

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{AggregationError, AggregationResult, IngestionError, IngestionResult};
pub use processing::{aggregate, aggregate_json, aggregate_with_options};
