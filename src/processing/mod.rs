//! In-memory group-by aggregation over [`crate::types::Record`]s.
//!
//! The pipeline is a straight line:
//!
//! - [`validate`]: reject malformed datasets, dimensions, and metric tables
//! - [`key`]: derive each record's group key and partition the dataset
//! - [`fold`]: fold each group's members through the metric reducers
//! - [`aggregate()`]: assemble one output record per group
//!
//! Built-in reducers coerce field values with [`to_numeric`], so missing or non-numeric metric
//! fields contribute zero rather than failing.
//!
//! ## Example: built-in and custom reducers
//!
//! ```rust
//! use rust_data_aggregation::processing::{aggregate, to_numeric, MetricTable};
//! use rust_data_aggregation::types::{Record, Value};
//!
//! let ds: Vec<Record> = vec![
//!     [("source", "admeta"), ("revenue", "100"), ("ecpm", "2")].into_iter().collect(),
//!     [("source", "admeta"), ("revenue", "50"), ("ecpm", "4")].into_iter().collect(),
//!     [("source", "other"), ("revenue", "10"), ("ecpm", "1")].into_iter().collect(),
//! ];
//!
//! // Revenue after a 15% cut, plus the average eCPM.
//! let metrics = MetricTable::new()
//!     .with_fn("revenue", |total, value, _i, _row| {
//!         Value::Float64(to_numeric(total) + to_numeric(value) * 0.85)
//!     })
//!     .with("ecpm", "average");
//!
//! let out = aggregate(&ds, &["source"], &metrics).unwrap();
//! assert_eq!(out[0].value("source"), &Value::from("admeta"));
//! assert_eq!(out[0].value("revenue"), &Value::Float64(127.5));
//! assert_eq!(out[0].value("ecpm"), &Value::Float64(3.0));
//! ```

pub mod aggregate;
pub mod fold;
pub mod key;
pub mod numeric;
pub mod reduce;
pub mod validate;

pub use aggregate::{aggregate, aggregate_json, aggregate_with_options, AggregateOptions, AggregationPlan};
pub use fold::fold_group;
pub use key::{group_records, is_blank, Group, KeyDeriver, GLOBAL_GROUP_KEY};
pub use numeric::to_numeric;
pub use reduce::{BuiltinReducer, MetricTable, Reducer, ReducerFn, ResolvedMetric, BUILTIN_REDUCERS};
