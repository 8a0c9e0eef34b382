//! Input validation: the gate every aggregation passes before any grouping happens.
//!
//! The typed entry points can only be handed well-shaped datasets and dimension lists, so for
//! them validation reduces to duplicate dimensions and unknown reducer names. The JSON entry
//! point additionally checks the shape of each input.

use std::collections::HashSet;

use crate::error::{AggregationError, AggregationResult};
use crate::types::{json_kind, Record};

use super::reduce::{BuiltinReducer, MetricTable, Reducer};

/// Check that `value` is an array of flat JSON objects and convert it to records.
pub fn validate_dataset(value: &serde_json::Value) -> AggregationResult<Vec<Record>> {
    let items = value.as_array().ok_or_else(|| AggregationError::InvalidDataset {
        message: format!("dataset must be an array of records, found {}", json_kind(value)),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            Record::try_from_json(item).map_err(|e| AggregationError::InvalidDataset {
                message: format!("record {idx}: {e}"),
            })
        })
        .collect()
}

/// Check that `dims` holds distinct field names.
pub fn validate_dimensions<D: AsRef<str>>(dims: &[D]) -> AggregationResult<Vec<String>> {
    let mut seen = HashSet::with_capacity(dims.len());
    let mut out = Vec::with_capacity(dims.len());
    for d in dims {
        let name = d.as_ref();
        if !seen.insert(name) {
            return Err(AggregationError::InvalidDimensions {
                message: format!("dimension '{name}' is listed more than once"),
            });
        }
        out.push(name.to_owned());
    }
    Ok(out)
}

/// Check that `value` is an array of distinct strings.
pub fn validate_dimensions_json(value: &serde_json::Value) -> AggregationResult<Vec<String>> {
    let items = value.as_array().ok_or_else(|| AggregationError::InvalidDimensions {
        message: format!("dimensions must be an array of strings, found {}", json_kind(value)),
    })?;

    let mut names: Vec<&str> = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let name = item.as_str().ok_or_else(|| AggregationError::InvalidDimensions {
            message: format!("dimension at position {idx} must be a string, found {}", json_kind(item)),
        })?;
        names.push(name);
    }
    validate_dimensions(names.as_slice())
}

/// Check that every named reducer in `metrics` is a registered built-in.
pub fn validate_metrics(metrics: &MetricTable) -> AggregationResult<()> {
    for (name, reducer) in metrics.iter() {
        if let Reducer::Named(r) = reducer {
            if BuiltinReducer::from_name(r).is_none() {
                return Err(AggregationError::InvalidMetrics {
                    message: format!(
                        "metric '{name}' must resolve to a reducer function or one of the built-in reducers ({}), found '{r}'",
                        builtin_names()
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Build a [`MetricTable`] from a JSON object of `metric name → built-in reducer name`.
///
/// Functions cannot be expressed in JSON, so every value must be a string naming a built-in.
pub fn metrics_from_json(value: &serde_json::Value) -> AggregationResult<MetricTable> {
    let obj = value.as_object().ok_or_else(|| AggregationError::InvalidMetrics {
        message: format!(
            "metrics must be an object mapping metric names to built-in reducers ({}), found {}",
            builtin_names(),
            json_kind(value)
        ),
    })?;

    let mut table = MetricTable::new();
    for (name, reducer) in obj {
        let r = reducer.as_str().ok_or_else(|| AggregationError::InvalidMetrics {
            message: format!(
                "metric '{name}' must name one of the built-in reducers ({}), found {}",
                builtin_names(),
                json_kind(reducer)
            ),
        })?;
        table.insert(name.as_str(), r);
    }
    validate_metrics(&table)?;
    Ok(table)
}

fn builtin_names() -> String {
    BuiltinReducer::names().collect::<Vec<_>>().join(", ")
}
