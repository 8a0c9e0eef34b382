//! The aggregation pipeline: validate → group → fold → assemble.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::AggregationResult;
use crate::types::Record;

use super::fold::fold_group;
use super::key::{group_records, Group, KeyDeriver};
use super::reduce::{MetricTable, ResolvedMetric};
use super::validate::{
    metrics_from_json, validate_dataset, validate_dimensions, validate_dimensions_json,
    validate_metrics,
};

/// Options controlling group-key derivation.
///
/// Use [`Default`] for the standard `-` delimiter and `empty` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Joins dimension values into a group key.
    pub key_delimiter: String,
    /// Stands in for a dimension that is absent, null, or an empty string.
    pub missing_placeholder: String,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            key_delimiter: "-".to_string(),
            missing_placeholder: "empty".to_string(),
        }
    }
}

/// A validated aggregation, ready to run against any number of datasets.
///
/// Building the plan checks the dimensions and metrics and resolves every reducer once, so
/// folding never has to look a reducer up again.
#[derive(Debug)]
pub struct AggregationPlan<'m> {
    dimensions: Vec<String>,
    metrics: Vec<ResolvedMetric<'m>>,
    options: AggregateOptions,
}

impl<'m> AggregationPlan<'m> {
    /// Validate `dimensions` and `metrics` and resolve the reducer table.
    pub fn new<D: AsRef<str>>(
        dimensions: &[D],
        metrics: &'m MetricTable,
        options: AggregateOptions,
    ) -> AggregationResult<Self> {
        let dimensions = validate_dimensions(dimensions)?;
        validate_metrics(metrics)?;
        let metrics = metrics.resolve()?;
        Ok(Self {
            dimensions,
            metrics,
            options,
        })
    }

    /// Grouping dimensions, in key order.
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Options the plan derives keys with.
    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// The fields every output record carries: dimensions, then metrics not already listed.
    pub fn output_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.dimensions.iter().map(String::as_str).collect();
        for m in &self.metrics {
            if !fields.contains(&m.name()) {
                fields.push(m.name());
            }
        }
        fields
    }

    /// Partition `dataset` into groups, in first-encounter order.
    pub fn group<'d>(&self, dataset: &'d [Record]) -> Vec<Group<'d>> {
        let deriver = KeyDeriver::new(&self.dimensions, &self.options);
        group_records(dataset, &deriver)
    }

    /// Fold one group into its output record.
    pub fn fold(&self, group: &Group<'_>) -> Record {
        fold_group(&group.members, &self.dimensions, &self.metrics)
    }

    /// Run the plan: one output record per distinct group key.
    pub fn execute(&self, dataset: &[Record]) -> Vec<Record> {
        let groups = self.group(dataset);
        debug!(
            "aggregating {} records into {} groups on [{}]",
            dataset.len(),
            groups.len(),
            self.dimensions.join(", ")
        );
        groups.iter().map(|g| self.fold(g)).collect()
    }
}

/// Aggregate `dataset` by `dimensions`, computing every metric in `metrics` per group.
///
/// Returns one record per distinct dimension-value tuple (a single record when `dimensions` is
/// empty and the dataset is not), holding exactly the dimension and metric fields.
///
/// # Example
///
/// ```rust
/// use rust_data_aggregation::processing::{aggregate, MetricTable};
/// use rust_data_aggregation::types::{Record, Value};
///
/// let ds: Vec<Record> = vec![
///     [("source", "a"), ("revenue", "10")].into_iter().collect(),
///     [("source", "a"), ("revenue", "20")].into_iter().collect(),
///     [("source", "b"), ("revenue", "5")].into_iter().collect(),
/// ];
/// let metrics = MetricTable::new().with("revenue", "sum");
///
/// let out = aggregate(&ds, &["source"], &metrics).unwrap();
/// assert_eq!(out.len(), 2);
/// assert_eq!(out[0].value("revenue"), &Value::Float64(30.0));
/// ```
pub fn aggregate<D: AsRef<str>>(
    dataset: &[Record],
    dimensions: &[D],
    metrics: &MetricTable,
) -> AggregationResult<Vec<Record>> {
    aggregate_with_options(dataset, dimensions, metrics, &AggregateOptions::default())
}

/// [`aggregate`] with explicit [`AggregateOptions`].
pub fn aggregate_with_options<D: AsRef<str>>(
    dataset: &[Record],
    dimensions: &[D],
    metrics: &MetricTable,
    options: &AggregateOptions,
) -> AggregationResult<Vec<Record>> {
    let plan = AggregationPlan::new(dimensions, metrics, options.clone())?;
    Ok(plan.execute(dataset))
}

/// Aggregate untyped JSON input.
///
/// - `dataset` must be an array of flat objects
/// - `dimensions` must be an array of distinct strings
/// - `metrics` must be an object whose values name built-in reducers
///
/// Inputs are checked in that order; the first failure is returned.
pub fn aggregate_json(
    dataset: &serde_json::Value,
    dimensions: &serde_json::Value,
    metrics: &serde_json::Value,
) -> AggregationResult<Vec<Record>> {
    let records = validate_dataset(dataset)?;
    let dimensions = validate_dimensions_json(dimensions)?;
    let metrics = metrics_from_json(metrics)?;
    aggregate(&records, dimensions.as_slice(), &metrics)
}

#[cfg(test)]
mod tests {
    use super::{aggregate, aggregate_json, aggregate_with_options, AggregateOptions, AggregationPlan};
    use crate::error::AggregationError;
    use crate::processing::MetricTable;
    use crate::types::{Record, Value};
    use serde_json::json;

    const NO_DIMENSIONS: [&str; 0] = [];

    fn revenue_dataset() -> Vec<Record> {
        vec![
            [("source", "a"), ("revenue", "10")].into_iter().collect(),
            [("source", "a"), ("revenue", "20")].into_iter().collect(),
            [("source", "b"), ("revenue", "5")].into_iter().collect(),
        ]
    }

    #[test]
    fn sums_revenue_per_source() {
        let out = aggregate(
            &revenue_dataset(),
            &["source"],
            &MetricTable::new().with("revenue", "sum"),
        )
        .unwrap();

        let expected: Vec<Record> = vec![
            vec![("source", Value::from("a")), ("revenue", Value::Float64(30.0))]
                .into_iter()
                .collect(),
            vec![("source", Value::from("b")), ("revenue", Value::Float64(5.0))]
                .into_iter()
                .collect(),
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_dimensions_produce_one_global_record() {
        let out = aggregate(
            &revenue_dataset(),
            &NO_DIMENSIONS,
            &MetricTable::new().with("revenue", "sum"),
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 1);
        assert_eq!(out[0].value("revenue"), &Value::Float64(35.0));
    }

    #[test]
    fn empty_dataset_produces_no_records() {
        let out = aggregate(&[], &NO_DIMENSIONS, &MetricTable::new().with("revenue", "sum")).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn input_dataset_is_not_mutated() {
        let ds = revenue_dataset();
        let before = ds.clone();
        let _ = aggregate(&ds, &["source"], &MetricTable::new().with("revenue", "sum")).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn plan_exposes_output_fields_once() {
        let metrics = MetricTable::new().with("revenue", "sum").with("source", "sum");
        let plan = AggregationPlan::new(&["source", "website"], &metrics, AggregateOptions::default()).unwrap();
        assert_eq!(plan.output_fields(), vec!["source", "website", "revenue"]);
        assert_eq!(plan.dimensions(), &["source".to_string(), "website".to_string()]);
    }

    #[test]
    fn plan_rejects_unknown_reducer_before_running() {
        let metrics = MetricTable::new().with("revenue", "wuut");
        let err = AggregationPlan::new(&["source"], &metrics, AggregateOptions::default()).unwrap_err();
        assert!(matches!(err, AggregationError::InvalidMetrics { .. }));
    }

    #[test]
    fn options_change_group_keys() {
        let ds: Vec<Record> = vec![
            [("a", "x-y"), ("b", "z"), ("n", "1")].into_iter().collect(),
            [("a", "x"), ("b", "y-z"), ("n", "2")].into_iter().collect(),
        ];
        let metrics = MetricTable::new().with("n", "sum");

        let merged = aggregate(&ds, &["a", "b"], &metrics).unwrap();
        assert_eq!(merged.len(), 1);

        let opts = AggregateOptions {
            key_delimiter: "\u{1f}".to_string(),
            ..Default::default()
        };
        let split = aggregate_with_options(&ds, &["a", "b"], &metrics, &opts).unwrap();
        assert_eq!(split.len(), 2);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: AggregateOptions = serde_json::from_value(json!({"key_delimiter": "/"})).unwrap();
        assert_eq!(opts.key_delimiter, "/");
        assert_eq!(opts.missing_placeholder, "empty");
    }

    #[test]
    fn json_entry_point_validates_in_order() {
        let err = aggregate_json(&json!("nope"), &json!(1), &json!(1)).unwrap_err();
        assert!(matches!(err, AggregationError::InvalidDataset { .. }));

        let err = aggregate_json(&json!([]), &json!([123]), &json!({})).unwrap_err();
        assert!(matches!(err, AggregationError::InvalidDimensions { .. }));

        let err = aggregate_json(&json!([]), &json!([]), &json!({"x": "unknownReducer"})).unwrap_err();
        assert!(matches!(err, AggregationError::InvalidMetrics { .. }));
    }

    #[test]
    fn json_entry_point_aggregates() {
        let out = aggregate_json(
            &json!([
                {"source": "a", "revenue": "10"},
                {"source": "a", "revenue": 20},
                {"source": "b", "revenue": 5.5}
            ]),
            &json!(["source"]),
            &json!({"revenue": "sum"}),
        )
        .unwrap();

        let json_out = serde_json::to_value(&out).unwrap();
        assert_eq!(
            json_out,
            json!([
                {"source": "a", "revenue": 30.0},
                {"source": "b", "revenue": 5.5}
            ])
        );
    }

    #[test]
    fn zero_false_and_missing_dimension_values_share_one_group() {
        let out = aggregate_json(
            &json!([{"d": 0, "r": 1}, {"d": false, "r": 2}, {"r": 4}]),
            &json!(["d"]),
            &json!({"r": "sum"}),
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value("r"), &Value::Float64(7.0));
    }
}
