//! Folding a group's members into one output record.

use crate::types::{Record, Value};

use super::reduce::ResolvedMetric;

/// Fold `members` (in input order) into a single output record.
///
/// The accumulator starts with every metric at `0`. For each member at zero-based index `i`,
/// dimension fields carried by the member overwrite the accumulator's, then each metric is
/// recomputed as `reducer(previous, member[metric], i, member)`. No other fields are ever
/// written, so the result holds exactly `dimensions ∪ metrics`; a dimension that no member
/// carries is emitted as `Null`. When a name is both a dimension and a metric, the metric wins.
pub fn fold_group(members: &[&Record], dimensions: &[String], metrics: &[ResolvedMetric<'_>]) -> Record {
    let mut out = Record::new();
    for metric in metrics {
        out.insert(metric.name(), Value::Float64(0.0));
    }

    let is_metric = |name: &str| metrics.iter().any(|m| m.name() == name);

    for (index, record) in members.iter().copied().enumerate() {
        for dim in dimensions {
            if is_metric(dim) {
                continue;
            }
            if let Some(v) = record.get(dim) {
                out.insert(dim.as_str(), v.clone());
            }
        }

        for metric in metrics {
            let next = metric.apply(out.value(metric.name()), record.value(metric.name()), index, record);
            out.insert(metric.name(), next);
        }
    }

    for dim in dimensions {
        if !out.contains(dim) {
            out.insert(dim.as_str(), Value::Null);
        }
    }

    out
}
