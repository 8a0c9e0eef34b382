//! Metric reducers: the built-in table, user-supplied functions, and the metric table that
//! names them.

use std::fmt;
use std::sync::Arc;

use crate::error::{AggregationError, AggregationResult};
use crate::types::{Record, Value};

use super::numeric::to_numeric;

/// Signature of a user-supplied reducer.
///
/// Called as `reducer(accumulated, current, index_within_group, current_record)` and returns the
/// new accumulated value. User reducers receive raw values; no numeric coercion is applied.
pub type ReducerFn = dyn Fn(&Value, &Value, usize, &Record) -> Value + Send + Sync;

/// Built-in reducers, addressable by name from a [`MetricTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinReducer {
    /// Running total of the coerced field values.
    Sum,
    /// Running arithmetic mean of the coerced field values.
    ///
    /// Relies on members being folded in input order with a zero-based index.
    Average,
}

/// Name → built-in reducer lookup table.
pub const BUILTIN_REDUCERS: &[(&str, BuiltinReducer)] = &[
    ("sum", BuiltinReducer::Sum),
    ("average", BuiltinReducer::Average),
];

impl BuiltinReducer {
    /// Look up a built-in reducer by name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        BUILTIN_REDUCERS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, r)| *r)
    }

    /// The name this reducer is registered under.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinReducer::Sum => "sum",
            BuiltinReducer::Average => "average",
        }
    }

    /// Iterate all registered built-in names.
    pub fn names() -> impl Iterator<Item = &'static str> {
        BUILTIN_REDUCERS.iter().map(|(n, _)| *n)
    }

    /// Fold `current` into `accumulated`. Both inputs are coerced with [`to_numeric`].
    pub fn apply(self, accumulated: &Value, current: &Value, index: usize) -> Value {
        let acc = to_numeric(accumulated);
        let cur = to_numeric(current);
        match self {
            BuiltinReducer::Sum => Value::Float64(acc + cur),
            BuiltinReducer::Average => {
                let i = index as f64;
                Value::Float64((acc * i + cur) / (i + 1.0))
            }
        }
    }
}

impl fmt::Display for BuiltinReducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a metric is computed: a built-in reducer name or a user function.
#[derive(Clone)]
pub enum Reducer {
    /// A name that must match an entry in [`BUILTIN_REDUCERS`].
    Named(String),
    /// A user-supplied reducer.
    Custom(Arc<ReducerFn>),
}

impl Reducer {
    /// Wrap a closure as a custom reducer.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value, usize, &Record) -> Value + Send + Sync + 'static,
    {
        Reducer::Custom(Arc::new(f))
    }
}

impl fmt::Debug for Reducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reducer::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Reducer::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl From<&str> for Reducer {
    fn from(name: &str) -> Self {
        Reducer::Named(name.to_owned())
    }
}

impl From<String> for Reducer {
    fn from(name: String) -> Self {
        Reducer::Named(name)
    }
}

impl From<BuiltinReducer> for Reducer {
    fn from(r: BuiltinReducer) -> Self {
        Reducer::Named(r.name().to_owned())
    }
}

/// Ordered mapping from output metric name to [`Reducer`].
///
/// Declaring a name twice replaces the earlier reducer but keeps its position.
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    entries: Vec<(String, Reducer)>,
}

impl MetricTable {
    /// Create an empty metric table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MetricTable::insert`].
    pub fn with(mut self, name: impl Into<String>, reducer: impl Into<Reducer>) -> Self {
        self.insert(name, reducer);
        self
    }

    /// Declare a metric computed by a user-supplied closure.
    pub fn with_fn<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &Value, usize, &Record) -> Value + Send + Sync + 'static,
    {
        self.with(name, Reducer::custom(f))
    }

    /// Declare (or redeclare) a metric.
    pub fn insert(&mut self, name: impl Into<String>, reducer: impl Into<Reducer>) {
        let name = name.into();
        let reducer = reducer.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = reducer,
            None => self.entries.push((name, reducer)),
        }
    }

    /// Returns the reducer declared for `name`.
    pub fn get(&self, name: &str) -> Option<&Reducer> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Number of declared metrics.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no metrics are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate metric names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Iterate `(name, reducer)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Reducer)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Resolve every metric to a callable reducer.
    ///
    /// Fails with [`AggregationError::UnresolvedReducer`] on the first name that is not a
    /// built-in.
    pub fn resolve(&self) -> AggregationResult<Vec<ResolvedMetric<'_>>> {
        self.entries
            .iter()
            .map(|(name, reducer)| -> AggregationResult<ResolvedMetric<'_>> {
                let reducer = match reducer {
                    Reducer::Named(r) => BuiltinReducer::from_name(r)
                        .map(ResolvedReducer::Builtin)
                        .ok_or_else(|| AggregationError::UnresolvedReducer {
                            metric: name.clone(),
                        })?,
                    Reducer::Custom(f) => ResolvedReducer::Custom(f.as_ref()),
                };
                Ok(ResolvedMetric {
                    name: name.as_str(),
                    reducer,
                })
            })
            .collect()
    }
}

#[derive(Clone, Copy)]
enum ResolvedReducer<'a> {
    Builtin(BuiltinReducer),
    Custom(&'a ReducerFn),
}

/// A metric whose reducer has been resolved to something directly callable.
#[derive(Clone, Copy)]
pub struct ResolvedMetric<'a> {
    name: &'a str,
    reducer: ResolvedReducer<'a>,
}

impl<'a> ResolvedMetric<'a> {
    /// Output field name of the metric.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Fold one record's field value into the running accumulator.
    pub fn apply(&self, accumulated: &Value, current: &Value, index: usize, record: &Record) -> Value {
        match self.reducer {
            ResolvedReducer::Builtin(r) => r.apply(accumulated, current, index),
            ResolvedReducer::Custom(f) => f(accumulated, current, index, record),
        }
    }
}

impl fmt::Debug for ResolvedMetric<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reducer = match self.reducer {
            ResolvedReducer::Builtin(r) => r.name(),
            ResolvedReducer::Custom(_) => "<fn>",
        };
        f.debug_struct("ResolvedMetric")
            .field("name", &self.name)
            .field("reducer", &reducer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{BuiltinReducer, MetricTable, Reducer};
    use crate::error::AggregationError;
    use crate::types::{Record, Value};

    #[test]
    fn builtin_lookup_by_name() {
        assert_eq!(BuiltinReducer::from_name("sum"), Some(BuiltinReducer::Sum));
        assert_eq!(
            BuiltinReducer::from_name("average"),
            Some(BuiltinReducer::Average)
        );
        assert_eq!(BuiltinReducer::from_name("Sum"), None);
        assert_eq!(BuiltinReducer::from_name("wuut"), None);
        assert_eq!(BuiltinReducer::names().collect::<Vec<_>>(), vec!["sum", "average"]);
    }

    #[test]
    fn sum_coerces_both_operands() {
        let out = BuiltinReducer::Sum.apply(&Value::from("10"), &Value::Int64(5), 3);
        assert_eq!(out, Value::Float64(15.0));

        let out = BuiltinReducer::Sum.apply(&Value::Float64(2.0), &Value::Null, 0);
        assert_eq!(out, Value::Float64(2.0));
    }

    #[test]
    fn average_is_a_running_mean_over_the_index() {
        let values = [Value::Int64(2), Value::from("4"), Value::Float64(9.0)];
        let mut acc = Value::Float64(0.0);
        for (i, v) in values.iter().enumerate() {
            acc = BuiltinReducer::Average.apply(&acc, v, i);
        }
        assert_eq!(acc, Value::Float64(5.0));
    }

    #[test]
    fn average_counts_non_numeric_values_as_zero() {
        let values = [Value::Int64(6), Value::from("n/a")];
        let mut acc = Value::Float64(0.0);
        for (i, v) in values.iter().enumerate() {
            acc = BuiltinReducer::Average.apply(&acc, v, i);
        }
        assert_eq!(acc, Value::Float64(3.0));
    }

    #[test]
    fn metric_table_redeclaration_replaces_in_place() {
        let table = MetricTable::new()
            .with("revenue", "sum")
            .with("ecpm", BuiltinReducer::Average)
            .with("revenue", "average");

        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["revenue", "ecpm"]);
        assert!(matches!(table.get("revenue"), Some(Reducer::Named(n)) if n == "average"));
    }

    #[test]
    fn resolve_calls_custom_reducers_with_raw_values() {
        let table = MetricTable::new().with_fn("seen", |acc, cur, i, rec| {
            let tag = format!("{acc}|{cur}|{i}|{}", rec.value("source"));
            Value::Utf8(tag)
        });
        let metrics = table.resolve().unwrap();
        let rec: Record = [("source", "a"), ("seen", "x")].into_iter().collect();

        let out = metrics[0].apply(&Value::Int64(1), rec.value("seen"), 4, &rec);
        assert_eq!(out, Value::Utf8("1|x|4|a".to_string()));
        assert_eq!(metrics[0].name(), "seen");
    }

    #[test]
    fn resolve_fails_on_unknown_builtin_name() {
        let table = MetricTable::new().with("revenue", "sum").with("ecpm", "median");
        let err = table.resolve().unwrap_err();
        assert!(matches!(err, AggregationError::UnresolvedReducer { ref metric } if metric == "ecpm"));
        assert!(err.to_string().contains("metric 'ecpm'"));
    }
}
