//! Aggregation engine with run metrics and observer hooks.
//!
//! This module sits "above" [`crate::processing`] and adds monitoring to the same pipeline:
//!
//! - per-run counters ([`AggregationMetrics`]) that can be snapshotted at any time
//! - [`AggregationEvent`]s delivered to an optional [`AggregationObserver`]
//!
//! Execution is single-threaded; each group is folded in input order.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use crate::error::AggregationResult;
use crate::processing::{AggregateOptions, AggregationPlan, MetricTable};
use crate::types::Record;

pub use observer::{
    AggregationEvent, AggregationMetrics, AggregationMetricsSnapshot, AggregationObserver, CompositeObserver,
    LogObserver, StdErrObserver,
};

/// Runs aggregations with fixed [`AggregateOptions`], reporting progress to an observer.
pub struct AggregationEngine {
    opts: AggregateOptions,
    observer: Option<Arc<dyn AggregationObserver>>,
    metrics: Arc<AggregationMetrics>,
}

impl AggregationEngine {
    /// Create a new engine with the given options.
    pub fn new(opts: AggregateOptions) -> Self {
        Self {
            opts,
            observer: None,
            metrics: Arc::new(AggregationMetrics::new()),
        }
    }

    /// Attach an observer for aggregation events.
    pub fn with_observer(mut self, observer: Arc<dyn AggregationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Options used for every run.
    pub fn options(&self) -> &AggregateOptions {
        &self.opts
    }

    /// Get a handle to the run metrics.
    pub fn metrics(&self) -> Arc<AggregationMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Aggregate `dataset`, emitting events for each stage.
    ///
    /// Produces the same output as [`crate::processing::aggregate_with_options`].
    pub fn aggregate<D: AsRef<str>>(
        &self,
        dataset: &[Record],
        dimensions: &[D],
        metrics: &MetricTable,
    ) -> AggregationResult<Vec<Record>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(AggregationEvent::RunStarted {
            records: dataset.len(),
            dimensions: dimensions.iter().map(|d| d.as_ref().to_owned()).collect(),
            metrics: metrics.names().map(str::to_owned).collect(),
        });

        let plan = match AggregationPlan::new(dimensions, metrics, self.opts.clone()) {
            Ok(plan) => plan,
            Err(e) => {
                self.emit(AggregationEvent::RunFailed { error: e.to_string() });
                self.metrics.end_run(start.elapsed());
                return Err(e);
            }
        };

        let groups = plan.group(dataset);
        self.metrics.on_groups_formed(groups.len());
        self.emit(AggregationEvent::GroupsFormed {
            groups: groups.len(),
        });

        let mut out = Vec::with_capacity(groups.len());
        for group in &groups {
            out.push(plan.fold(group));
            self.metrics.on_group_folded(group.members.len());
            self.emit(AggregationEvent::GroupFolded {
                key: group.key.clone(),
                members: group.members.len(),
            });
        }

        self.metrics.end_run(start.elapsed());
        self.emit(AggregationEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });

        Ok(out)
    }

    fn emit(&self, event: AggregationEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new(AggregateOptions::default())
    }
}
