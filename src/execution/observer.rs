use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

/// Events emitted by the [`super::AggregationEngine`] during a run.
#[derive(Debug, Clone)]
pub enum AggregationEvent {
    RunStarted {
        records: usize,
        dimensions: Vec<String>,
        metrics: Vec<String>,
    },
    GroupsFormed { groups: usize },
    GroupFolded { key: String, members: usize },
    RunFailed { error: String },
    RunFinished {
        elapsed: Duration,
        metrics: AggregationMetricsSnapshot,
    },
}

/// Observer hook for aggregation events.
pub trait AggregationObserver: Send + Sync {
    fn on_event(&self, event: &AggregationEvent);
}

/// A simple stderr logger for aggregation events.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl AggregationObserver for StdErrObserver {
    fn on_event(&self, event: &AggregationEvent) {
        eprintln!("[aggregate] {event:?}");
    }
}

/// Forwards aggregation events to the [`log`] facade.
///
/// Run boundaries log at `info`, per-group events at `debug`, failures at `warn`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl AggregationObserver for LogObserver {
    fn on_event(&self, event: &AggregationEvent) {
        match event {
            AggregationEvent::RunStarted {
                records,
                dimensions,
                metrics,
            } => info!(
                "aggregation started: records={records} dimensions=[{}] metrics=[{}]",
                dimensions.join(", "),
                metrics.join(", ")
            ),
            AggregationEvent::GroupsFormed { groups } => debug!("formed {groups} groups"),
            AggregationEvent::GroupFolded { key, members } => {
                debug!("folded group '{key}' ({members} records)")
            }
            AggregationEvent::RunFailed { error } => warn!("aggregation failed: {error}"),
            AggregationEvent::RunFinished { elapsed, metrics } => {
                info!("aggregation finished in {elapsed:?}: {metrics}")
            }
        }
    }
}

/// Fans events out to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn AggregationObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn AggregationObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl AggregationObserver for CompositeObserver {
    fn on_event(&self, event: &AggregationEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}

/// Counters for the most recent aggregation run.
///
/// The engine updates these during execution; callers can snapshot them at any time.
pub struct AggregationMetrics {
    run_id: AtomicU64,
    elapsed_ns: AtomicU64,
    records_processed: AtomicU64,
    groups_formed: AtomicU64,
    groups_folded: AtomicU64,
}

impl AggregationMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            elapsed_ns: AtomicU64::new(0),
            records_processed: AtomicU64::new(0),
            groups_formed: AtomicU64::new(0),
            groups_folded: AtomicU64::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.records_processed.store(0, Ordering::SeqCst);
        self.groups_formed.store(0, Ordering::SeqCst);
        self.groups_folded.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_groups_formed(&self, groups: usize) {
        self.groups_formed.store(groups as u64, Ordering::SeqCst);
    }

    pub fn on_group_folded(&self, members: usize) {
        let _ = self.groups_folded.fetch_add(1, Ordering::SeqCst);
        let _ = self.records_processed.fetch_add(members as u64, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> AggregationMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        AggregationMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            records_processed: self.records_processed.load(Ordering::SeqCst),
            groups_formed: self.groups_formed.load(Ordering::SeqCst),
            groups_folded: self.groups_folded.load(Ordering::SeqCst),
        }
    }
}

impl Default for AggregationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable snapshot of [`AggregationMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub records_processed: u64,
    pub groups_formed: u64,
    pub groups_folded: u64,
}

impl fmt::Display for AggregationMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, records_processed={}, groups={}/{}, elapsed={:?}",
            self.run_id, self.records_processed, self.groups_folded, self.groups_formed, self.elapsed
        )
    }
}
