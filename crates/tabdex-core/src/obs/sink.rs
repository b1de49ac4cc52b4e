//! Metrics sink boundary.
//!
//! Builder logic MUST NOT depend on the counter state directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only bridge between build logic and the
//! process-local metrics state.

use serde::Serialize;
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
    static BUILD_STATE: RefCell<BuildReport> = RefCell::new(BuildReport::default());
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent {
    RowIndexed {
        table: &'static str,
    },
    MergeFold {
        table: &'static str,
    },
    UniqueViolation {
        table: &'static str,
    },
    BuildFinished {
        table: &'static str,
        rows: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

///
/// BuildReport
/// Ephemeral, in-memory counters for index construction.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BuildReport {
    pub rows_indexed: u64,
    pub merge_folds: u64,
    pub unique_violations: u64,
    pub builds_completed: u64,
    pub tables: BTreeMap<String, TableCounters>,
}

///
/// TableCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TableCounters {
    pub rows_indexed: u64,
    pub merge_folds: u64,
    pub unique_violations: u64,
    pub builds_completed: u64,
}

/// GlobalMetricsSink
/// Default process-local sink that writes into the counter state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        BUILD_STATE.with(|state| {
            let mut state = state.borrow_mut();

            match event {
                MetricsEvent::RowIndexed { table } => {
                    state.rows_indexed = state.rows_indexed.saturating_add(1);
                    let entry = state.tables.entry(table.to_string()).or_default();
                    entry.rows_indexed = entry.rows_indexed.saturating_add(1);
                }
                MetricsEvent::MergeFold { table } => {
                    state.merge_folds = state.merge_folds.saturating_add(1);
                    let entry = state.tables.entry(table.to_string()).or_default();
                    entry.merge_folds = entry.merge_folds.saturating_add(1);
                }
                MetricsEvent::UniqueViolation { table } => {
                    state.unique_violations = state.unique_violations.saturating_add(1);
                    let entry = state.tables.entry(table.to_string()).or_default();
                    entry.unique_violations = entry.unique_violations.saturating_add(1);
                }
                MetricsEvent::BuildFinished { table, rows: _ } => {
                    state.builds_completed = state.builds_completed.saturating_add(1);
                    let entry = state.tables.entry(table.to_string()).or_default();
                    entry.builds_completed = entry.builds_completed.saturating_add(1);
                }
            }
        });
    }
}

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current build counters for endpoint/test plumbing.
#[must_use]
pub fn metrics_report() -> BuildReport {
    BUILD_STATE.with(|state| state.borrow().clone())
}

/// Reset all build counters.
pub fn metrics_reset_all() {
    BUILD_STATE.with(|state| *state.borrow_mut() = BuildReport::default());
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous override is restored on all exits, including panic.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0.take();
            });
        }
    }

    let previous = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(previous);

    f()
}

///
/// TESTS
///
