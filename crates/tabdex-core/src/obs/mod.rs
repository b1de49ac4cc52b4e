//! Observability: build-phase telemetry and sink abstractions.
//!
//! Core index logic does not access the counter state directly; all
//! instrumentation flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod sink;

// re-exports
pub use sink::{
    BuildReport, MetricsEvent, MetricsSink, TableCounters, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
