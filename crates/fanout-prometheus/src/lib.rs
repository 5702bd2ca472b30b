//! Prometheus metrics backend for the fanout run engine.
//!
//! Provides [`PrometheusMetrics`], an implementation of
//! [`fanout_core::MetricsBackend`] that records run activity in Prometheus
//! metric families.
//!
//! ## Metrics
//! - `fanout_tasks_started_total{runner_type}` - Counter
//! - `fanout_tasks_completed_total{runner_type, outcome}` - Counter
//! - `fanout_task_duration_seconds{runner_type}` - Histogram
//! - `fanout_runner_errors_total{runner_type, error_kind}` - Counter
//! - `fanout_key_read_failures_total{runner_type}` - Counter
//!
//! This crate does not serve a `/metrics` endpoint; the CLI dumps the text
//! exposition to a file after the run, and a long-lived embedder can wire
//! [`PrometheusMetrics::gather`] into its own HTTP framework.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
