//! Metrics collection abstraction for fanout task runners.
//!
//! Backends (prometheus, statsd, ...) implement [`MetricsBackend`] and are
//! injected through [`crate::RunContext`]; the default is a no-op.
mod backend;
pub use backend::{MetricsBackend, MetricsHandle, TaskOutcome};

mod noop;
pub use noop::NoOpMetrics;

use std::sync::Arc;

/// Create a no-op metrics handle.
#[inline]
pub fn noop_metrics() -> MetricsHandle {
    Arc::new(NoOpMetrics)
}
