use std::sync::Arc;

/// Task resolution for metrics classification.
///
/// Per-target tasks either succeed or fail; there is no cancellation or
/// timeout in this orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Task resolved successfully.
    Success,
    /// Task resolved with a failure cause.
    Failure,
}

impl TaskOutcome {
    /// Return label value for metrics.
    #[inline]
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskOutcome::Success => "success",
            TaskOutcome::Failure => "failure",
        }
    }
}

/// Backend metrics collection interface.
///
/// Implementations must be cheap and non-blocking; they are called from the
/// scheduling hot path.
pub trait MetricsBackend: Send + Sync + 'static {
    /// Record that a task was admitted and started executing.
    fn record_task_started(&self, runner_type: &str);

    /// Record task resolution with outcome and wall-clock duration.
    fn record_task_completed(&self, runner_type: &str, outcome: TaskOutcome, duration_ms: u64);

    /// Record a runner-level error during task setup/teardown.
    ///
    /// Separate from task failures, which go through `record_task_completed`.
    fn record_runner_error(&self, runner_type: &str, error_kind: &str);

    /// Record one soft-failed remote key read (remote batch variant).
    fn record_key_read_failed(&self, runner_type: &str);
}

/// Shared handle to a metrics backend, cloned into each task.
pub type MetricsHandle = Arc<dyn MetricsBackend>;
