use std::sync::Arc;

use prometheus::{CounterVec, HistogramVec, Opts, Registry, TextEncoder, proto::MetricFamily};

use fanout_core::{MetricsBackend, TaskOutcome};

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// All labels are bounded (low cardinality):
/// - `runner_type`: "subprocess", "remote-batch"
/// - `outcome`: "success", "failure"
/// - `error_kind`: "spawn_failed", "connect_failed", etc
#[derive(Clone)]
pub struct PrometheusMetrics {
    tasks_started: CounterVec,
    tasks_completed: CounterVec,
    tasks_duration: HistogramVec,
    runner_errors: CounterVec,
    key_read_failures: CounterVec,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a metrics backend registered against a custom registry.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let tasks_started = CounterVec::new(
            Opts::new("fanout_tasks_started_total", "Total number of tasks started"),
            &["runner_type"],
        )?;
        registry.register(Box::new(tasks_started.clone()))?;

        let tasks_completed = CounterVec::new(
            Opts::new(
                "fanout_tasks_completed_total",
                "Total number of tasks completed",
            ),
            &["runner_type", "outcome"],
        )?;
        registry.register(Box::new(tasks_completed.clone()))?;

        let tasks_duration = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "fanout_task_duration_seconds",
                "Task execution duration in seconds",
            )
            .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0]),
            &["runner_type"],
        )?;
        registry.register(Box::new(tasks_duration.clone()))?;

        let runner_errors = CounterVec::new(
            Opts::new("fanout_runner_errors_total", "Total runner-level errors"),
            &["runner_type", "error_kind"],
        )?;
        registry.register(Box::new(runner_errors.clone()))?;

        let key_read_failures = CounterVec::new(
            Opts::new(
                "fanout_key_read_failures_total",
                "Total soft-failed per-key remote reads",
            ),
            &["runner_type"],
        )?;
        registry.register(Box::new(key_read_failures.clone()))?;

        Ok(Self {
            tasks_started,
            tasks_completed,
            tasks_duration,
            runner_errors,
            key_read_failures,
            registry,
        })
    }

    /// Create a metrics backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metric families for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Render the current metric families in text exposition format.
    pub fn exposition_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        encoder.encode_to_string(&self.gather())
    }

    /// Underlying registry, for registering custom metrics alongside.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_task_started(&self, runner_type: &str) {
        self.tasks_started.with_label_values(&[runner_type]).inc();
    }

    fn record_task_completed(&self, runner_type: &str, outcome: TaskOutcome, duration_ms: u64) {
        self.tasks_completed
            .with_label_values(&[runner_type, outcome.as_label()])
            .inc();

        let duration_seconds = duration_ms as f64 / 1000.0;
        self.tasks_duration
            .with_label_values(&[runner_type])
            .observe(duration_seconds);
    }

    fn record_runner_error(&self, runner_type: &str, error_kind: &str) {
        self.runner_errors
            .with_label_values(&[runner_type, error_kind])
            .inc();
    }

    fn record_key_read_failed(&self, runner_type: &str) {
        self.key_read_failures
            .with_label_values(&[runner_type])
            .inc();
    }
}
