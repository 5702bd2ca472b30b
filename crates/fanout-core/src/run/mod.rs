//! Top-level run: a target set, one runner variant, and a concurrency limit.
//!
//! Construction is explicit, with no module-level target lists or globals,
//! so multiple runs can execute in the same process without interference.
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use fanout_model::{RunSummary, TargetLabel, TargetSet};

use crate::error::CoreError;
use crate::metrics::TaskOutcome;
use crate::report::{NoopReport, Report, TargetReporter};
use crate::runner::{RunContext, TaskRunner, make_run_id};
use crate::scheduler::Scheduler;

/// Default concurrency limit for a run.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Explicit configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Ordered, deduplicated units of work.
    pub targets: TargetSet,
    /// Maximum number of concurrently running tasks (>= 1; may exceed the
    /// number of targets).
    pub concurrency: usize,
}

impl RunConfig {
    /// Build a config with an explicit concurrency limit.
    pub fn new(targets: TargetSet, concurrency: usize) -> Self {
        Self {
            targets,
            concurrency,
        }
    }

    /// Check the config before executing.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.targets.is_empty() {
            return Err(CoreError::EmptyTargets);
        }
        if self.concurrency == 0 {
            return Err(CoreError::InvalidConcurrency);
        }
        Ok(())
    }
}

/// One run: fans the configured targets out over a task runner, waits until
/// idle, and aggregates every target's outcome.
pub struct Run {
    config: RunConfig,
    runner: Arc<dyn TaskRunner>,
    report: Arc<dyn Report>,
    ctx: RunContext,
}

impl Run {
    /// Create a run with a silent reporter and default context.
    pub fn new(config: RunConfig, runner: Arc<dyn TaskRunner>) -> Self {
        Self {
            config,
            runner,
            report: Arc::new(NoopReport),
            ctx: RunContext::default(),
        }
    }

    /// Attach an output reporter.
    pub fn with_report(mut self, report: Arc<dyn Report>) -> Self {
        self.report = report;
        self
    }

    /// Attach a shared context (environment, metrics).
    pub fn with_context(mut self, ctx: RunContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Admit every target, wait until idle, and aggregate outcomes.
    ///
    /// Per-target failures are reported as they resolve and again in the
    /// returned summary; they never abort the run.
    pub async fn execute(self) -> Result<RunSummary, CoreError> {
        self.config.validate()?;

        let mut scheduler = Scheduler::new(self.config.concurrency)?;
        info!(
            targets = self.config.targets.len(),
            limit = self.config.concurrency,
            runner = self.runner.name(),
            "run starting"
        );

        for target in self.config.targets.iter() {
            let label = self
                .config
                .targets
                .label_of(target)
                .unwrap_or_else(|| TargetLabel::detached(target.clone()));
            let reporter = TargetReporter::new(Arc::clone(&self.report), label);
            let runner = Arc::clone(&self.runner);
            let metrics = Arc::clone(self.ctx.metrics());
            let run_id = make_run_id(runner.name(), target.as_str());
            let target = target.clone();

            scheduler.admit(target.clone(), async move {
                debug!(task = %run_id, target_id = %target, "task starting");
                metrics.record_task_started(runner.name());
                let started = Instant::now();

                let result = runner.run(&target, &reporter).await;

                let elapsed_ms = started.elapsed().as_millis() as u64;
                match &result {
                    Ok(_) => {
                        reporter.status("completed successfully");
                        metrics.record_task_completed(
                            runner.name(),
                            TaskOutcome::Success,
                            elapsed_ms,
                        );
                    }
                    Err(cause) => {
                        reporter.status(&format!("failed: {cause}"));
                        metrics.record_task_completed(
                            runner.name(),
                            TaskOutcome::Failure,
                            elapsed_ms,
                        );
                    }
                }
                result
            });
        }

        let summary = RunSummary::new(scheduler.wait_idle().await);
        for outcome in summary.failed() {
            if let Some(cause) = outcome.cause() {
                warn!(target_id = %outcome.target(), %cause, "target failed");
            }
        }
        info!(
            succeeded = summary.succeeded().count(),
            failed = summary.failed().count(),
            "run finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{Run, RunConfig};
    use crate::metrics::{MetricsBackend, TaskOutcome};
    use crate::report::TargetReporter;
    use crate::runner::{RunContext, TaskRunner};
    use fanout_model::{FailureCause, Target, TargetSet, TaskReport};

    /// Runner that simulates the subprocess variant: per-target exit codes.
    struct ExitCodeRunner {
        codes: Vec<(&'static str, i32)>,
        current: AtomicUsize,
        max: AtomicUsize,
    }

    impl ExitCodeRunner {
        fn new(codes: Vec<(&'static str, i32)>) -> Self {
            Self {
                codes,
                current: AtomicUsize::new(0),
                max: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TaskRunner for ExitCodeRunner {
        fn name(&self) -> &'static str {
            "exit-code"
        }

        async fn run(
            &self,
            target: &Target,
            _reporter: &TargetReporter,
        ) -> Result<TaskReport, FailureCause> {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);

            let code = self
                .codes
                .iter()
                .find(|(name, _)| *name == target.as_str())
                .map(|(_, code)| *code)
                .unwrap_or(0);
            match code {
                0 => Ok(TaskReport::empty()),
                n => Err(FailureCause::NonZeroExit(n)),
            }
        }
    }

    #[derive(Default)]
    struct CountingMetrics {
        started: AtomicUsize,
        success: AtomicUsize,
        failure: AtomicUsize,
    }

    impl MetricsBackend for CountingMetrics {
        fn record_task_started(&self, _: &str) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }

        fn record_task_completed(&self, _: &str, outcome: TaskOutcome, _: u64) {
            match outcome {
                TaskOutcome::Success => self.success.fetch_add(1, Ordering::SeqCst),
                TaskOutcome::Failure => self.failure.fetch_add(1, Ordering::SeqCst),
            };
        }

        fn record_runner_error(&self, _: &str, _: &str) {}
        fn record_key_read_failed(&self, _: &str) {}
    }

    fn targets(names: &[&str]) -> TargetSet {
        TargetSet::new(names.iter().map(|n| Target::new(*n)))
    }

    #[tokio::test]
    async fn end_to_end_alpha_beta_gamma_with_limit_two() {
        let runner = Arc::new(ExitCodeRunner::new(vec![
            ("alpha", 0),
            ("beta", 1),
            ("gamma", 0),
        ]));

        let summary = Run::new(
            RunConfig::new(targets(&["alpha", "beta", "gamma"]), 2),
            runner.clone(),
        )
        .execute()
        .await
        .unwrap();

        assert_eq!(summary.len(), 3);
        assert!(!summary.overall_success());
        assert_eq!(summary.exit_code(), 1);

        let failed: Vec<_> = summary.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].target().as_str(), "beta");
        assert_eq!(failed[0].cause().unwrap().to_string(), "exit code 1");

        assert!(runner.max.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn empty_target_set_is_rejected() {
        let runner = Arc::new(ExitCodeRunner::new(Vec::new()));
        let res = Run::new(RunConfig::new(TargetSet::default(), 2), runner)
            .execute()
            .await;
        assert!(matches!(res, Err(crate::CoreError::EmptyTargets)));
    }

    #[tokio::test]
    async fn metrics_see_every_task_exactly_once() {
        let metrics = Arc::new(CountingMetrics::default());
        let runner = Arc::new(ExitCodeRunner::new(vec![("beta", 127)]));

        Run::new(RunConfig::new(targets(&["alpha", "beta", "gamma"]), 3), runner)
            .with_context(RunContext::default().with_metrics(metrics.clone()))
            .execute()
            .await
            .unwrap();

        assert_eq!(metrics.started.load(Ordering::SeqCst), 3);
        assert_eq!(metrics.success.load(Ordering::SeqCst), 2);
        assert_eq!(metrics.failure.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn status_lines_are_reported_per_target() {
        use crate::report::Report;
        use fanout_model::TargetLabel;

        #[derive(Default)]
        struct StatusSink(Mutex<Vec<String>>);

        impl Report for StatusSink {
            fn stdout_line(&self, _: &TargetLabel, _: &str) {}
            fn stderr_line(&self, _: &TargetLabel, _: &str) {}
            fn status(&self, label: &TargetLabel, message: &str) {
                self.0
                    .lock()
                    .unwrap()
                    .push(format!("{} {message}", label.prefix()));
            }
        }

        let sink = Arc::new(StatusSink::default());
        let runner = Arc::new(ExitCodeRunner::new(vec![("beta", 1)]));

        Run::new(RunConfig::new(targets(&["alpha", "beta"]), 2), runner)
            .with_report(sink.clone())
            .execute()
            .await
            .unwrap();

        let mut lines = sink.0.lock().unwrap().clone();
        lines.sort();
        assert_eq!(
            lines,
            vec![
                "[alpha] completed successfully".to_string(),
                "[beta] failed: exit code 1".to_string(),
            ]
        );
    }
}
