//! Task runner abstraction: one invocation executes one unit of work for
//! one target and resolves to a report or a descriptive failure.
//!
//! Concrete runners (subprocess, remote batch) live in their own crates and
//! are handed to a [`Run`](crate::Run) behind `Arc<dyn TaskRunner>`.
mod context;
pub use context::RunContext;

mod id;
pub use id::make_run_id;

use async_trait::async_trait;

use fanout_model::{FailureCause, Target, TaskReport};

use crate::report::TargetReporter;

/// Executes exactly one task for one target.
///
/// Implementations must isolate their own failures: every error path resolves
/// to a [`FailureCause`] instead of panicking, so one target's failure never
/// aborts or blocks its siblings.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Runner name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Run the task for `target`, streaming output through `reporter`.
    async fn run(
        &self,
        target: &Target,
        reporter: &TargetReporter,
    ) -> Result<TaskReport, FailureCause>;
}
