pub mod error;
pub mod metrics;
pub mod report;
pub mod run;
pub mod runner;
pub mod scheduler;

pub use error::CoreError;
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, TaskOutcome, noop_metrics};
pub use report::{NoopReport, Report, TargetReporter};
pub use run::{DEFAULT_CONCURRENCY, Run, RunConfig};
pub use runner::{RunContext, TaskRunner, make_run_id};
pub use scheduler::Scheduler;

pub mod prelude {
    pub use crate::error::CoreError;
    pub use crate::report::{Report, TargetReporter};
    pub use crate::run::{Run, RunConfig};
    pub use crate::runner::{RunContext, TaskRunner};
    pub use crate::scheduler::Scheduler;
}
