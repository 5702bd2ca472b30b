//! Subprocess task runner.
//!
//! Runs one external command per target, substituting the target identifier
//! into a command template, and streams the child's output through the
//! per-target reporter as it arrives.
mod error;
pub use error::ExecError;

mod template;
pub use template::{CommandTemplate, RenderedCommand, TARGET_PLACEHOLDER};

mod runner;
pub use runner::{SubprocessRunner, SubprocessSpec};

/// Subprocess runner type identifier for logs and metrics.
pub const RUNNER_TYPE_SUBPROCESS: &str = "subprocess";
