//! Output attribution seam between runners and the console.
//!
//! Runners never print directly; they hand lines to a [`TargetReporter`],
//! which carries the target's stable label. Reporting is purely
//! observational and must never affect scheduling or outcomes.
use std::sync::Arc;

use fanout_model::{Target, TargetLabel};

/// Sink for labeled per-target output.
///
/// The console implementation lives in `fanout-observe`; tests use
/// [`NoopReport`] or a collecting fake.
pub trait Report: Send + Sync {
    /// One line of a task's standard output.
    fn stdout_line(&self, label: &TargetLabel, line: &str);

    /// One line of a task's standard error.
    fn stderr_line(&self, label: &TargetLabel, line: &str);

    /// Task lifecycle note (started, completed, failed).
    fn status(&self, label: &TargetLabel, message: &str);
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReport;

impl Report for NoopReport {
    fn stdout_line(&self, _: &TargetLabel, _: &str) {}
    fn stderr_line(&self, _: &TargetLabel, _: &str) {}
    fn status(&self, _: &TargetLabel, _: &str) {}
}

/// Per-target handle binding a [`Report`] sink to one target's label.
///
/// Cloned into the task; every emitted line goes out already attributed.
#[derive(Clone)]
pub struct TargetReporter {
    report: Arc<dyn Report>,
    label: TargetLabel,
}

impl TargetReporter {
    /// Bind a sink to one target's label.
    pub fn new(report: Arc<dyn Report>, label: TargetLabel) -> Self {
        Self { report, label }
    }

    /// The target this reporter is bound to.
    pub fn target(&self) -> &Target {
        self.label.target()
    }

    /// The assigned label.
    pub fn label(&self) -> &TargetLabel {
        &self.label
    }

    /// Forward one stdout line.
    pub fn line(&self, line: &str) {
        self.report.stdout_line(&self.label, line);
    }

    /// Forward one stderr line.
    pub fn error_line(&self, line: &str) {
        self.report.stderr_line(&self.label, line);
    }

    /// Forward a lifecycle note.
    pub fn status(&self, message: &str) {
        self.report.status(&self.label, message);
    }
}
