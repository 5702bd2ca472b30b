use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{KeyValues, Target};

/// Why a task failed.
///
/// Rendered causes are what the final summary prints, so each variant keeps
/// a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "detail")]
pub enum FailureCause {
    /// The external command could not be started at all.
    #[error("spawn failed: {0}")]
    Spawn(String),

    /// The external command ran and reported failure.
    #[error("exit code {0}")]
    NonZeroExit(i32),

    /// The external command was terminated by a signal and has no exit code.
    #[error("terminated by signal")]
    Signal,

    /// No remote endpoint could be constructed for the target.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The task body panicked; recorded instead of propagating.
    #[error("task panicked: {0}")]
    Panic(String),

    /// Anything else a runner wants to report verbatim.
    #[error("{0}")]
    Other(String),
}

/// Payload of a successful task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    /// Full captured output, when the runner accumulates one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured: Option<String>,

    /// Fetched key–value mapping (remote batch variant).
    #[serde(default, skip_serializing_if = "KeyValues::is_empty")]
    pub values: KeyValues,
}

impl TaskReport {
    /// Report with no payload.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Report carrying a full captured output copy.
    pub fn with_captured(captured: impl Into<String>) -> Self {
        Self {
            captured: Some(captured.into()),
            values: KeyValues::new(),
        }
    }

    /// Report carrying a fetched value mapping.
    pub fn with_values(values: KeyValues) -> Self {
        Self {
            captured: None,
            values,
        }
    }
}

/// How a task resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    Succeeded(TaskReport),
    Failed(FailureCause),
}

/// Recorded result of one task against one target.
///
/// Outcomes are append-only: recorded exactly once per target and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    target: Target,
    status: TaskStatus,
}

impl Outcome {
    /// Record a success.
    pub fn success(target: Target, report: TaskReport) -> Self {
        Self {
            target,
            status: TaskStatus::Succeeded(report),
        }
    }

    /// Record a failure with its cause.
    pub fn failure(target: Target, cause: FailureCause) -> Self {
        Self {
            target,
            status: TaskStatus::Failed(cause),
        }
    }

    /// The target this outcome belongs to.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The recorded status.
    pub fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns `true` for a succeeded task.
    pub fn is_success(&self) -> bool {
        matches!(self.status, TaskStatus::Succeeded(_))
    }

    /// The failure cause, if the task failed.
    pub fn cause(&self) -> Option<&FailureCause> {
        match &self.status {
            TaskStatus::Failed(cause) => Some(cause),
            TaskStatus::Succeeded(_) => None,
        }
    }

    /// The success report, if the task succeeded.
    pub fn report(&self) -> Option<&TaskReport> {
        match &self.status {
            TaskStatus::Succeeded(report) => Some(report),
            TaskStatus::Failed(_) => None,
        }
    }
}
