use serde::{Deserialize, Serialize};

use crate::Outcome;

/// Final aggregation of one run: every target's outcome, in completion order.
///
/// Built once after the scheduler drains; overall status is success only if
/// every single outcome succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSummary {
    outcomes: Vec<Outcome>,
}

impl RunSummary {
    /// Wrap the full, final set of outcomes.
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self { outcomes }
    }

    /// All recorded outcomes.
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns `true` when no outcomes were recorded.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Iterate over succeeded outcomes.
    pub fn succeeded(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    /// Iterate over failed outcomes.
    pub fn failed(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Overall status: success only if every target succeeded.
    pub fn overall_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_success)
    }

    /// Process exit code for this run: 0 on overall success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.overall_success() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::RunSummary;
    use crate::{FailureCause, Outcome, Target, TaskReport};

    fn mixed_summary() -> RunSummary {
        RunSummary::new(vec![
            Outcome::success(Target::new("alpha"), TaskReport::empty()),
            Outcome::failure(Target::new("beta"), FailureCause::NonZeroExit(1)),
            Outcome::success(Target::new("gamma"), TaskReport::empty()),
        ])
    }

    #[test]
    fn overall_success_requires_every_target() {
        let summary = mixed_summary();
        assert!(!summary.overall_success());
        assert_eq!(summary.exit_code(), 1);

        let all_ok = RunSummary::new(vec![Outcome::success(
            Target::new("alpha"),
            TaskReport::empty(),
        )]);
        assert!(all_ok.overall_success());
        assert_eq!(all_ok.exit_code(), 0);
    }

    #[test]
    fn failed_iterator_lists_targets_and_causes() {
        let summary = mixed_summary();
        let failed: Vec<_> = summary.failed().collect();

        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].target().as_str(), "beta");
        assert_eq!(failed[0].cause().unwrap().to_string(), "exit code 1");
    }

    #[test]
    fn empty_summary_is_successful() {
        let summary = RunSummary::default();
        assert!(summary.overall_success());
        assert_eq!(summary.exit_code(), 0);
    }
}
