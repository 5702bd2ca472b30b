//! Concurrency-bounded scheduler.
//!
//! Admits one task per target up to a fixed limit, starts the next task as
//! soon as a slot frees, and resolves "wait until idle" only after every
//! admitted task has finished, whatever its outcome. A task failure is
//! recorded as that target's [`Outcome`] and never cancels siblings.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tracing::{trace, warn};

use fanout_model::{FailureCause, Outcome, Target, TaskReport};

use crate::error::CoreError;

/// Admits tasks under a fixed concurrency limit and tracks their completion.
///
/// Every admitted task's result is explicitly awaited: nothing is
/// fire-and-forget, and a panicking task body is converted into a
/// `Failed` outcome rather than propagating.
pub struct Scheduler {
    semaphore: Arc<Semaphore>,
    tasks: JoinSet<Outcome>,
    targets: HashMap<Id, Target>,
}

impl Scheduler {
    /// Create a scheduler allowing at most `limit` concurrently running tasks.
    ///
    /// The limit may exceed the number of targets that will be admitted.
    pub fn new(limit: usize) -> Result<Self, CoreError> {
        if limit == 0 {
            return Err(CoreError::InvalidConcurrency);
        }
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(limit)),
            tasks: JoinSet::new(),
            targets: HashMap::new(),
        })
    }

    /// Admit one target's task.
    ///
    /// The task is spawned immediately but starts running only once a slot is
    /// free; the permit queue is FIFO, so start order follows admission order
    /// when slots are contended. Each target must be admitted exactly once;
    /// callers admit from a deduplicated [`TargetSet`](fanout_model::TargetSet).
    pub fn admit<F>(&mut self, target: Target, task: F)
    where
        F: Future<Output = Result<TaskReport, FailureCause>> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        let spawned = {
            let target = target.clone();
            self.tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("scheduler semaphore is never closed");
                trace!(target_id = %target, "slot acquired");

                match task.await {
                    Ok(report) => Outcome::success(target, report),
                    Err(cause) => Outcome::failure(target, cause),
                }
            })
        };
        self.targets.insert(spawned.id(), target);
    }

    /// Number of admitted tasks so far.
    pub fn admitted(&self) -> usize {
        self.targets.len()
    }

    /// Suspend until every admitted task has resolved and return all outcomes.
    ///
    /// Consumes the scheduler, so the idle signal fires exactly once. The
    /// returned vector holds exactly one outcome per admitted target, in
    /// completion order. A task that panicked is reported as
    /// [`FailureCause::Panic`] for its target.
    pub async fn wait_idle(mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(self.targets.len());

        while let Some(joined) = self.tasks.join_next_with_id().await {
            let outcome = match joined {
                Ok((id, outcome)) => {
                    self.targets.remove(&id);
                    outcome
                }
                Err(join_err) => {
                    let target = self
                        .targets
                        .remove(&join_err.id())
                        .unwrap_or_else(|| Target::new("unknown"));
                    warn!(target_id = %target, "task aborted abnormally: {join_err}");
                    Outcome::failure(target, FailureCause::Panic(join_err.to_string()))
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::Scheduler;
    use fanout_model::{FailureCause, Target, TaskReport};

    /// Tracks how many tasks overlap and the high-water mark.
    #[derive(Default)]
    struct Gauge {
        current: AtomicUsize,
        max: AtomicUsize,
    }

    impl Gauge {
        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.max.fetch_max(now, Ordering::SeqCst);
        }

        fn leave(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }

        fn high_water(&self) -> usize {
            self.max.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn zero_limit_is_rejected() {
        assert!(matches!(
            Scheduler::new(0),
            Err(crate::CoreError::InvalidConcurrency)
        ));
        assert!(Scheduler::new(1).is_ok());
    }

    #[tokio::test]
    async fn at_most_limit_tasks_run_concurrently() {
        let limit = 3;
        let mut scheduler = Scheduler::new(limit).unwrap();
        let gauge = Arc::new(Gauge::default());

        for i in 0..10 {
            let gauge = Arc::clone(&gauge);
            scheduler.admit(Target::new(format!("net-{i}")), async move {
                gauge.enter();
                tokio::time::sleep(Duration::from_millis(20)).await;
                gauge.leave();
                Ok(TaskReport::empty())
            });
        }

        let outcomes = scheduler.wait_idle().await;
        assert_eq!(outcomes.len(), 10);
        assert!(gauge.high_water() <= limit, "saw {}", gauge.high_water());
        assert!(gauge.high_water() >= 2, "tasks never overlapped");
    }

    #[tokio::test]
    async fn limit_may_exceed_target_count() {
        let mut scheduler = Scheduler::new(64).unwrap();
        for i in 0..3 {
            scheduler.admit(Target::new(format!("net-{i}")), async {
                Ok(TaskReport::empty())
            });
        }

        let outcomes = scheduler.wait_idle().await;
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.is_success()));
    }

    #[tokio::test]
    async fn one_failure_never_blocks_siblings() {
        let mut scheduler = Scheduler::new(2).unwrap();

        scheduler.admit(Target::new("bad"), async {
            Err(FailureCause::NonZeroExit(1))
        });
        for i in 0..5 {
            scheduler.admit(Target::new(format!("ok-{i}")), async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(TaskReport::empty())
            });
        }

        let outcomes = scheduler.wait_idle().await;
        assert_eq!(outcomes.len(), 6);
        assert_eq!(outcomes.iter().filter(|o| !o.is_success()).count(), 1);
        assert_eq!(outcomes.iter().filter(|o| o.is_success()).count(), 5);
    }

    #[tokio::test]
    async fn panicking_task_becomes_failed_outcome() {
        let mut scheduler = Scheduler::new(2).unwrap();

        scheduler.admit(Target::new("boom"), async {
            panic!("runner bug");
        });
        scheduler.admit(Target::new("fine"), async { Ok(TaskReport::empty()) });

        let outcomes = scheduler.wait_idle().await;
        assert_eq!(outcomes.len(), 2);

        let boom = outcomes
            .iter()
            .find(|o| o.target().as_str() == "boom")
            .unwrap();
        assert!(matches!(boom.cause(), Some(FailureCause::Panic(_))));

        let fine = outcomes
            .iter()
            .find(|o| o.target().as_str() == "fine")
            .unwrap();
        assert!(fine.is_success());
    }

    #[tokio::test]
    async fn start_order_follows_admission_order_under_contention() {
        let mut scheduler = Scheduler::new(1).unwrap();
        let started: Arc<std::sync::Mutex<Vec<String>>> = Arc::default();

        for name in ["alpha", "beta", "gamma"] {
            let started = Arc::clone(&started);
            scheduler.admit(Target::new(name), async move {
                started.lock().unwrap().push(name.to_string());
                Ok(TaskReport::empty())
            });
        }

        scheduler.wait_idle().await;
        assert_eq!(*started.lock().unwrap(), ["alpha", "beta", "gamma"]);
    }
}
