use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use fanout_core::{RunContext, TargetReporter, TaskRunner};
use fanout_model::{FailureCause, KeyValues, Target, TaskReport};

use crate::client::StoreConnector;

/// Task runner that reads a batch of configuration keys from one remote
/// store per target.
///
/// The per-key reads inside one task fan out all at once; only the number of
/// concurrently running targets is bounded, by the scheduler above. A failed
/// key is reported and left out of the resulting value map, so the caller
/// never overwrites a previously known value with garbage. Only the
/// connection phase can fail the target as a whole.
pub struct RemoteBatchRunner {
    connector: Arc<dyn StoreConnector>,
    keys: Vec<String>,
    ctx: RunContext,
}

impl RemoteBatchRunner {
    /// Create a runner reading `keys` through `connector`.
    pub fn new(
        connector: Arc<dyn StoreConnector>,
        keys: impl IntoIterator<Item = String>,
        ctx: &RunContext,
    ) -> Self {
        Self {
            connector,
            keys: keys.into_iter().collect(),
            ctx: ctx.clone(),
        }
    }
}

#[async_trait]
impl TaskRunner for RemoteBatchRunner {
    fn name(&self) -> &'static str {
        crate::RUNNER_TYPE_REMOTE_BATCH
    }

    async fn run(
        &self,
        target: &Target,
        reporter: &TargetReporter,
    ) -> Result<TaskReport, FailureCause> {
        let reader = self.connector.connect(target).await.map_err(|e| {
            self.ctx
                .metrics()
                .record_runner_error(self.name(), "connect_failed");
            reporter.error_line(&format!("Error: {e}"));
            FailureCause::Connect(e.to_string())
        })?;
        reporter.status(&format!("reading {} keys", self.keys.len()));

        let mut reads = JoinSet::new();
        for key in self.keys.clone() {
            let reader = Arc::clone(&reader);
            reads.spawn(async move {
                let result = reader.read(&key).await;
                (key, result)
            });
        }

        let mut values = KeyValues::new();
        while let Some(joined) = reads.join_next().await {
            match joined {
                Ok((key, Ok(value))) => {
                    debug!(target_id = %target, %key, "key read");
                    reporter.line(&format!("{key} = {value}"));
                    values.insert(key, value);
                }
                Ok((key, Err(e))) => {
                    warn!(target_id = %target, %key, "key read failed: {e}");
                    reporter.error_line(&format!("Error reading {key}: {e}"));
                    self.ctx.metrics().record_key_read_failed(self.name());
                }
                Err(e) => {
                    warn!(target_id = %target, "key read task failed: {e}");
                    self.ctx
                        .metrics()
                        .record_runner_error(self.name(), "read_task_failed");
                }
            }
        }

        Ok(TaskReport::with_values(values))
    }
}
