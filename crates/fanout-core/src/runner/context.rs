use std::fmt;

use fanout_model::Env;

use crate::metrics::MetricsHandle;

/// Shared dependencies injected into runners and runs at construction.
#[derive(Clone)]
pub struct RunContext {
    env: Env,
    metrics: MetricsHandle,
}

impl RunContext {
    /// Create a new context with the given params.
    pub fn new(env: Env, metrics: MetricsHandle) -> Self {
        Self { env, metrics }
    }

    /// Get a reference to the shared environment.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Get a clonable handle to the metrics backend.
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Replace the environment and return the updated context.
    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Replace the metrics backend and return the updated context.
    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            env: Env::default(),
            metrics: crate::metrics::noop_metrics(),
        }
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("env_len", &self.env.len())
            .field("metrics", &"<handle>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::RunContext;
    use fanout_model::Env;

    #[test]
    fn default_context_has_empty_env_and_noop_metrics() {
        let ctx = RunContext::default();
        assert!(ctx.env().is_empty());
        ctx.metrics().record_task_started("test");
    }

    #[test]
    fn with_env_replaces_existing_env() {
        let mut env = Env::new();
        env.push("BASE_RPC_URL", "https://rpc.example");

        let ctx = RunContext::default().with_env(env);
        assert_eq!(ctx.env().get("BASE_RPC_URL"), Some("https://rpc.example"));
    }
}
