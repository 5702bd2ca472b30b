use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, trace};

use fanout_core::{RunContext, TargetReporter, TaskRunner};
use fanout_model::{Env, FailureCause, Flag, Target, TaskReport};

use crate::template::CommandTemplate;

/// What to run per target and how.
#[derive(Debug, Clone)]
pub struct SubprocessSpec {
    /// Command template with the `{target}` placeholder.
    pub template: CommandTemplate,
    /// Extra environment on top of the shared context environment.
    pub env: Env,
    /// Working directory; inherits the parent's when `None`.
    pub cwd: Option<PathBuf>,
    /// Whether to keep a full stdout copy in the task report.
    pub capture: Flag,
}

impl SubprocessSpec {
    /// Spec with defaults: no extra env, inherited cwd, capture enabled.
    pub fn new(template: CommandTemplate) -> Self {
        Self {
            template,
            env: Env::default(),
            cwd: None,
            capture: Flag::enabled(),
        }
    }

    /// Add task-level environment entries.
    pub fn with_env(mut self, env: Env) -> Self {
        self.env = env;
        self
    }

    /// Set the working directory.
    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    /// Enable or disable full-output capture.
    pub fn with_capture(mut self, capture: Flag) -> Self {
        self.capture = capture;
        self
    }
}

/// Task runner that executes one OS subprocess per target.
///
/// Each child owns its own stdio pipes; both streams are forwarded line by
/// line through the reporter as they arrive, never buffered until the end.
/// The child is reaped on every path and reader tasks are joined so the
/// pipes are drained and closed.
pub struct SubprocessRunner {
    spec: SubprocessSpec,
    env: Env,
    ctx: RunContext,
}

impl SubprocessRunner {
    /// Create a runner from a spec and shared context.
    ///
    /// The effective environment is the context environment merged with the
    /// spec's, task-level entries overriding shared ones.
    pub fn new(spec: SubprocessSpec, ctx: &RunContext) -> Self {
        let env = ctx.env().merged(&spec.env);
        Self {
            spec,
            env,
            ctx: ctx.clone(),
        }
    }
}

#[async_trait]
impl TaskRunner for SubprocessRunner {
    fn name(&self) -> &'static str {
        crate::RUNNER_TYPE_SUBPROCESS
    }

    async fn run(
        &self,
        target: &Target,
        reporter: &TargetReporter,
    ) -> Result<TaskReport, FailureCause> {
        let rendered = self.spec.template.render(target);
        trace!(
            target_id = %target,
            command = %rendered.program(),
            args = ?rendered.args(),
            cwd = ?self.spec.cwd,
            env_len = self.env.len(),
            "spawning subprocess",
        );
        reporter.status(&format!("running `{rendered}`"));

        let mut cmd = Command::new(rendered.program());
        cmd.args(rendered.args());
        if let Some(cwd) = &self.spec.cwd {
            cmd.current_dir(cwd);
        }
        for kv in self.env.iter() {
            cmd.env(kv.key(), kv.value());
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // Backstop: the scheduler never cancels tasks, but if this future is
        // dropped mid-run the child must not outlive it.
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            self.ctx
                .metrics()
                .record_runner_error(self.name(), "spawn_failed");
            FailureCause::Spawn(e.to_string())
        })?;

        let capture = self.spec.capture.is_enabled();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let out_task = {
            let reporter = reporter.clone();
            tokio::spawn(async move {
                forward_lines(stdout, capture, move |line| reporter.line(line)).await
            })
        };
        let err_task = {
            let reporter = reporter.clone();
            tokio::spawn(async move {
                forward_lines(stderr, false, move |line| {
                    reporter.error_line(&format!("Error: {line}"))
                })
                .await
            })
        };

        // Wait first, then join the readers: they finish once the pipes hit
        // EOF, which the exit guarantees.
        let status = child.wait().await;
        let captured = out_task.await.unwrap_or_default();
        let _ = err_task.await;

        let status = status.map_err(|e| {
            self.ctx
                .metrics()
                .record_runner_error(self.name(), "wait_failed");
            FailureCause::Other(format!("wait failed: {e}"))
        })?;

        match status.code() {
            Some(0) => {
                debug!(target_id = %target, "subprocess exited successfully");
                if capture {
                    Ok(TaskReport::with_captured(captured))
                } else {
                    Ok(TaskReport::empty())
                }
            }
            Some(code) => Err(FailureCause::NonZeroExit(code)),
            None => Err(FailureCause::Signal),
        }
    }
}

/// Forward a child stream to the reporter line by line.
///
/// Returns the accumulated copy when `capture` is set, otherwise an empty
/// string. Read errors end forwarding; the exit status is the source of
/// truth for the task outcome.
async fn forward_lines<R>(stream: Option<R>, capture: bool, mut emit: impl FnMut(&str)) -> String
where
    R: AsyncRead + Unpin,
{
    let mut captured = String::new();
    let Some(stream) = stream else {
        return captured;
    };

    let mut lines = BufReader::new(stream).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                emit(&line);
                if capture {
                    captured.push_str(&line);
                    captured.push('\n');
                }
            }
            Ok(None) => break,
            Err(e) => {
                trace!("stream read ended: {e}");
                break;
            }
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{SubprocessRunner, SubprocessSpec};
    use crate::template::CommandTemplate;
    use fanout_core::{Report, RunContext, TargetReporter, TaskRunner};
    use fanout_model::{FailureCause, Target, TargetLabel};

    #[derive(Default)]
    struct Collecting {
        out: Mutex<Vec<String>>,
        err: Mutex<Vec<String>>,
    }

    impl Report for Collecting {
        fn stdout_line(&self, _: &TargetLabel, line: &str) {
            self.out.lock().unwrap().push(line.to_string());
        }

        fn stderr_line(&self, _: &TargetLabel, line: &str) {
            self.err.lock().unwrap().push(line.to_string());
        }

        fn status(&self, _: &TargetLabel, _: &str) {}
    }

    fn runner_for(template: &str) -> (SubprocessRunner, Arc<Collecting>, TargetReporter) {
        let spec = SubprocessSpec::new(CommandTemplate::parse(template).unwrap());
        let runner = SubprocessRunner::new(spec, &RunContext::default());
        let sink = Arc::new(Collecting::default());
        let reporter = TargetReporter::new(sink.clone(), TargetLabel::detached(Target::new("alpha")));
        (runner, sink, reporter)
    }

    #[tokio::test]
    async fn exit_zero_succeeds_and_streams_stdout() {
        let (runner, sink, reporter) = runner_for("echo hello {target}");

        let report = runner.run(&Target::new("alpha"), &reporter).await.unwrap();

        assert_eq!(*sink.out.lock().unwrap(), vec!["hello alpha".to_string()]);
        assert_eq!(report.captured.as_deref(), Some("hello alpha\n"));
    }

    #[tokio::test]
    async fn nonzero_exit_carries_the_code() {
        let spec = SubprocessSpec::new(
            CommandTemplate::new("sh", ["-c".to_string(), "exit 7".to_string()]).unwrap(),
        );
        let runner = SubprocessRunner::new(spec, &RunContext::default());
        let sink = Arc::new(Collecting::default());
        let reporter =
            TargetReporter::new(sink, TargetLabel::detached(Target::new("alpha")));

        let err = runner
            .run(&Target::new("alpha"), &reporter)
            .await
            .unwrap_err();
        assert_eq!(err, FailureCause::NonZeroExit(7));
        assert_eq!(err.to_string(), "exit code 7");
    }

    #[tokio::test]
    async fn stderr_is_forwarded_with_error_marker() {
        let spec = SubprocessSpec::new(
            CommandTemplate::new(
                "sh",
                ["-c".to_string(), "echo oops 1>&2; exit 1".to_string()],
            )
            .unwrap(),
        );
        let runner = SubprocessRunner::new(spec, &RunContext::default());
        let sink = Arc::new(Collecting::default());
        let reporter =
            TargetReporter::new(sink.clone(), TargetLabel::detached(Target::new("alpha")));

        let err = runner
            .run(&Target::new("alpha"), &reporter)
            .await
            .unwrap_err();

        assert_eq!(err, FailureCause::NonZeroExit(1));
        assert_eq!(*sink.err.lock().unwrap(), vec!["Error: oops".to_string()]);
    }

    #[tokio::test]
    async fn missing_command_is_a_spawn_failure() {
        let (runner, _sink, reporter) = runner_for("definitely-not-a-real-command-3141");

        let err = runner
            .run(&Target::new("alpha"), &reporter)
            .await
            .unwrap_err();
        assert!(matches!(err, FailureCause::Spawn(_)));
    }

    #[tokio::test]
    async fn capture_can_be_disabled() {
        use fanout_model::Flag;

        let spec = SubprocessSpec::new(CommandTemplate::parse("echo quiet").unwrap())
            .with_capture(Flag::disabled());
        let runner = SubprocessRunner::new(spec, &RunContext::default());
        let sink = Arc::new(Collecting::default());
        let reporter =
            TargetReporter::new(sink.clone(), TargetLabel::detached(Target::new("alpha")));

        let report = runner.run(&Target::new("alpha"), &reporter).await.unwrap();

        // Still streamed live, just not accumulated.
        assert_eq!(*sink.out.lock().unwrap(), vec!["quiet".to_string()]);
        assert!(report.captured.is_none());
    }

    #[tokio::test]
    async fn env_entries_reach_the_child() {
        use fanout_model::Env;

        let mut env = Env::new();
        env.push("FANOUT_TEST_VALUE", "42");

        let spec = SubprocessSpec::new(
            CommandTemplate::new("sh", ["-c".to_string(), "echo $FANOUT_TEST_VALUE".to_string()])
                .unwrap(),
        )
        .with_env(env);
        let runner = SubprocessRunner::new(spec, &RunContext::default());
        let sink = Arc::new(Collecting::default());
        let reporter =
            TargetReporter::new(sink.clone(), TargetLabel::detached(Target::new("alpha")));

        runner.run(&Target::new("alpha"), &reporter).await.unwrap();
        assert_eq!(*sink.out.lock().unwrap(), vec!["42".to_string()]);
    }
}
