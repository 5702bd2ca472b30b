use std::sync::Arc;

use anyhow::Context;

use fanout_core::{Report, Run, RunConfig, RunContext};
use fanout_exec::{CommandTemplate, SubprocessRunner, SubprocessSpec};
use fanout_model::{Env, Flag, KeyValue, Target, TargetSet};

use crate::args::RunArgs;

pub async fn run(args: RunArgs, ctx: RunContext, report: Arc<dyn Report>) -> anyhow::Result<i32> {
    let targets = TargetSet::new(args.targets.into_iter().map(Target::new));

    let mut parts = args.command.into_iter();
    let program = parts.next().context("empty command template")?;
    let template = CommandTemplate::new(program, parts)?;

    let env: Env = args
        .env
        .iter()
        .map(|s| KeyValue::parse(s))
        .collect::<Result<_, _>>()?;

    let mut spec = SubprocessSpec::new(template).with_env(env);
    if let Some(cwd) = args.cwd {
        spec = spec.with_cwd(cwd);
    }
    if args.no_capture {
        spec = spec.with_capture(Flag::disabled());
    }

    let runner = Arc::new(SubprocessRunner::new(spec, &ctx));
    let summary = Run::new(RunConfig::new(targets, args.concurrency), runner)
        .with_report(report)
        .with_context(ctx)
        .execute()
        .await?;

    Ok(summary.exit_code())
}
