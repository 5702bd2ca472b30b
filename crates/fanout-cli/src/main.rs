mod args;
mod commands;

use std::sync::Arc;

use clap::Parser;
use tracing::debug;

use fanout_core::RunContext;
use fanout_observe::{ConsoleReport, LoggerConfig, LoggerLevel, init_local_offset, init_logger};
use fanout_prometheus::PrometheusMetrics;

use crate::args::{Cli, Command};

fn main() {
    // Local offset detection only works before any thread spawns, so this
    // precedes the runtime.
    init_local_offset();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let logger = LoggerConfig {
        format: cli.log_format.parse()?,
        level: LoggerLevel::new(&cli.log_level)?,
        use_color: !cli.no_color,
        ..Default::default()
    };
    init_logger(&logger)?;

    let metrics = PrometheusMetrics::new()?;
    let ctx = RunContext::default().with_metrics(Arc::new(metrics.clone()));
    let report = Arc::new(if cli.no_color {
        ConsoleReport::new(false)
    } else {
        ConsoleReport::auto()
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let code = match cli.command {
        Command::Run(a) => runtime.block_on(commands::run(a, ctx, report))?,
        Command::Refresh(a) => runtime.block_on(commands::refresh(a, ctx, report))?,
    };

    if let Some(path) = &cli.metrics {
        std::fs::write(path, metrics.exposition_text()?)?;
        debug!(path = %path.display(), "metrics written");
    }

    Ok(code)
}
