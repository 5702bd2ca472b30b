use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "fanout",
    version,
    about = "Fan a task out over a set of targets with bounded concurrency"
)]
pub struct Cli {
    /// Log output format: text, json or journald.
    #[arg(long, global = true, default_value = "text")]
    pub log_format: String,

    /// Log level filter expression, e.g. "info" or "fanout_core=debug,info".
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Disable colored task output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Write the Prometheus text exposition to this file after the run.
    #[arg(long, global = true, value_name = "PATH")]
    pub metrics: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one subprocess per target.
    Run(RunArgs),
    /// Refresh a config document from each target's remote store.
    Refresh(RefreshArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Target identifiers; repeatable, comma lists allowed.
    #[arg(short, long = "target", value_delimiter = ',', required = true)]
    pub targets: Vec<String>,

    /// Maximum number of concurrently running tasks.
    #[arg(short, long, default_value_t = fanout_core::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Working directory for every spawned command.
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Extra KEY=VALUE environment entries for every spawned command.
    #[arg(short, long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Do not keep a full stdout copy per task.
    #[arg(long)]
    pub no_capture: bool,

    /// Command template; every `{target}` is replaced per target.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Path to the JSON config document.
    #[arg(long)]
    pub config: PathBuf,

    /// Keys to read for every target; repeatable, comma lists allowed.
    #[arg(short, long = "key", value_delimiter = ',', required = true)]
    pub keys: Vec<String>,

    /// Document key holding the store contract address.
    #[arg(long, default_value = fanout_rpc::DEFAULT_ADDRESS_KEY)]
    pub address_key: String,

    /// JSON-RPC method used to read one key.
    #[arg(long, default_value = fanout_rpc::DEFAULT_READ_METHOD)]
    pub method: String,

    /// Maximum number of concurrently refreshed targets.
    #[arg(short, long, default_value_t = fanout_core::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}
