use std::sync::atomic::{AtomicU64, Ordering};

/// Global monotonically increasing sequence for run identifiers.
///
/// Local to the current process.
static RUN_SEQ: AtomicU64 = AtomicU64::new(1);

/// Returns next numeric sequence value.
fn next_seq() -> u64 {
    RUN_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// Build a human-readable run id used in task-level logs.
///
/// Format: `{runner}-{target}-{seq:x}`.
/// - `runner` — [`TaskRunner::name`](crate::TaskRunner::name)
/// - `target` — target identifier
/// - `seq`    — per-process hex sequence
pub fn make_run_id(runner_name: &str, target: &str) -> String {
    format!("{runner_name}-{target}-{seq:x}", seq = next_seq())
}
