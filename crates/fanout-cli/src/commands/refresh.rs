use std::sync::Arc;

use tracing::info;

use fanout_core::{Report, RunContext};
use fanout_model::ConfigDocument;
use fanout_rpc::{RefreshSpec, refresh_document};

use crate::args::RefreshArgs;

pub async fn refresh(
    args: RefreshArgs,
    ctx: RunContext,
    report: Arc<dyn Report>,
) -> anyhow::Result<i32> {
    let mut doc = ConfigDocument::load(&args.config)?;

    let mut spec = RefreshSpec::new(args.keys);
    spec.address_key = args.address_key;
    spec.method = args.method;
    spec.concurrency = args.concurrency;

    let result = refresh_document(&mut doc, &spec, &ctx, report).await;

    // Persist whatever was merged, even when the run errored out early.
    doc.save(&args.config)?;
    info!(path = %args.config.display(), "document saved");

    let summary = result?;
    Ok(summary.exit_code())
}
