//! Document refresh: wire a remote batch run from a config document and fold
//! the successful outcomes back into it.
use std::sync::Arc;

use tracing::{info, warn};

use fanout_core::{DEFAULT_CONCURRENCY, Report, Run, RunConfig, RunContext};
use fanout_model::{ConfigDocument, RunSummary, Target, TargetSet};

use crate::error::ConnectError;
use crate::http::{HttpEndpoint, HttpStoreConnector};
use crate::runner::RemoteBatchRunner;

/// Environment variable suffix carrying each target's node URL.
///
/// The full name is derived per target, e.g. `BASE_SEPOLIA_RPC_URL`.
pub const RPC_URL_SUFFIX: &str = "RPC_URL";

/// Parameters for one refresh pass over a document.
#[derive(Debug, Clone)]
pub struct RefreshSpec {
    /// Keys to read for every target.
    pub keys: Vec<String>,
    /// Document key holding the store contract address.
    pub address_key: String,
    /// JSON-RPC method used to read one key.
    pub method: String,
    /// Concurrency limit for the run.
    pub concurrency: usize,
}

impl RefreshSpec {
    pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            address_key: crate::DEFAULT_ADDRESS_KEY.to_string(),
            method: crate::DEFAULT_READ_METHOD.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Resolve one target's endpoint: the node URL comes from the environment,
/// the store address from the document itself.
pub fn resolve_endpoint(
    doc: &ConfigDocument,
    target: &Target,
    address_key: &str,
) -> Result<HttpEndpoint, ConnectError> {
    let var = target.env_var(RPC_URL_SUFFIX);
    let url = std::env::var(&var).map_err(|_| ConnectError::MissingRpcUrl(var))?;
    let address = doc
        .get_str(target, address_key)
        .ok_or_else(|| ConnectError::MissingAddress {
            target: target.as_str().to_string(),
            key: address_key.to_string(),
        })?;
    Ok(HttpEndpoint::new(url, address))
}

/// Build a connector for every target in the document.
///
/// A target whose endpoint cannot be resolved is left unregistered; its task
/// then hard-fails at connect time instead of silently disappearing from the
/// run.
pub fn connector_from_document(
    doc: &ConfigDocument,
    spec: &RefreshSpec,
) -> (HttpStoreConnector, TargetSet) {
    let targets = doc.targets();
    let mut connector = HttpStoreConnector::new(spec.method.clone());
    for target in targets.iter() {
        match resolve_endpoint(doc, target, &spec.address_key) {
            Ok(endpoint) => connector.insert(target, endpoint),
            Err(e) => warn!(target_id = %target, "endpoint unresolved: {e}"),
        }
    }
    (connector, targets)
}

/// Fold every successful outcome's values into the document.
///
/// Failed targets contribute nothing, so their entries keep every prior
/// value.
pub fn merge_outcomes(doc: &mut ConfigDocument, summary: &RunSummary) {
    for outcome in summary.succeeded() {
        if let Some(report) = outcome.report() {
            doc.apply(outcome.target(), &report.values);
        }
    }
}

/// Run one refresh pass and merge the results into `doc`.
///
/// The caller persists the document afterwards, whether or not every target
/// succeeded; partial results are kept.
pub async fn refresh_document(
    doc: &mut ConfigDocument,
    spec: &RefreshSpec,
    ctx: &RunContext,
    report: Arc<dyn Report>,
) -> Result<RunSummary, fanout_core::CoreError> {
    let (connector, targets) = connector_from_document(doc, spec);
    info!(
        targets = targets.len(),
        keys = spec.keys.len(),
        "refreshing document"
    );

    let runner = Arc::new(RemoteBatchRunner::new(
        Arc::new(connector),
        spec.keys.clone(),
        ctx,
    ));
    let summary = Run::new(RunConfig::new(targets, spec.concurrency), runner)
        .with_report(report)
        .with_context(ctx.clone())
        .execute()
        .await?;

    merge_outcomes(doc, &summary);
    Ok(summary)
}
