//! Remote batch task runner.
//!
//! Connects to one remote store endpoint per target and fans out over a set
//! of configuration keys inside the task. Individual key failures are soft:
//! they are reported and excluded from the result, while a connection failure
//! fails the whole target.
mod error;
pub use error::{ConnectError, ReadError};

mod client;
pub use client::{StoreConnector, StoreReader};

mod http;
pub use http::{HttpEndpoint, HttpStoreConnector};

mod runner;
pub use runner::RemoteBatchRunner;

mod refresh;
pub use refresh::{RefreshSpec, connector_from_document, merge_outcomes, refresh_document, resolve_endpoint};

/// Remote batch runner type identifier for logs and metrics.
pub const RUNNER_TYPE_REMOTE_BATCH: &str = "remote-batch";

/// Default document key holding a target's store contract address.
pub const DEFAULT_ADDRESS_KEY: &str = "UnifiedStore";

/// Default JSON-RPC method used to read one key from the store.
pub const DEFAULT_READ_METHOD: &str = "store_get";
