//! Connector and reader seams between the batch runner and the wire.
//!
//! The runner only ever sees these two traits; the HTTP JSON-RPC
//! implementation lives in [`crate::http`] and tests substitute in-memory
//! fakes.
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use fanout_model::Target;

use crate::error::{ConnectError, ReadError};

/// Established session against one target's remote store.
#[async_trait]
pub trait StoreReader: Send + Sync {
    /// Read the current value of one configuration key.
    async fn read(&self, key: &str) -> Result<Value, ReadError>;
}

/// Factory establishing one [`StoreReader`] per target.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Establish a reader for `target`.
    async fn connect(&self, target: &Target) -> Result<Arc<dyn StoreReader>, ConnectError>;
}
