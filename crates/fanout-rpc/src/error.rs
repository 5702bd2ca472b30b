use thiserror::Error;

/// Failure to establish a reader for one target.
///
/// Connection errors are hard: the whole target fails and no keys are read.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("no endpoint configured for target '{0}'")]
    UnknownTarget(String),

    #[error("environment variable {0} is not set")]
    MissingRpcUrl(String),

    #[error("target '{target}' has no '{key}' entry in the document")]
    MissingAddress { target: String, key: String },

    #[error("client setup failed: {0}")]
    Client(String),
}

/// Failure to read one key through an established reader.
///
/// Read errors are soft: the key is skipped, its sibling reads on the same
/// target proceed, and the task still succeeds.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
