use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("concurrency limit must be at least 1")]
    InvalidConcurrency,

    #[error("target set is empty")]
    EmptyTargets,
}
