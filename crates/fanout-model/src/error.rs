use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("document io error: {0}")]
    DocumentIo(String),

    #[error("document parse error: {0}")]
    DocumentParse(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
