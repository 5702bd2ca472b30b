use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("command template is empty")]
    EmptyTemplate,

    #[error("invalid command template: {0}")]
    InvalidTemplate(String),
}
