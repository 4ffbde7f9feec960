use thiserror::Error;

#[derive(Error, Debug)]
pub enum SieveError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, SieveError>;
