use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpsimError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OpsimError>;
