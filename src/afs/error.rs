use thiserror::Error;

#[derive(Error, Debug)]
pub enum AfsError {
    #[error("Invalid filter token: {0}")]
    InvalidToken(String),

    #[error("Invalid filter mode: {0}")]
    InvalidMode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AfsError>;
