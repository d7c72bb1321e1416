use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum FitroomError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Proxy envelope error: {0}")]
    Envelope(String),

    #[error("{0}")]
    Extraction(String),

    #[error("{0}")]
    ImageFetch(String),

    #[error("{0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FitroomError>;
