use thiserror::Error;

use crate::api::error::OddsApiError;

/// Main error type for the odds client
#[derive(Error, Debug)]
pub enum OddsLineError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Provider errors (classified, carries retryability and a user message)
    #[error(transparent)]
    Api(#[from] OddsApiError),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for OddsLineError
pub type Result<T> = std::result::Result<T, OddsLineError>;
