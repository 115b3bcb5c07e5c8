//! Error types for the gatekeeper service

use thiserror::Error;

/// Main error type for the gatekeeper service
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Verification error: {0}")]
    VerificationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Precondition error: {0}")]
    PreconditionError(String),

    #[error("Platform API error: {0}")]
    ApiError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}
