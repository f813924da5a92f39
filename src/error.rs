//! Error types for Cutline.

use thiserror::Error;

/// Library-level error type for Cutline operations.
#[derive(Error, Debug)]
pub enum CutlineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model provider error: {0}")]
    UpstreamTransport(String),

    #[error("Unparseable model response: {0}")]
    UnparseableResponse(String),

    #[error("Invalid intent: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl CutlineError {
    /// Whether the error was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CutlineError::InvalidInput(_))
    }
}

/// Result type alias for Cutline operations.
pub type Result<T> = std::result::Result<T, CutlineError>;
