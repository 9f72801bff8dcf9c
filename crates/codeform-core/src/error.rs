//! Error types for Codeform Core.

use thiserror::Error;

/// Result type alias for Codeform operations.
pub type Result<T> = std::result::Result<T, CodeformError>;

/// Main error type for the Codeform workspace.
#[derive(Debug, Error)]
pub enum CodeformError {
    /// A required form field was empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The completion service answered with an error payload.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Network request failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing to the clipboard failed.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodeformError {
    /// Short, user-facing reason without the category prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::Validation(m)
            | Self::Upstream(m)
            | Self::Network(m)
            | Self::Config(m)
            | Self::Clipboard(m) => m.clone(),
            Self::Io(e) => e.to_string(),
            Self::Json(e) => e.to_string(),
        }
    }
}
