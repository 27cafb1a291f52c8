//! Error types for the status light service

/// Errors that can occur in the status light service
#[derive(Debug, thiserror::Error)]
pub enum StatusLightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Indicator output error: {0}")]
    Output(String),

    #[error("Admin interface error: {0}")]
    Admin(String),
}

/// Result type alias for status light operations
pub type Result<T> = std::result::Result<T, StatusLightError>;
