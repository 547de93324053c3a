//! Unified error types for reportcap

use thiserror::Error;

/// Unified error type for all reportcap operations
#[derive(Error, Debug)]
pub enum ReportError {
    // Capture request errors
    #[error("Invalid capture request: {0}")]
    InvalidRequest(String),

    // Browser errors
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Readiness timeout: {0}")]
    ReadinessTimeout(String),

    #[error("Encoding failed: {0}")]
    Encoding(String),

    // Artifact errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Collaborator errors
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Notification error: {0}")]
    Notification(String),

    // Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using ReportError
pub type Result<T> = std::result::Result<T, ReportError>;
