//! Error types for the smart router

use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Error, Debug)]
pub enum RouterError {

    // =============================
    // Routing & Dispatch Errors
    // =============================

    #[error("No suitable agent for query")]
    NoSuitableAgent,

    #[error("Agent {agent} timed out after {seconds} seconds")]
    AgentTimeout { agent: String, seconds: u64 },

    #[error("Agent {agent} error: {message}")]
    Remote { agent: String, message: String },

    // =============================
    // Discovery & Configuration
    // =============================

    #[error("Discovery error: {0}")]
    DiscoveryError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Upload error: {0}")]
    UploadError(String),

    #[error("Internal error: {0}")]
    Internal(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
