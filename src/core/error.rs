//! Custom error types for Reagent
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Reagent operations
#[derive(Error, Debug)]
pub enum ReagentError {
    /// Ollama connection or API errors
    #[error("Ollama error: {0}")]
    Ollama(String),

    /// Generation backend failures that are not Ollama specific
    #[error("Generation error: {0}")]
    Generation(String),

    /// Model not available
    #[error("Model '{0}' not available in Ollama. Run: ollama pull {0}")]
    ModelNotFound(String),

    /// A capability with this name is already registered
    #[error("Tool '{0}' is already registered")]
    DuplicateCapability(String),

    /// No capability registered under this name
    #[error("Tool '{0}' not found")]
    UnknownCapability(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for other cases
    #[error("{0}")]
    Other(String),
}

/// Convenience Result type for Reagent operations
pub type Result<T> = std::result::Result<T, ReagentError>;

impl ReagentError {
    /// Create an Ollama error
    pub fn ollama(msg: impl Into<String>) -> Self {
        Self::Ollama(msg.into())
    }

    /// Create a generation error
    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
