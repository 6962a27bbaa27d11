//! Generation client trait for abstracting different backends
//!
//! The loop only ever asks a backend for the continuation of a text context,
//! so any completion-style API (Ollama, a scripted fake, ...) fits behind it.

use async_trait::async_trait;

use crate::core::Result;

/// A single call to the generation backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Full accumulated context
    pub context: String,
    /// Markers at which the backend should truncate its output
    pub stop: Option<Vec<String>>,
}

impl GenerationRequest {
    /// Create a request with no stop markers
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            stop: None,
        }
    }

    /// Set the stop markers; an empty list means none
    pub fn with_stop(mut self, markers: Vec<String>) -> Self {
        self.stop = if markers.is_empty() {
            None
        } else {
            Some(markers)
        };
        self
    }
}

/// Callback function for streaming tokens
pub type StreamCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Trait for text-generation backends
///
/// Implementations must be safe to call from concurrent runs; the loop does
/// not serialise calls across runs.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Produce the next block of text for the given context
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Get the backend name
    fn name(&self) -> &str;
}
