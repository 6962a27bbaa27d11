//! LLM module - generation backends
//!
//! Provides the generation client contract with Ollama as the shipped backend.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaClient;
pub use traits::{GenerationClient, GenerationRequest, StreamCallback};
