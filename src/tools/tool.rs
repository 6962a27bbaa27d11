//! Tool trait and error type.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

/// A named capability the agent can invoke with a single text input.
///
/// The name must be unique within a registry and the description a single
/// line; both are shown to the backend verbatim.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name used in `Action:` lines.
    fn name(&self) -> &str;

    /// One-line description for the tool manifest.
    fn description(&self) -> &str;

    /// Run the tool on the raw action input.
    async fn run(&self, input: &str) -> Result<String, ToolError>;
}
