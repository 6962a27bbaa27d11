//! Reagent - a minimal ReAct agent loop
//!
//! Lets a text-generation backend solve a task by alternating between
//! reasoning and calling tools, observing the results, until it commits to a
//! final answer or runs out of steps.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Generation client contract with an Ollama implementation
//! - **Tools**: Tool contract, registry, and built-in tools
//! - **Agent**: Action parser, transcript, and the loop itself
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reagent::{Agent, Config, OllamaClient, ToolRegistry};
//!
//! #[tokio::main]
//! async fn main() -> reagent::Result<()> {
//!     let config = Config::load();
//!     let llm = Arc::new(OllamaClient::from_config(&config)?);
//!     let agent = Agent::with_config(llm, ToolRegistry::with_defaults(), &config.agent);
//!
//!     let report = agent.run("What is 2 + 2?").await?;
//!     println!("{}", report.outcome);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, RunReport};
pub use cli::Repl;
pub use crate::core::{AgentEvent, Config, EventKind, ReagentError, Result, RunOutcome};
pub use llm::{GenerationClient, GenerationRequest, OllamaClient};
pub use tools::{Tool, ToolError, ToolRegistry};
