//! Test doubles for driving the agent loop without a real backend.
//!
//! [`ScriptedClient`] answers generation requests from a fixed script, so a
//! run against it is fully deterministic. It is not a production backend.
//!
//! Gated behind the `test-support` cargo feature so production builds are
//! unaffected.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use reagent::testing::ScriptedClient;
//! use reagent::{Agent, ToolRegistry};
//!
//! # tokio_test::block_on(async {
//! let llm = Arc::new(ScriptedClient::new([
//!     "Action: Calculator\nAction Input: \"2 + 2\"",
//!     "Final Answer: The answer is 4.",
//! ]));
//! let agent = Agent::new(llm, ToolRegistry::with_defaults());
//! let report = agent.run("What is 2 + 2?").await.unwrap();
//! assert_eq!(report.outcome.text(), "The answer is 4.");
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{ReagentError, Result};
use crate::llm::{GenerationClient, GenerationRequest};

/// A generation client that replays scripted responses.
///
/// Rules added with [`on_context_suffix`](Self::on_context_suffix) are tried
/// first, in insertion order, against the exact end of the context. If none
/// matches, the next queued response is returned. An exhausted script is an
/// error, the way a dead backend would be.
pub struct ScriptedClient {
    rules: Vec<(String, String)>,
    queue: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedClient {
    /// Create a client that returns `responses` in order.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rules: Vec::new(),
            queue: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with `response` whenever the context ends with `suffix`.
    pub fn on_context_suffix(mut self, suffix: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push((suffix.into(), response.into()));
        self
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        if let Some((_, response)) = self
            .rules
            .iter()
            .find(|(suffix, _)| request.context.ends_with(suffix.as_str()))
        {
            return Ok(response.clone());
        }

        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| ReagentError::generation("script exhausted"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
