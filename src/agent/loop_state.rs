//! Agent loop state management
//!
//! Tracks where a single run is in the ReAct cycle and how much of its step
//! budget is spent.

use serde::{Deserialize, Serialize};

/// Phase of the ReAct state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPhase {
    Seeding,
    Generating,
    Classifying,
    Dispatching,
    Observing,
    Terminating,
    Aborting,
    BudgetExhausted,
    Cancelled,
}

impl LoopPhase {
    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoopPhase::Terminating
                | LoopPhase::Aborting
                | LoopPhase::BudgetExhausted
                | LoopPhase::Cancelled
        )
    }
}

/// State of the agent reasoning loop
#[derive(Debug, Clone)]
pub struct AgentLoopState {
    /// Completed cycles
    pub step: usize,
    /// Maximum allowed cycles
    pub max_steps: usize,
    /// Current phase
    pub phase: LoopPhase,
}

impl AgentLoopState {
    /// Create a new loop state with the given budget
    pub fn new(max_steps: usize) -> Self {
        Self {
            step: 0,
            max_steps,
            phase: LoopPhase::Seeding,
        }
    }

    /// Check if the loop may start another cycle
    pub fn should_continue(&self) -> bool {
        self.step < self.max_steps && !self.phase.is_terminal()
    }

    /// 1-based number of the cycle in progress
    pub fn current_step(&self) -> usize {
        self.step + 1
    }

    /// Move to `phase`
    pub fn enter(&mut self, phase: LoopPhase) {
        tracing::trace!(step = self.current_step(), from = ?self.phase, to = ?phase, "phase");
        self.phase = phase;
    }

    /// Close the current cycle
    pub fn finish_step(&mut self) {
        self.step += 1;
    }
}

/// Result of dispatching one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Name of the tool the action asked for
    pub tool_name: String,
    /// Whether the tool ran and succeeded
    pub success: bool,
    /// Text appended to the transcript
    pub output: String,
}

impl Observation {
    /// Create a successful observation
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: output.into(),
        }
    }

    /// Create an error observation; the output is prefixed with `Error: `
    pub fn error(tool_name: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: format!("Error: {}", message),
        }
    }

    /// Observation for an action naming a tool that is not registered
    pub fn unknown_tool(tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        let output = format!("Error: Tool '{}' not found.", tool_name);
        Self {
            tool_name,
            success: false,
            output,
        }
    }
}
