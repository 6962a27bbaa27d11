//! Shared types used across Reagent modules
//!
//! Contains run outcomes and the structured event records the agent emits.

use serde::{Deserialize, Serialize};

/// Sentinel text for a run that spent its whole step budget
pub const BUDGET_EXHAUSTED_TEXT: &str = "Agent stopped (max steps reached).";

/// Sentinel text for a run aborted on an unparseable block
pub const PARSE_FAILURE_TEXT: &str = "Agent stopped (could not parse action).";

/// Sentinel text for a run stopped by its cancellation token
pub const CANCELLED_TEXT: &str = "Agent stopped (cancelled).";

/// Terminal value of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The backend committed to an answer
    FinalAnswer { answer: String },
    /// `max_steps` cycles ran without a final answer
    BudgetExhausted,
    /// A generated block matched neither protocol pattern
    ParseFailure { raw: String },
    /// The caller cancelled the run
    Cancelled,
}

impl RunOutcome {
    /// Whether the run produced a final answer
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::FinalAnswer { .. })
    }

    /// The answer text, if any
    pub fn answer(&self) -> Option<&str> {
        match self {
            RunOutcome::FinalAnswer { answer } => Some(answer),
            _ => None,
        }
    }

    /// The answer text, or the fixed sentinel for non-answer outcomes
    pub fn text(&self) -> &str {
        match self {
            RunOutcome::FinalAnswer { answer } => answer,
            RunOutcome::BudgetExhausted => BUDGET_EXHAUSTED_TEXT,
            RunOutcome::ParseFailure { .. } => PARSE_FAILURE_TEXT,
            RunOutcome::Cancelled => CANCELLED_TEXT,
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// What happened at a point in the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Seed instructions were written
    RunStarted,
    /// The backend produced a block
    Generation,
    /// A block was classified as an action
    Action,
    /// An observation was appended
    Observation,
    /// A block was classified as the final answer
    FinalAnswer,
    /// A block could not be parsed
    ParseFailure,
    /// The step budget ran out
    BudgetExhausted,
    /// The cancellation token fired
    Cancelled,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::RunStarted => write!(f, "run_started"),
            EventKind::Generation => write!(f, "generation"),
            EventKind::Action => write!(f, "action"),
            EventKind::Observation => write!(f, "observation"),
            EventKind::FinalAnswer => write!(f, "final_answer"),
            EventKind::ParseFailure => write!(f, "parse_failure"),
            EventKind::BudgetExhausted => write!(f, "budget_exhausted"),
            EventKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A single record of the agent's event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEvent {
    /// 1-based step the event belongs to (0 before the first step)
    pub step: usize,
    pub kind: EventKind,
    pub content: String,
}

impl AgentEvent {
    pub fn new(step: usize, kind: EventKind, content: impl Into<String>) -> Self {
        Self {
            step,
            kind,
            content: content.into(),
        }
    }
}
