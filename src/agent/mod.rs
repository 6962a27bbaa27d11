//! Agent module - the ReAct control loop
//!
//! Contains the action parser, the run transcript, and the orchestrator that
//! ties the generation backend to the tool registry.

pub mod loop_state;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod transcript;

pub use loop_state::{AgentLoopState, LoopPhase, Observation};
pub use orchestrator::{Agent, RunReport};
pub use parser::{ActionParser, ParsedStep};
pub use transcript::{Segment, SegmentKind, Transcript};
