//! Agent orchestrator
//!
//! Drives the ReAct loop (Thought → Action → Observation) for one query at a
//! time: generate a block, classify it, dispatch actions to tools and feed
//! the observation back until a final answer, a parse failure, cancellation,
//! or the step budget ends the run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::agent::loop_state::{AgentLoopState, LoopPhase, Observation};
use crate::agent::parser::{ActionParser, ParsedStep};
use crate::agent::prompt::seed_instructions;
use crate::agent::transcript::Transcript;
use crate::core::config::{AgentConfig, DEFAULT_MAX_STEPS, OBSERVATION_STOP};
use crate::core::{AgentEvent, EventKind, Result, RunOutcome};
use crate::llm::{GenerationClient, GenerationRequest};
use crate::tools::{ToolError, ToolRegistry};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// How the run ended
    pub outcome: RunOutcome,
    /// The full context as of the last append
    pub transcript: Transcript,
    /// Completed generate/classify cycles
    pub steps: usize,
}

/// Main agent that orchestrates the generation backend and tools
pub struct Agent {
    /// Generation backend, shared with whoever supplied it
    llm: Arc<dyn GenerationClient>,
    /// Tool registry, immutable once the agent exists
    tools: Arc<ToolRegistry>,
    parser: ActionParser,
    stop_markers: Vec<String>,
    max_steps: usize,
    tool_timeout: Option<Duration>,
    events: Option<UnboundedSender<AgentEvent>>,
}

impl Agent {
    /// Create an agent with a 5-step budget and `Observation:` as stop marker
    pub fn new(llm: Arc<dyn GenerationClient>, tools: ToolRegistry) -> Self {
        let stop_markers = vec![OBSERVATION_STOP.to_string()];
        Self {
            llm,
            tools: Arc::new(tools),
            parser: ActionParser::new(stop_markers.clone()),
            stop_markers,
            max_steps: DEFAULT_MAX_STEPS,
            tool_timeout: None,
            events: None,
        }
    }

    /// Create an agent with loop settings from configuration
    pub fn with_config(
        llm: Arc<dyn GenerationClient>,
        tools: ToolRegistry,
        config: &AgentConfig,
    ) -> Self {
        Self {
            llm,
            tools: Arc::new(tools),
            parser: ActionParser::new(config.stop_markers.clone()),
            stop_markers: config.stop_markers.clone(),
            max_steps: config.max_steps,
            tool_timeout: config.tool_timeout(),
            events: None,
        }
    }

    /// Send every loop event to `sink`
    pub fn with_event_sink(mut self, sink: UnboundedSender<AgentEvent>) -> Self {
        self.events = Some(sink);
        self
    }

    /// Fail tool calls that run longer than `limit`
    pub fn with_tool_timeout(mut self, limit: Duration) -> Self {
        self.tool_timeout = Some(limit);
        self
    }

    /// Run `query` with the configured step budget
    pub async fn run(&self, query: &str) -> Result<RunReport> {
        self.run_with_budget(query, self.max_steps).await
    }

    /// Run `query` with an explicit step budget
    pub async fn run_with_budget(&self, query: &str, max_steps: usize) -> Result<RunReport> {
        self.run_until_cancelled(query, max_steps, &CancellationToken::new())
            .await
    }

    /// Run `query`, checking `cancel` before every generation call and again
    /// before acting on its output
    ///
    /// Backend failures are returned as errors. Everything else, including
    /// unknown tools and failing tools, ends in a `RunReport`.
    pub async fn run_until_cancelled(
        &self,
        query: &str,
        max_steps: usize,
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        let mut state = AgentLoopState::new(max_steps);
        let manifest = self.tools.manifest();
        let names = self.tools.names();
        let mut transcript = Transcript::new(seed_instructions(&manifest, &names, query));

        tracing::info!(max_steps, backend = self.llm.name(), "Starting ReAct loop");
        self.emit(0, EventKind::RunStarted, query);

        while state.should_continue() {
            let step = state.current_step();

            if cancel.is_cancelled() {
                return Ok(self.finish(&mut state, transcript, RunOutcome::Cancelled));
            }

            state.enter(LoopPhase::Generating);
            let request = GenerationRequest::new(transcript.as_str())
                .with_stop(self.stop_markers.clone());
            let block = self.llm.generate(&request).await?;

            if cancel.is_cancelled() {
                return Ok(self.finish(&mut state, transcript, RunOutcome::Cancelled));
            }

            state.enter(LoopPhase::Classifying);
            transcript.push_generation(&block);
            self.emit(step, EventKind::Generation, &block);

            match self.parser.parse(&block) {
                ParsedStep::FinalAnswer(answer) => {
                    state.finish_step();
                    return Ok(self.finish(
                        &mut state,
                        transcript,
                        RunOutcome::FinalAnswer { answer },
                    ));
                }
                ParsedStep::Unparseable(raw) => {
                    state.finish_step();
                    return Ok(self.finish(&mut state, transcript, RunOutcome::ParseFailure { raw }));
                }
                ParsedStep::Action { name, input } => {
                    state.enter(LoopPhase::Dispatching);
                    self.emit(step, EventKind::Action, format!("{}: {}", name, input));

                    let observation = self.dispatch(&name, &input).await;

                    state.enter(LoopPhase::Observing);
                    transcript.push_observation(&observation.output);
                    self.emit(step, EventKind::Observation, &observation.output);
                }
            }

            state.finish_step();
        }

        Ok(self.finish(&mut state, transcript, RunOutcome::BudgetExhausted))
    }

    /// Execute one action; never fails the run
    async fn dispatch(&self, name: &str, input: &str) -> Observation {
        let tool = match self.tools.get(name) {
            Ok(tool) => tool,
            Err(e) => {
                tracing::warn!("Action rejected: {}", e);
                return Observation::unknown_tool(name);
            }
        };

        tracing::debug!(tool = name, input, "Executing tool");
        let call = tool.run(input);
        let result = match self.tool_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(ToolError::Timeout(limit))),
            None => call.await,
        };

        match result {
            Ok(output) => Observation::success(name, output),
            Err(e) => {
                tracing::warn!(tool = name, "Tool failed: {}", e);
                Observation::error(name, e)
            }
        }
    }

    fn finish(
        &self,
        state: &mut AgentLoopState,
        transcript: Transcript,
        outcome: RunOutcome,
    ) -> RunReport {
        let (phase, kind, content) = match &outcome {
            RunOutcome::FinalAnswer { answer } => {
                (LoopPhase::Terminating, EventKind::FinalAnswer, answer.as_str())
            }
            RunOutcome::ParseFailure { raw } => {
                (LoopPhase::Aborting, EventKind::ParseFailure, raw.as_str())
            }
            RunOutcome::BudgetExhausted => (
                LoopPhase::BudgetExhausted,
                EventKind::BudgetExhausted,
                outcome.text(),
            ),
            RunOutcome::Cancelled => (LoopPhase::Cancelled, EventKind::Cancelled, outcome.text()),
        };
        state.enter(phase);
        self.emit(state.step, kind, content);

        if outcome.is_success() {
            tracing::info!(steps = state.step, "Run complete");
        } else {
            tracing::warn!(steps = state.step, "Run ended without an answer: {}", kind);
        }

        RunReport {
            outcome,
            transcript,
            steps: state.step,
        }
    }

    fn emit(&self, step: usize, kind: EventKind, content: impl Into<String>) {
        let event = AgentEvent::new(step, kind, content);
        tracing::debug!(step, kind = %event.kind, "{}", event.content);
        if let Some(ref sink) = self.events {
            // A dropped receiver only means nobody is listening any more.
            let _ = sink.send(event);
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Default step budget for `run`
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Change the default step budget
    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }

    /// Name of the generation backend
    pub fn backend_name(&self) -> &str {
        self.llm.name()
    }
}
