//! ReAct loop integration tests
//!
//! Drives full runs against scripted backends and checks outcomes,
//! transcripts, and the event stream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reagent::agent::SegmentKind;
use reagent::testing::ScriptedClient;
use reagent::{
    Agent, AgentEvent, EventKind, GenerationClient, GenerationRequest, RunOutcome, Tool,
    ToolError, ToolRegistry,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const CALC_ACTION: &str = "Thought: I need to calculate 2 + 2.\nAction: Calculator\nAction Input: \"2 + 2\"";
const CALC_ANSWER: &str = "Thought: I have the result.\nFinal Answer: The answer is 4.";

/// Tool that always fails
struct Broken;

#[async_trait]
impl Tool for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn description(&self) -> &str {
        "Always fails."
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        Err(ToolError::ExecutionFailed(format!("cannot handle '{}'", input)))
    }
}

/// Tool that fires a cancellation token
struct Canceller(CancellationToken);

#[async_trait]
impl Tool for Canceller {
    fn name(&self) -> &str {
        "Cancel"
    }

    fn description(&self) -> &str {
        "Cancels the run."
    }

    async fn run(&self, _input: &str) -> Result<String, ToolError> {
        self.0.cancel();
        Ok("cancelled".to_string())
    }
}

/// Tool that counts its invocations
#[derive(Default)]
struct Counting(AtomicUsize);

#[async_trait]
impl Tool for Counting {
    fn name(&self) -> &str {
        "Count"
    }

    fn description(&self) -> &str {
        "Counts calls."
    }

    async fn run(&self, _input: &str) -> Result<String, ToolError> {
        Ok(self.0.fetch_add(1, Ordering::SeqCst).to_string())
    }
}

/// Backend that is cancelled while it is generating
struct CancelledMidGeneration(CancellationToken);

#[async_trait]
impl GenerationClient for CancelledMidGeneration {
    async fn generate(&self, _request: &GenerationRequest) -> reagent::Result<String> {
        self.0.cancel();
        Ok("Action: Count\nAction Input: 1".to_string())
    }

    fn name(&self) -> &str {
        "cancelled-mid-generation"
    }
}

fn drain(mut rx: mpsc::UnboundedReceiver<AgentEvent>) -> Vec<AgentEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Calculator scenario: one action, one observation, then the answer
#[tokio::test]
async fn test_calculator_end_to_end() {
    let llm = Arc::new(ScriptedClient::new([CALC_ACTION, CALC_ANSWER]));
    let agent = Agent::new(llm.clone(), ToolRegistry::with_defaults());

    let report = agent.run("What is 2 + 2?").await.unwrap();

    assert_eq!(
        report.outcome,
        RunOutcome::FinalAnswer {
            answer: "The answer is 4.".to_string()
        }
    );
    assert_eq!(report.steps, 2);
    assert_eq!(llm.calls(), 2);

    let kinds: Vec<SegmentKind> = report.transcript.segments().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SegmentKind::Instructions,
            SegmentKind::Generation,
            SegmentKind::Observation,
            SegmentKind::Generation,
        ]
    );
    assert_eq!(report.transcript.segments()[2].text, "Observation: 4\n");
}

/// Context-matching script in the style of a deterministic fake backend
#[tokio::test]
async fn test_context_matched_script() {
    let llm = Arc::new(
        ScriptedClient::new(Vec::<String>::new())
            .on_context_suffix("Question: What is the weather in Delhi?\n",
                "Thought: I should use the Weather tool.\nAction: Weather\nAction Input: \"Delhi\"")
            .on_context_suffix("Observation: 32°C, Sunny\n",
                "Thought: I have the weather.\nFinal Answer: It is 32°C and Sunny in Delhi."),
    );
    let agent = Agent::new(llm, ToolRegistry::with_defaults());

    let report = agent.run("What is the weather in Delhi?").await.unwrap();
    assert_eq!(report.outcome.text(), "It is 32°C and Sunny in Delhi.");
}

/// Seed instructions carry the manifest and the question verbatim
#[tokio::test]
async fn test_seed_instructions_sent_first() {
    let llm = Arc::new(ScriptedClient::new([CALC_ANSWER]));
    let agent = Agent::new(llm.clone(), ToolRegistry::with_defaults());
    agent.run("What is 2 + 2?").await.unwrap();

    let expected = "\nAnswer the following questions as best you can. You have access to the following tools:\n\
\n\
Calculator: Useful for answering math questions. Input should be a valid mathematical expression string.\n\
Weather: Get current weather for a city. Input should be the city name.\n\
\n\
Use the following format:\n\
\n\
Question: the input question you must answer\n\
Thought: you should always think about what to do\n\
Action: the action to take, should be one of [Calculator, Weather]\n\
Action Input: the input to the action\n\
Observation: the result of the action\n\
... (this Thought/Action/Action Input/Observation can repeat N times)\n\
Thought: I now know the final answer\n\
Final Answer: the final answer to the original input question\n\
\n\
Begin!\n\
\n\
Question: What is 2 + 2?\n";

    assert_eq!(llm.requests()[0].context, expected);
}

/// Unknown tools are reported back and the loop keeps going
#[tokio::test]
async fn test_unknown_tool_is_recoverable() {
    let llm = Arc::new(ScriptedClient::new([
        "Action: calculator\nAction Input: 2 + 2",
        "Action: Calculator\nAction Input: 2 + 2",
        "Final Answer: 4",
    ]));
    let agent = Agent::new(llm.clone(), ToolRegistry::with_defaults());

    let report = agent.run("What is 2 + 2?").await.unwrap();

    assert_eq!(report.outcome.text(), "4");
    assert_eq!(llm.calls(), 3);
    assert_eq!(
        report.transcript.segments()[2].text,
        "Observation: Error: Tool 'calculator' not found.\n"
    );
    assert!(llm.requests()[1]
        .context
        .ends_with("Observation: Error: Tool 'calculator' not found.\n"));
}

/// Failing tools become `Error:` observations
#[tokio::test]
async fn test_tool_failure_is_recoverable() {
    let mut tools = ToolRegistry::with_defaults();
    tools.register(Arc::new(Broken)).unwrap();
    let llm = Arc::new(ScriptedClient::new([
        "Action: Broken\nAction Input: \"x\"",
        "Action: Calculator\nAction Input: 1 / 0",
        "Final Answer: nothing works",
    ]));
    let agent = Agent::new(llm, tools);

    let report = agent.run("q").await.unwrap();
    assert!(report.outcome.is_success());

    let observations: Vec<&str> = report
        .transcript
        .segments()
        .iter()
        .filter(|s| s.kind == SegmentKind::Observation)
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(
        observations,
        vec![
            "Observation: Error: Execution failed: cannot handle 'x'\n",
            "Observation: Error: Execution failed: division by zero\n",
        ]
    );
}

/// Unparseable output aborts immediately
#[tokio::test]
async fn test_parse_failure_aborts() {
    let llm = Arc::new(ScriptedClient::new([
        "Thought: I am confused.",
        "Final Answer: never reached",
    ]));
    let agent = Agent::new(llm.clone(), ToolRegistry::with_defaults());

    let report = agent.run("q").await.unwrap();
    assert_eq!(
        report.outcome,
        RunOutcome::ParseFailure {
            raw: "Thought: I am confused.".to_string()
        }
    );
    assert_eq!(report.outcome.text(), "Agent stopped (could not parse action).");
    assert_eq!(llm.calls(), 1);
    // The raw block is still recorded
    assert_eq!(
        report.transcript.last().unwrap().text,
        "Thought: I am confused.\n"
    );
}

/// A budget of one allows exactly one cycle
#[tokio::test]
async fn test_budget_of_one() {
    let llm = Arc::new(ScriptedClient::new([CALC_ACTION, CALC_ANSWER]));
    let agent = Agent::new(llm.clone(), ToolRegistry::with_defaults());

    let report = agent.run_with_budget("What is 2 + 2?", 1).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
    assert_eq!(report.outcome.text(), "Agent stopped (max steps reached).");
    assert_eq!(report.steps, 1);
    assert_eq!(llm.calls(), 1);
    assert_eq!(report.transcript.last().unwrap().kind, SegmentKind::Observation);
}

/// The default budget is five cycles
#[tokio::test]
async fn test_default_budget_is_five() {
    let llm = Arc::new(ScriptedClient::new(vec![CALC_ACTION; 10]));
    let agent = Agent::new(llm.clone(), ToolRegistry::with_defaults());

    let report = agent.run("q").await.unwrap();
    assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
    assert_eq!(report.steps, 5);
    assert_eq!(llm.calls(), 5);
}

/// Identical scripts give identical results and transcripts
#[tokio::test]
async fn test_replay_is_deterministic() {
    let run = || async {
        let llm = Arc::new(ScriptedClient::new([
            "Action: Weather\nAction Input: \"NYC\"",
            CALC_ACTION,
            "Final Answer: rainy and 4",
        ]));
        let agent = Agent::new(llm, ToolRegistry::with_defaults());
        agent.run_with_budget("weather and math", 4).await.unwrap()
    };

    let first = run().await;
    let second = run().await;

    assert_eq!(first.outcome, second.outcome);
    assert_eq!(first.steps, second.steps);
    assert_eq!(first.transcript, second.transcript);
    assert_eq!(first.transcript.as_str(), second.transcript.as_str());
}

/// Every context sent to the backend extends the previous one
#[tokio::test]
async fn test_contexts_only_grow() {
    let llm = Arc::new(ScriptedClient::new([
        CALC_ACTION,
        "Action: Weather\nAction Input: London",
        CALC_ANSWER,
    ]));
    let agent = Agent::new(llm.clone(), ToolRegistry::with_defaults());
    let report = agent.run("q").await.unwrap();

    let requests = llm.requests();
    for pair in requests.windows(2) {
        assert!(pair[1].context.starts_with(&pair[0].context));
        assert!(pair[1].context.len() > pair[0].context.len());
    }
    assert!(report
        .transcript
        .as_str()
        .starts_with(&requests.last().unwrap().context));
}

/// The event stream mirrors the loop
#[tokio::test]
async fn test_event_stream() {
    let (tx, rx) = mpsc::unbounded_channel();
    let llm = Arc::new(ScriptedClient::new([CALC_ACTION, CALC_ANSWER]));
    let agent = Agent::new(llm, ToolRegistry::with_defaults()).with_event_sink(tx);

    agent.run("What is 2 + 2?").await.unwrap();
    let events = drain(rx);

    let summary: Vec<(usize, EventKind)> = events.iter().map(|e| (e.step, e.kind)).collect();
    assert_eq!(
        summary,
        vec![
            (0, EventKind::RunStarted),
            (1, EventKind::Generation),
            (1, EventKind::Action),
            (1, EventKind::Observation),
            (2, EventKind::Generation),
            (2, EventKind::FinalAnswer),
        ]
    );
    assert_eq!(events[2].content, "Calculator: 2 + 2");
    assert_eq!(events[3].content, "4");
    assert_eq!(events[5].content, "The answer is 4.");
}

/// Independent runs on one agent share nothing
#[tokio::test]
async fn test_concurrent_runs() {
    let llm = Arc::new(
        ScriptedClient::new(Vec::<String>::new())
            .on_context_suffix("Question: a\n", "Final Answer: A")
            .on_context_suffix("Question: b\n", "Final Answer: B"),
    );
    let agent = Agent::new(llm, ToolRegistry::with_defaults());

    let (a, b) = tokio::join!(agent.run("a"), agent.run("b"));
    assert_eq!(a.unwrap().outcome.text(), "A");
    assert_eq!(b.unwrap().outcome.text(), "B");
}

/// Cancelling mid-run stops before the next generation call
#[tokio::test]
async fn test_cancel_between_steps() {
    let token = CancellationToken::new();
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(Canceller(token.clone()))).unwrap();
    let llm = Arc::new(ScriptedClient::new(vec![
        "Action: Cancel\nAction Input: now";
        5
    ]));
    let agent = Agent::new(llm.clone(), tools);

    let report = agent.run_until_cancelled("q", 5, &token).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert_eq!(report.outcome.text(), "Agent stopped (cancelled).");
    assert_eq!(report.steps, 1);
    assert_eq!(llm.calls(), 1);
    assert_eq!(
        report.transcript.last().unwrap().text,
        "Observation: cancelled\n"
    );
}

/// A block generated after cancellation is dropped without being acted on
#[tokio::test]
async fn test_cancel_during_generation_discards_block() {
    let token = CancellationToken::new();
    let counter = Arc::new(Counting::default());
    let mut tools = ToolRegistry::new();
    tools.register(counter.clone()).unwrap();
    let agent = Agent::new(Arc::new(CancelledMidGeneration(token.clone())), tools);

    let report = agent.run_until_cancelled("q", 5, &token).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert_eq!(report.steps, 0);
    assert_eq!(report.transcript.len(), 1);
    assert_eq!(
        report.transcript.last().unwrap().kind,
        SegmentKind::Instructions
    );
    assert_eq!(counter.0.load(Ordering::SeqCst), 0);
}

/// Pathologically nested calculator input is an observation, not a crash
#[tokio::test]
async fn test_deeply_nested_expression_is_recoverable() {
    let nested = format!(
        "Action: Calculator\nAction Input: {}1",
        "(".repeat(200_000)
    );
    let llm = Arc::new(ScriptedClient::new(vec![nested, CALC_ANSWER.to_string()]));
    let agent = Agent::new(llm, ToolRegistry::with_defaults());

    let report = agent.run("q").await.unwrap();

    assert!(report.outcome.is_success());
    assert!(report
        .transcript
        .as_str()
        .contains("Observation: Error: Invalid input: expression nested too deeply\n"));
}
