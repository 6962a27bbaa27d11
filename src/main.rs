//! Reagent - a minimal ReAct agent loop
//!
//! Main entry point for the CLI application.

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use reagent::cli::spawn_event_writer;
use reagent::{Agent, Config, OllamaClient, ReagentError, Repl, ToolRegistry};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Reagent - answer questions with a ReAct loop over local tools
#[derive(Parser, Debug)]
#[command(name = "reagent")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generation model
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Step budget per question
    #[arg(long, short = 'n')]
    max_steps: Option<usize>,

    /// Per-tool time limit in seconds
    #[arg(long)]
    tool_timeout: Option<u64>,

    /// Stream generated tokens to stdout
    #[arg(long)]
    stream: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Print loop events to stderr as JSON lines
    #[arg(long)]
    events: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Single prompt mode (non-interactive)
    #[arg(long, short = 'p')]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("{}", Config::default_config_toml());
        return Ok(());
    }

    // Build configuration
    let (mut config, load_error) = match Config::try_load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.model.name = model.clone();
    }

    if let Some(max_steps) = args.max_steps {
        config.agent.max_steps = max_steps;
    }

    if let Some(secs) = args.tool_timeout {
        config.agent.tool_timeout_secs = Some(secs);
    }

    if args.stream {
        config.streaming.enabled = true;
    }

    if args.debug {
        config.agent.debug = true;
    }

    let default_filter = if config.agent.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    if let Some(e) = load_error {
        tracing::warn!("Ignoring config file: {}", e);
    }

    if args.save_config {
        let path = config.save()?;
        println!("Configuration saved to {}", path.display());
        return Ok(());
    }

    let mut llm = OllamaClient::from_config(&config)?;
    if config.streaming.enabled {
        llm = llm.with_token_callback(Box::new(|token| {
            print!("{}", token);
            let _ = io::stdout().flush();
        }));
    }

    if !llm.is_model_available().await? {
        return Err(ReagentError::ModelNotFound(config.model.name.clone()).into());
    }

    let mut agent = Agent::with_config(Arc::new(llm), ToolRegistry::with_defaults(), &config.agent);

    let printer = if args.events {
        let (tx, rx) = mpsc::unbounded_channel();
        agent = agent.with_event_sink(tx);
        Some(spawn_event_writer(rx, io::stderr()))
    } else {
        None
    };

    // Single prompt mode
    if let Some(prompt) = args.prompt {
        let result = agent.run(&prompt).await;
        drop(agent);
        flush_events(printer).await;

        let report = result?;
        println!("{}", report.outcome);
        if !report.outcome.is_success() {
            std::process::exit(2);
        }
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::new(agent, config);
    let result = repl.run().await;
    drop(repl);
    flush_events(printer).await;

    result?;
    Ok(())
}

/// Wait for queued events once the agent, and with it the sender, is gone
async fn flush_events(printer: Option<JoinHandle<io::Stderr>>) {
    if let Some(handle) = printer {
        if let Err(e) = handle.await {
            tracing::warn!("Event printer failed: {}", e);
        }
    }
}
