//! Interactive REPL for Reagent
//!
//! Reads questions from stdin and answers each with a fresh agent run.

use std::io::{self, BufRead, Write};

use crate::agent::Agent;
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::{Config, Result};

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    agent: Agent,
    config: Config,
}

impl Repl {
    /// Create a REPL around a ready agent
    pub fn new(agent: Agent, config: Config) -> Self {
        Self { agent, config }
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("Question: ");
            stdout.flush()?;

            let mut input = String::new();
            match stdin.lock().read_line(&mut input) {
                Ok(0) => {
                    // EOF (Ctrl+D)
                    println!("\nGoodbye!");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            }

            match handle_command(&input, &mut self.agent) {
                CommandResult::Exit => {
                    println!("\nGoodbye!");
                    break;
                }
                CommandResult::Handled(output) => println!("{}\n", output),
                CommandResult::None => continue,
                CommandResult::Continue(question) => match self.agent.run(&question).await {
                    Ok(report) => {
                        let label = if report.outcome.is_success() {
                            "Answer"
                        } else {
                            "Stopped"
                        };
                        println!("\n{} ({} steps): {}\n", label, report.steps, report.outcome);
                    }
                    Err(e) => eprintln!("\nError: {}\n", e),
                },
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        println!("Reagent - ReAct agent loop");
        println!("Ollama:      {}", self.config.ollama_url());
        println!("Model:       {}", self.config.model.name);
        println!("Step budget: {}", self.agent.max_steps());
        println!();
        println!("Commands: help, tools, steps, status, exit");
        println!("─────────────────────────────────────────────");
    }
}
