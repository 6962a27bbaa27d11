//! CLI commands
//!
//! Special commands that can be executed in the REPL.

use crate::agent::Agent;

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Run the input as a question
    Continue(String),
    /// Command was handled, show output
    Handled(String),
    /// Exit the REPL
    Exit,
    /// No output needed
    None,
}

/// Parse and handle special commands
pub fn handle_command(input: &str, agent: &mut Agent) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::None;
    }

    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd.as_str() {
        "exit" | "quit" | "q" => CommandResult::Exit,

        "help" | "?" => CommandResult::Handled(help_text()),

        "tools" => {
            let manifest = agent.tools().manifest();
            if manifest.is_empty() {
                CommandResult::Handled("No tools registered.".to_string())
            } else {
                CommandResult::Handled(
                    manifest
                        .iter()
                        .map(|line| format!("  - {}", line))
                        .collect::<Vec<_>>()
                        .join("\n"),
                )
            }
        }

        "steps" => match args.parse::<usize>() {
            Ok(n) => {
                agent.set_max_steps(n);
                CommandResult::Handled(format!("Step budget: {}", n))
            }
            Err(_) if args.is_empty() => {
                CommandResult::Handled(format!("Step budget: {}", agent.max_steps()))
            }
            Err(_) => CommandResult::Handled(format!(
                "Invalid step budget '{}'. Usage: steps <number>",
                args
            )),
        },

        "status" => CommandResult::Handled(format!(
            "Reagent Status:\n\
             ─────────────────────────────\n\
             Backend:     {}\n\
             Tools:       {}\n\
             Step budget: {}",
            agent.backend_name(),
            agent.tools().names().join(", "),
            agent.max_steps()
        )),

        _ => {
            if input.starts_with('/') {
                CommandResult::Handled(format!(
                    "Unknown command: {}. Type 'help' for available commands.",
                    cmd
                ))
            } else {
                CommandResult::Continue(input.to_string())
            }
        }
    }
}

/// Get help text
fn help_text() -> String {
    r#"Reagent Commands:
─────────────────────────────
  help, ?          Show this help message
  tools            List the tools the agent can call
  steps [n]        Show or set the step budget
  status           Show backend and loop settings
  exit, quit, q    Exit Reagent

Anything else is sent to the agent as a question."#
        .to_string()
}
