//! CLI module - command-line interface
//!
//! Contains the REPL, command parsing, and the event printer.

pub mod commands;
pub mod events;
pub mod repl;

pub use events::spawn_event_writer;
pub use repl::Repl;
