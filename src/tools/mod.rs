//! Tools module - capabilities the agent can invoke
//!
//! Contains the tool contract, the built-in tools, and the tool registry.

pub mod builtin;
pub mod registry;
pub mod tool;

pub use registry::ToolRegistry;
pub use tool::{Tool, ToolError};
