//! Built-in tools.

mod calculator;
mod weather;

pub use calculator::{evaluate, Calculator};
pub use weather::Weather;
