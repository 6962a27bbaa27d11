//! Action parser for the ReAct text protocol
//!
//! A generated block is either a final answer, an `Action:` / `Action Input:`
//! pair, or neither. Final answers win over actions when a block has both.

use std::sync::LazyLock;

use regex::Regex;

/// Marker that introduces the final answer
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// `Action:` line, optionally followed by other lines, then `Action Input:`
/// through the end of the block.
static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*Action:(?P<name>[^\n]*)\n(?:.*?\n)??[ \t]*Action Input:(?P<input>.*)\z")
        .expect("action pattern is valid")
});

/// Classification of one generated block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedStep {
    /// Text after the last `Final Answer:` marker, trimmed
    FinalAnswer(String),
    /// Tool name and raw input
    Action { name: String, input: String },
    /// The block matched neither pattern
    Unparseable(String),
}

/// Parses blocks under the fixed line-oriented protocol
#[derive(Debug, Clone, Default)]
pub struct ActionParser {
    /// An action input is cut at the first line starting with one of these
    stop_markers: Vec<String>,
}

impl ActionParser {
    /// Create a parser that truncates action inputs at the given stop markers
    pub fn new(stop_markers: Vec<String>) -> Self {
        Self { stop_markers }
    }

    /// Classify a generated block
    pub fn parse(&self, block: &str) -> ParsedStep {
        if let Some(idx) = block.rfind(FINAL_ANSWER_MARKER) {
            let answer = block[idx + FINAL_ANSWER_MARKER.len()..].trim();
            return ParsedStep::FinalAnswer(answer.to_string());
        }

        let Some(caps) = ACTION_RE.captures(block) else {
            return ParsedStep::Unparseable(block.to_string());
        };

        let name = caps["name"].trim();
        if name.is_empty() {
            return ParsedStep::Unparseable(block.to_string());
        }

        let input = self.truncate_at_stop(&caps["input"]);
        ParsedStep::Action {
            name: name.to_string(),
            input: strip_quotes(input.trim()).to_string(),
        }
    }

    /// Drop everything from the first line that begins with a stop marker
    fn truncate_at_stop<'a>(&self, input: &'a str) -> &'a str {
        let mut offset = 0;
        for (i, line) in input.split_inclusive('\n').enumerate() {
            // The first line is the remainder of the `Action Input:` line itself
            if i > 0 {
                let head = line.trim_start();
                if self.stop_markers.iter().any(|m| head.starts_with(m.as_str())) {
                    return &input[..offset];
                }
            }
            offset += line.len();
        }
        input
    }
}

/// Strip one layer of enclosing double quotes
fn strip_quotes(input: &str) -> &str {
    if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
        &input[1..input.len() - 1]
    } else {
        input
    }
}
