//! Run transcript
//!
//! The ordered record of one run: seed instructions, then every generated
//! block and every observation. Segments are only ever appended, so each
//! rendering is a prefix of every later one.

use serde::{Deserialize, Serialize};

/// Kind of transcript segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Instructions,
    Generation,
    Observation,
}

/// One appended piece of the transcript, stored as rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

/// Append-only record of a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    segments: Vec<Segment>,
    rendered: String,
}

impl Transcript {
    /// Start a transcript with the seed instructions
    pub fn new(instructions: impl Into<String>) -> Self {
        let mut transcript = Self::default();
        transcript.push(SegmentKind::Instructions, instructions.into());
        transcript
    }

    /// Append a generated block, terminated by a newline
    pub fn push_generation(&mut self, block: &str) {
        self.push(SegmentKind::Generation, format!("{}\n", block));
    }

    /// Append an observation line
    pub fn push_observation(&mut self, observation: &str) {
        self.push(SegmentKind::Observation, format!("Observation: {}\n", observation));
    }

    fn push(&mut self, kind: SegmentKind, text: String) {
        self.rendered.push_str(&text);
        self.segments.push(Segment { kind, text });
    }

    /// The full context as sent to the backend
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// All segments in append order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The most recent segment
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl std::fmt::Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}
