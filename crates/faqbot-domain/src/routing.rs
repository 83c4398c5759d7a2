//! Routing decisions

use crate::Source;

/// The outcome of routing one query: answer text plus provenance
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    /// Answer text shown to the user
    pub answer: String,
    /// Which path produced `answer`
    pub source: Source,
    /// Matcher confidence that selected the path
    pub confidence: f64,
    /// Questions of the corpus entries used to produce the answer
    pub context: Vec<String>,
}

impl RoutingDecision {
    /// Create a decision with no corpus context
    pub fn new(answer: impl Into<String>, source: Source, confidence: f64) -> Self {
        Self {
            answer: answer.into(),
            source,
            confidence,
            context: Vec::new(),
        }
    }

    /// Attach the questions of the corpus entries that informed the answer
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }
}
