//! Trait definitions for external interactions
//!
//! These traits define the boundaries between routing logic and
//! infrastructure. Implementations live in other crates.

use crate::ConversationTurn;
use std::future::Future;

/// Text completion capability
///
/// Implemented by the infrastructure layer (faqbot-llm). Callers treat every
/// error as recoverable and fall back to a static answer.
pub trait GenerativeBackend: Send + Sync {
    /// Error type for generation
    type Error: std::fmt::Display + Send;

    /// Generate a completion for `prompt` using at most `max_tokens` output tokens
    fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Whether the backend is configured to make calls at all
    fn is_available(&self) -> bool {
        true
    }
}

/// Ordered, append-only log of conversation turns
///
/// Implemented by the infrastructure layer (faqbot-store). Implementations
/// must serialize concurrent appends.
pub trait ConversationStore: Send + Sync {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Append a turn to the end of the log
    fn append(&self, turn: ConversationTurn) -> Result<(), Self::Error>;

    /// The last `n` turns, oldest first
    fn recent(&self, n: usize) -> Result<Vec<ConversationTurn>, Self::Error>;

    /// Every retained turn, oldest first
    fn all(&self) -> Result<Vec<ConversationTurn>, Self::Error>;

    /// Remove every turn
    fn clear(&self) -> Result<(), Self::Error>;

    /// Number of retained turns
    fn len(&self) -> Result<usize, Self::Error>;

    /// Whether the log is empty
    fn is_empty(&self) -> Result<bool, Self::Error> {
        Ok(self.len()? == 0)
    }
}
