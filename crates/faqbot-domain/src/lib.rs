//! Faqbot Domain Layer
//!
//! Core value types and trait seams for the FAQ chat backend. This crate has
//! no external dependencies; infrastructure lives in the other crates.
//!
//! ## Key Concepts
//!
//! - **FaqEntry**: an immutable question/answer pair from the static corpus
//! - **MatchResult**: the best corpus entry for a query plus its confidence
//! - **Source**: provenance tag naming which path produced an answer
//! - **RoutingDecision**: answer text together with its provenance
//! - **ConversationTurn**: one message in the advisory, in-memory chat log

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conversation;
pub mod entry;
pub mod routing;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use conversation::{ConversationTurn, Role};
pub use entry::{FaqEntry, MatchResult};
pub use routing::RoutingDecision;
pub use source::Source;
