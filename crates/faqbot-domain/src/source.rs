//! Provenance tags for generated responses

use std::fmt;

/// Which routing path produced a response
///
/// The string forms are part of the HTTP contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Answered verbatim from the corpus
    Faq,
    /// Templated paraphrase of a corpus entry after generation failed
    FaqFallback,
    /// Unguided generation with the raw question
    GenerativeGeneral,
    /// Generation seeded with the single best corpus entry
    GenerativeEnhanced,
    /// Generation seeded with the top-K corpus entries
    GenerativeWithFaqContext,
    /// Keyword-triggered canned response
    IntelligentResponse,
}

impl Source {
    /// Wire representation of this tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Faq => "faq",
            Source::FaqFallback => "faq_fallback",
            Source::GenerativeGeneral => "generative_general",
            Source::GenerativeEnhanced => "generative_enhanced",
            Source::GenerativeWithFaqContext => "generative_with_faq_context",
            Source::IntelligentResponse => "intelligent_response",
        }
    }

    /// Whether the answer text was written by the generative backend
    pub fn is_generated(&self) -> bool {
        matches!(
            self,
            Source::GenerativeGeneral
                | Source::GenerativeEnhanced
                | Source::GenerativeWithFaqContext
        )
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
