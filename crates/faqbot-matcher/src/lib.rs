//! Faqbot Matcher
//!
//! Scores free text against a static FAQ corpus.
//!
//! # Modes
//!
//! - **Strict** ([`Matcher::search`]): three ordered passes (exact, phrase
//!   containment, token overlap), first hit wins, otherwise no match.
//! - **Ranked** ([`Matcher::most_relevant`], [`Matcher::relevant`]): every
//!   entry is scored with one precedence table and the results are ranked.
//!
//! # Examples
//!
//! ```
//! use faqbot_domain::FaqEntry;
//! use faqbot_matcher::{FaqCorpus, Matcher};
//! use std::sync::Arc;
//!
//! let corpus = FaqCorpus::new(vec![FaqEntry::new(
//!     "How do I find off-campus housing?",
//!     "Visit the Off-Campus Housing Office.",
//! )]);
//! let matcher = Matcher::new(Arc::new(corpus));
//!
//! let hit = matcher.search("how do I find off campus housing").unwrap();
//! assert_eq!(hit.answer, "Visit the Off-Campus Housing Office.");
//! assert_eq!(matcher.most_relevant("how do I find off campus housing").confidence, 1.0);
//! ```

#![warn(missing_docs)]

pub mod corpus;
pub mod scoring;
pub mod text;

use faqbot_domain::{FaqEntry, MatchResult};
use std::sync::Arc;
use tracing::debug;

pub use corpus::{CorpusLoadError, FaqCorpus};
pub use scoring::ScoredEntry;
pub use text::NormalizedText;

/// Minimum qualifying tokens on both sides for the phrase-containment pass
const PHRASE_MIN_TOKENS: usize = 2;

/// Minimum qualifying tokens on both sides for the token-overlap pass
const OVERLAP_MIN_TOKENS: usize = 3;

/// Query token count at which the stricter overlap threshold applies
const LONG_QUERY_TOKENS: usize = 5;

/// Overlap ratio required for short queries
const OVERLAP_THRESHOLD: f64 = 0.6;

/// Overlap ratio required for long queries
const LONG_OVERLAP_THRESHOLD: f64 = 0.7;

/// Matches user text against a shared, read-only FAQ corpus
#[derive(Debug, Clone)]
pub struct Matcher {
    corpus: Arc<FaqCorpus>,
}

impl Matcher {
    /// Create a matcher over the given corpus
    pub fn new(corpus: Arc<FaqCorpus>) -> Self {
        Self { corpus }
    }

    /// The corpus this matcher reads
    pub fn corpus(&self) -> &FaqCorpus {
        &self.corpus
    }

    /// Strict search: return the first entry accepted by any of the passes
    ///
    /// Returns `None` when no pass accepts an entry. Absence is not an error;
    /// callers route it to a fallback path.
    pub fn search(&self, query: &str) -> Option<&FaqEntry> {
        let query = NormalizedText::new(query);

        let hit = self
            .exact_pass(&query)
            .or_else(|| self.phrase_pass(&query))
            .or_else(|| self.overlap_pass(&query));

        debug!(query = %query.lowered(), matched = hit.is_some(), "strict FAQ search");
        hit
    }

    fn exact_pass(&self, query: &NormalizedText) -> Option<&FaqEntry> {
        self.corpus
            .iter()
            .find(|(_, text)| query.is_same_question(text))
            .map(|(entry, _)| entry)
    }

    fn phrase_pass(&self, query: &NormalizedText) -> Option<&FaqEntry> {
        if query.token_count() < PHRASE_MIN_TOKENS {
            return None;
        }
        self.corpus
            .iter()
            .find(|(_, text)| {
                text.token_count() >= PHRASE_MIN_TOKENS && text.contains_either(query)
            })
            .map(|(entry, _)| entry)
    }

    fn overlap_pass(&self, query: &NormalizedText) -> Option<&FaqEntry> {
        let query_tokens = query.token_count();
        if query_tokens < OVERLAP_MIN_TOKENS {
            return None;
        }
        let threshold = if query_tokens >= LONG_QUERY_TOKENS {
            LONG_OVERLAP_THRESHOLD
        } else {
            OVERLAP_THRESHOLD
        };

        self.corpus
            .iter()
            .find(|(_, text)| {
                if text.token_count() < OVERLAP_MIN_TOKENS {
                    return false;
                }
                let matching = query.matching_tokens(text);
                matching > 0 && matching as f64 / query_tokens as f64 >= threshold
            })
            .map(|(entry, _)| entry)
    }

    /// Ranked search: the single highest-scoring entry and its confidence
    ///
    /// Ties go to the entry that appears first in the corpus.
    pub fn most_relevant(&self, query: &str) -> MatchResult {
        let result = match self.rank(query, 1).into_iter().next() {
            Some(best) => MatchResult::new(best.entry.clone(), best.score),
            None => MatchResult::none(),
        };
        debug!(
            query = %query,
            confidence = result.confidence,
            matched = result.is_match(),
            "ranked FAQ match"
        );
        result
    }

    /// The top `limit` entries with a score above zero, best first
    pub fn relevant(&self, query: &str, limit: usize) -> Vec<ScoredEntry<'_>> {
        self.rank(query, limit)
    }

    fn rank(&self, query: &str, limit: usize) -> Vec<ScoredEntry<'_>> {
        let query = NormalizedText::new(query);
        scoring::rank(
            self.corpus
                .iter()
                .map(|(entry, text)| (entry, scoring::score(&query, text))),
            limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(entries: &[(&str, &str)]) -> Matcher {
        let entries = entries
            .iter()
            .map(|(q, a)| FaqEntry::new(*q, *a))
            .collect();
        Matcher::new(Arc::new(FaqCorpus::new(entries)))
    }

    fn campus() -> Matcher {
        matcher(&[
            (
                "How do I find off-campus housing?",
                "Visit the Off-Campus Housing Office.",
            ),
            (
                "Where can I get food near residence?",
                "Try the REV and V1 dining halls.",
            ),
            ("Where is the food court?", "South Campus Hall."),
            (
                "How do I activate my bus pass?",
                "Your WatCard is your U-Pass.",
            ),
        ])
    }

    #[test]
    fn test_exact_pass_ignores_case_and_punctuation() {
        let m = campus();
        let hit = m.search("  HOW DO I FIND OFF CAMPUS HOUSING  ").unwrap();
        assert_eq!(hit.answer, "Visit the Off-Campus Housing Office.");
    }

    #[test]
    fn test_phrase_pass_requires_two_tokens_each_side() {
        let m = campus();
        let hit = m.search("food court").unwrap();
        assert_eq!(hit.answer, "South Campus Hall.");
    }

    #[test]
    fn test_single_word_never_matches_strictly() {
        let m = campus();
        assert!(m.search("food").is_none());
    }

    #[test]
    fn test_overlap_pass() {
        let m = campus();
        let hit = m.search("activate bus pass please").unwrap();
        assert_eq!(hit.answer, "Your WatCard is your U-Pass.");
    }

    #[test]
    fn test_overlap_pass_needs_three_tokens() {
        let m = matcher(&[("Where can students park cars?", "Lot X.")]);
        assert!(m.search("cars park").is_none());
    }

    #[test]
    fn test_long_query_uses_stricter_threshold() {
        // 5 query tokens, 3 of them match: 0.6 passes short queries but not long ones.
        let m = matcher(&[("Which campus gym opens early?", "CIF opens at 7am.")]);
        assert!(m.search("which campus gym lifting weights").is_none());
        // 4 query tokens, 3 match: 0.75 clears the short threshold.
        assert!(m.search("which campus gym weights").is_some());
    }

    #[test]
    fn test_punctuation_only_question_matches_itself() {
        let m = Matcher::new(Arc::new(FaqCorpus::new(vec![
            FaqEntry::new("Where is the gym?", "CIF."),
            FaqEntry::new("???", "huh"),
        ])));
        assert_eq!(m.search("???").map(|e| e.answer.as_str()), Some("huh"));
        let ranked = m.most_relevant("???");
        assert_eq!(ranked.confidence, 1.0);
        assert_eq!(ranked.entry.unwrap().answer, "huh");
    }

    #[test]
    fn test_no_match_returns_none() {
        let m = campus();
        assert!(m.search("what clubs exist").is_none());
    }

    #[test]
    fn test_empty_corpus_never_matches() {
        let m = Matcher::new(Arc::new(FaqCorpus::empty()));
        assert!(m.search("where is the food court").is_none());
        assert!(!m.most_relevant("where is the food court").is_match());
    }

    #[test]
    fn test_most_relevant_exact() {
        let m = campus();
        let result = m.most_relevant("where is the food court?");
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.entry.unwrap().answer, "South Campus Hall.");
    }

    #[test]
    fn test_most_relevant_off_campus_beats_food() {
        let m = matcher(&[
            ("Where is the food court?", "South Campus Hall."),
            (
                "Cheap off-campus food options?",
                "Plaza restaurants on University Ave.",
            ),
        ]);
        let both = m.most_relevant("off-campus food ideas");
        assert_eq!(both.confidence, 0.98);
        assert_eq!(both.entry.unwrap().answer, "Plaza restaurants on University Ave.");

        let food_only = m.most_relevant("food ideas");
        assert_eq!(food_only.confidence, 0.85);
        assert!(both.confidence >= food_only.confidence);
    }

    #[test]
    fn test_most_relevant_ties_go_to_first_entry() {
        let m = matcher(&[
            ("Late night food spots", "First"),
            ("Healthy food spots", "Second"),
        ]);
        for _ in 0..5 {
            let result = m.most_relevant("food");
            assert_eq!(result.confidence, 0.85);
            assert_eq!(result.entry.unwrap().answer, "First");
        }
    }

    #[test]
    fn test_most_relevant_no_match() {
        let m = campus();
        let result = m.most_relevant("xyz");
        assert!(!result.is_match());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_relevant_top_k_ordering() {
        let m = campus();
        let top = m.relevant("food", 3);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].entry.answer, "Try the REV and V1 dining halls.");
        assert_eq!(top[1].entry.answer, "South Campus Hall.");
        assert!((top[0].relevance() - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_relevant_respects_limit_and_skips_zero() {
        let m = campus();
        assert_eq!(m.relevant("where", 1).len(), 1);
        assert!(m.relevant("xyz", 3).is_empty());
        assert!(m.relevant("food", 0).is_empty());
    }
}
