//! Relevance scoring shared by the ranked matcher and the top-K context builder

use crate::text::NormalizedText;
use faqbot_domain::FaqEntry;

/// Keyword rules checked in order after the equality rule.
///
/// A rule fires when every keyword appears in both the query and the
/// question. Rows that can never fire before an earlier, looser row are kept
/// so the table reads the same as the documented precedence.
const KEYWORD_RULES: &[(&[&str], f64)] = &[
    (&["off-campus"], 0.98),
    (&["food", "off-campus"], 0.98),
    (&["residence"], 0.95),
    (&["food", "residence"], 0.95),
    (&["food"], 0.85),
];

/// Length ratio above which a containment match counts as close
const CONTAINMENT_CLOSE_RATIO: f64 = 0.6;
const CONTAINMENT_CLOSE_SCORE: f64 = 0.8;
const CONTAINMENT_LOOSE_SCORE: f64 = 0.5;

/// Token ratio at which overlap scores proportionally
const OVERLAP_RATIO: f64 = 0.6;
const OVERLAP_WEIGHT: f64 = 0.7;
const WEAK_OVERLAP_SCORE: f64 = 0.3;

/// An entry with its relevance score in [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry<'a> {
    /// The corpus entry
    pub entry: &'a FaqEntry,
    /// Score in [0, 1]
    pub score: f64,
}

impl ScoredEntry<'_> {
    /// Score scaled to [0, 100] for display
    pub fn relevance(&self) -> f64 {
        self.score * 100.0
    }
}

/// Score one corpus question against a query; first applicable rule wins
pub fn score(query: &NormalizedText, question: &NormalizedText) -> f64 {
    if query.lowered().is_empty() {
        return 0.0;
    }
    if query.is_same_question(question) {
        return 1.0;
    }

    for (keywords, weight) in KEYWORD_RULES {
        if keywords.iter().all(|kw| query.has(kw) && question.has(kw)) {
            return *weight;
        }
    }

    if query.contains_either(question) {
        let shorter = query.char_len().min(question.char_len()) as f64;
        let longer = query.char_len().max(question.char_len()) as f64;
        return if shorter / longer > CONTAINMENT_CLOSE_RATIO {
            CONTAINMENT_CLOSE_SCORE
        } else {
            CONTAINMENT_LOOSE_SCORE
        };
    }

    let matching = query.matching_tokens(question);
    if matching == 0 {
        return 0.0;
    }
    let ratio = matching as f64 / query.token_count() as f64;
    if ratio >= OVERLAP_RATIO {
        ratio * OVERLAP_WEIGHT
    } else {
        WEAK_OVERLAP_SCORE
    }
}

/// Keep the `limit` best entries with a positive score, best first
///
/// The sort is stable, so among equal scores the entry seen first stays
/// first. With `limit == 1` this is a strict-greater argmax.
pub fn rank<'a>(
    scored: impl Iterator<Item = (&'a FaqEntry, f64)>,
    limit: usize,
) -> Vec<ScoredEntry<'a>> {
    let mut ranked: Vec<ScoredEntry<'a>> = scored
        .filter(|(_, score)| *score > 0.0)
        .map(|(entry, score)| ScoredEntry { entry, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}
