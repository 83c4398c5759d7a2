//! FAQ corpus records and match results

/// A single question/answer pair from the FAQ corpus
///
/// Entries are created once when the corpus is loaded and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    /// The canonical question text as written in the corpus
    pub question: String,
    /// The answer returned when this entry is matched
    pub answer: String,
}

impl FaqEntry {
    /// Create a new entry
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Result of ranking a query against the corpus
///
/// `confidence` is always within [0.0, 1.0]. A confidence of zero means no
/// entry scored at all and `entry` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Best-scoring entry, if any scored above zero
    pub entry: Option<FaqEntry>,
    /// Score of `entry`
    pub confidence: f64,
}

impl MatchResult {
    /// A result with no matching entry
    pub fn none() -> Self {
        Self {
            entry: None,
            confidence: 0.0,
        }
    }

    /// A result for the given entry, clamping confidence into [0, 1]
    pub fn new(entry: FaqEntry, confidence: f64) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        if confidence == 0.0 {
            return Self::none();
        }
        Self {
            entry: Some(entry),
            confidence,
        }
    }

    /// Whether any entry matched
    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_none() {
        let result = MatchResult::none();
        assert!(!result.is_match());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_match_result_clamps() {
        let entry = FaqEntry::new("q", "a");
        let result = MatchResult::new(entry.clone(), 1.7);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.entry, Some(entry));
    }

    #[test]
    fn test_zero_confidence_drops_entry() {
        let result = MatchResult::new(FaqEntry::new("q", "a"), 0.0);
        assert!(!result.is_match());
    }
}
