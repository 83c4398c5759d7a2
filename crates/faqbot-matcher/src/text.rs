//! Text normalization and tokenization

/// Tokens must be longer than this many characters to count
const MIN_TOKEN_CHARS: usize = 2;

/// Pre-computed normalized forms of a piece of text
///
/// - `lowered`: lowercased and trimmed; used for containment, keyword rules
///   and tokenization.
/// - `canonical`: `lowered` with punctuation folded to spaces and whitespace
///   collapsed; used only for equality, so "off-campus housing?" and
///   "off campus housing" compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    lowered: String,
    canonical: String,
    tokens: Vec<String>,
    char_len: usize,
}

impl NormalizedText {
    /// Normalize raw text
    pub fn new(raw: &str) -> Self {
        let lowered = raw.to_lowercase().trim().to_string();
        let canonical = canonicalize(&lowered);
        let tokens = tokenize(&lowered);
        let char_len = lowered.chars().count();
        Self {
            lowered,
            canonical,
            tokens,
            char_len,
        }
    }

    /// Lowercased, trimmed text
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Punctuation-insensitive form used for equality
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Qualifying tokens (whitespace separated, longer than two characters)
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of qualifying tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Length of the lowered text in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Whether the lowered text contains `keyword`
    pub fn has(&self, keyword: &str) -> bool {
        self.lowered.contains(keyword)
    }

    /// Whether either lowered text is a substring of the other
    pub fn contains_either(&self, other: &NormalizedText) -> bool {
        self.lowered.contains(other.lowered.as_str())
            || other.lowered.contains(self.lowered.as_str())
    }

    /// Whether both texts ask the same question
    ///
    /// Identical lowered forms always count, so punctuation-only questions
    /// still equal themselves. Otherwise the canonical forms must agree and
    /// be non-empty.
    pub fn is_same_question(&self, other: &NormalizedText) -> bool {
        if self.lowered.is_empty() {
            return false;
        }
        self.lowered == other.lowered
            || (!self.canonical.is_empty() && self.canonical == other.canonical)
    }

    /// How many of this text's tokens match some token of `other`
    ///
    /// Two tokens match when either is a substring of the other.
    pub fn matching_tokens(&self, other: &NormalizedText) -> usize {
        self.tokens
            .iter()
            .filter(|token| other.tokens.iter().any(|candidate| tokens_match(token, candidate)))
            .count()
    }
}

fn canonicalize(lowered: &str) -> String {
    let folded: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokenize(lowered: &str) -> Vec<String> {
    lowered
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

fn tokens_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}
