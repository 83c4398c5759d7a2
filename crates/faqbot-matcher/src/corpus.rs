//! FAQ corpus loading
//!
//! The corpus is a JSON array of `{"question": ..., "answer": ...}` objects.
//! It is loaded once at startup and is read-only afterwards.

use crate::text::NormalizedText;
use faqbot_domain::FaqEntry;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors that can occur while loading the corpus
#[derive(Error, Debug)]
pub enum CorpusLoadError {
    /// The corpus file could not be read
    #[error("Failed to read FAQ file: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus file is not a JSON array of question/answer objects
    #[error("Failed to parse FAQ JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct RawEntry {
    question: String,
    answer: String,
}

/// Ordered, immutable collection of FAQ entries
///
/// Normalized forms of every question are computed once at construction.
#[derive(Debug, Clone, Default)]
pub struct FaqCorpus {
    entries: Vec<FaqEntry>,
    normalized: Vec<NormalizedText>,
}

impl FaqCorpus {
    /// Build a corpus, skipping entries whose question is blank
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            if entry.question.trim().is_empty() {
                warn!(index, "Skipping FAQ entry with blank question");
                continue;
            }
            normalized.push(NormalizedText::new(&entry.question));
            kept.push(entry);
        }

        Self {
            entries: kept,
            normalized,
        }
    }

    /// An empty corpus; every query falls through to the fallback paths
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a corpus from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, CorpusLoadError> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        Ok(Self::new(
            raw.into_iter()
                .map(|r| FaqEntry::new(r.question, r.answer))
                .collect(),
        ))
    }

    /// Load a corpus from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CorpusLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load a corpus, degrading to an empty one on any error
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(corpus) => {
                info!(path = %path.display(), entries = corpus.len(), "FAQ data loaded");
                corpus
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Error loading FAQ data, continuing with empty corpus");
                Self::empty()
            }
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the corpus has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in corpus order
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    /// Entries paired with their normalized questions, in corpus order
    pub fn iter(&self) -> impl Iterator<Item = (&FaqEntry, &NormalizedText)> {
        self.entries.iter().zip(self.normalized.iter())
    }
}
