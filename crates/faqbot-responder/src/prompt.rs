//! Prompt construction and corpus paraphrasing

use faqbot_domain::FaqEntry;
use rand::Rng;

/// Openers for answering from a corpus entry when generation fails
const PARAPHRASE_OPENERS: &[&str] = &[
    "Based on the information I have: ",
    "Here's what I can tell you: ",
    "Great question! ",
];

/// Builds prompts for the generative backend
pub struct PromptBuilder<'a> {
    persona: &'a str,
    question: &'a str,
    faq_context: Vec<&'a FaqEntry>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(persona: &'a str, question: &'a str) -> Self {
        Self {
            persona,
            question,
            faq_context: Vec::new(),
        }
    }

    /// Add corpus entries to ground the answer
    pub fn with_faq_context(mut self, entries: impl IntoIterator<Item = &'a FaqEntry>) -> Self {
        self.faq_context.extend(entries);
        self
    }

    /// Build the complete prompt
    ///
    /// Without context this is a plain question/answer prompt; with context
    /// each entry is listed as `FAQ: question -> answer`.
    pub fn build(&self) -> String {
        let mut prompt = String::new();
        prompt.push_str(self.persona);
        prompt.push('\n');

        if self.faq_context.is_empty() {
            prompt.push_str(&format!("Question: {}\nAnswer:", self.question));
            return prompt;
        }

        prompt.push_str("Use the FAQ to answer naturally.\n");
        for entry in &self.faq_context {
            prompt.push_str(&format!("FAQ: {} -> {}\n", entry.question, entry.answer));
        }
        prompt.push_str(&format!("User: {}\nAssistant:", self.question));
        prompt
    }
}

/// Wrap a corpus answer in a randomly chosen conversational opener
pub fn paraphrase<R: Rng + ?Sized>(entry: &FaqEntry, rng: &mut R) -> String {
    let opener = PARAPHRASE_OPENERS[rng.gen_range(0..PARAPHRASE_OPENERS.len())];
    format!("{}{}", opener, entry.answer)
}
