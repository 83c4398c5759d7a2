//! Faqbot Responder
//!
//! Decides how to answer a query given the matcher's confidence.
//!
//! # Decision policy
//!
//! - confidence ≥ threshold: answer from the corpus (`faq`)
//! - 0 < confidence < threshold: generate with the matched entries as
//!   context; on failure paraphrase the best entry (`faq_fallback`)
//! - no match: generate unguided (`generative_general`); on failure use
//!   the static intent fallback (`intelligent_response`)
//!
//! Generation failures of any kind, including timeouts, are recovered here
//! and are visible to callers only through the `source` tag.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod intent;
pub mod prompt;


use faqbot_domain::traits::GenerativeBackend;
use faqbot_domain::{RoutingDecision, Source};
use faqbot_matcher::{Matcher, ScoredEntry};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

pub use config::ResponderConfig;
pub use error::GenerationError;
pub use intent::{IntentRule, StaticIntentFallback};
pub use prompt::PromptBuilder;

/// Which endpoint contract a query is answered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Single best match, blended with one entry
    Ask,
    /// Strict search first, blended with the top-K entries
    Chat,
}

impl Flow {
    fn blended_source(self) -> Source {
        match self {
            Flow::Ask => Source::GenerativeEnhanced,
            Flow::Chat => Source::GenerativeWithFaqContext,
        }
    }

    fn max_tokens(self, config: &ResponderConfig) -> u32 {
        match self {
            Flow::Ask => config.ask_max_tokens,
            Flow::Chat => config.chat_max_tokens,
        }
    }
}

/// Routes queries between the corpus, the generative backend and the
/// static fallback
pub struct ResponseRouter<G> {
    matcher: Matcher,
    backend: G,
    fallback: StaticIntentFallback,
    config: ResponderConfig,
    rng: Mutex<StdRng>,
}

impl<G: GenerativeBackend> ResponseRouter<G> {
    /// Create a router with an entropy-seeded paraphrase RNG
    pub fn new(matcher: Matcher, backend: G, config: ResponderConfig) -> Self {
        Self {
            matcher,
            backend,
            fallback: StaticIntentFallback::default(),
            config,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seed the paraphrase RNG for reproducible template choice
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Replace the static intent fallback
    pub fn with_fallback(mut self, fallback: StaticIntentFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// The matcher used for routing
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The generative backend
    pub fn backend(&self) -> &G {
        &self.backend
    }

    /// Answer using the single best corpus match
    pub async fn ask(&self, question: &str) -> RoutingDecision {
        let best = self.matcher.most_relevant(question);
        let candidates: Vec<ScoredEntry<'_>> = best
            .entry
            .iter()
            .map(|entry| ScoredEntry {
                entry,
                score: best.confidence,
            })
            .collect();
        self.route(question, &candidates, Flow::Ask).await
    }

    /// Answer using strict search, then the top-K corpus entries as context
    ///
    /// A strict hit answers from the corpus with confidence 1.0 whichever
    /// search pass accepted it; the value marks a strict hit, not a ranked
    /// score.
    pub async fn chat(&self, message: &str) -> RoutingDecision {
        if let Some(entry) = self.matcher.search(message) {
            debug!(question = %entry.question, "Strict FAQ hit");
            return RoutingDecision::new(entry.answer.clone(), Source::Faq, 1.0)
                .with_context(vec![entry.question.clone()]);
        }
        let candidates = self.matcher.relevant(message, self.config.top_k);
        self.route(message, &candidates, Flow::Chat).await
    }

    async fn route(
        &self,
        query: &str,
        candidates: &[ScoredEntry<'_>],
        flow: Flow,
    ) -> RoutingDecision {
        let max_tokens = flow.max_tokens(&self.config);

        let Some(best) = candidates.first() else {
            return self.unguided(query, max_tokens).await;
        };
        let context: Vec<String> = candidates
            .iter()
            .map(|c| c.entry.question.clone())
            .collect();

        if best.score >= self.config.direct_threshold {
            debug!(confidence = best.score, "Answering directly from FAQ");
            return RoutingDecision::new(best.entry.answer.clone(), Source::Faq, best.score)
                .with_context(vec![best.entry.question.clone()]);
        }

        let prompt = PromptBuilder::new(&self.config.persona, query)
            .with_faq_context(candidates.iter().map(|c| c.entry))
            .build();

        let source = flow.blended_source();
        match self.generate(&prompt, max_tokens).await {
            Ok(answer) => RoutingDecision::new(answer, source, best.score).with_context(context),
            Err(e) => {
                warn!(error = %e, path = %source, "Blended generation failed, paraphrasing FAQ");
                let answer = {
                    let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
                    prompt::paraphrase(best.entry, &mut *rng)
                };
                RoutingDecision::new(answer, Source::FaqFallback, best.score)
                    .with_context(vec![best.entry.question.clone()])
            }
        }
    }

    async fn unguided(&self, query: &str, max_tokens: u32) -> RoutingDecision {
        let prompt = PromptBuilder::new(&self.config.persona, query).build();
        match self.generate(&prompt, max_tokens).await {
            Ok(answer) => RoutingDecision::new(answer, Source::GenerativeGeneral, 0.0),
            Err(e) => {
                warn!(error = %e, "Unguided generation failed, using static fallback");
                RoutingDecision::new(
                    self.fallback.respond(query),
                    Source::IntelligentResponse,
                    0.0,
                )
            }
        }
    }

    /// One generation attempt under the configured timeout; no retries
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerationError> {
        if !self.backend.is_available() {
            return Err(GenerationError::Unavailable);
        }
        let timeout = self.config.generation_timeout();
        match tokio::time::timeout(timeout, self.backend.generate(prompt, max_tokens)).await {
            Ok(Ok(text)) if text.trim().is_empty() => {
                Err(GenerationError::Backend("empty response".to_string()))
            }
            Ok(Ok(text)) => Ok(text.trim().to_string()),
            Ok(Err(e)) => Err(GenerationError::Backend(e.to_string())),
            Err(_) => Err(GenerationError::Timeout(timeout)),
        }
    }
}
