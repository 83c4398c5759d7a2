//! Faqbot Generative Backends
//!
//! Implementations of the `GenerativeBackend` trait from `faqbot-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GeminiProvider`: Google Gemini `generateContent` REST API
//!
//! # Examples
//!
//! ```
//! use faqbot_llm::MockProvider;
//! use faqbot_domain::traits::GenerativeBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt", 64).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod gemini;

use faqbot_domain::traits::GenerativeBackend;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiProvider;

/// Errors that can occur during generation
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API credential is configured
    #[error("Missing API credential")]
    MissingCredential,

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider returned no text
    #[error("Empty response")]
    EmptyResponse,

    /// The provider refused to answer the prompt
    #[error("Prompt blocked: {0}")]
    Blocked(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Fail,
}

/// Mock provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use faqbot_llm::MockProvider;
///
/// let provider = MockProvider::new("Fixed response")
///     .with_response("prompt1", "response1")
///     .with_failure("bad prompt");
/// assert_eq!(provider.call_count(), 0);
///
/// let offline = MockProvider::failing();
/// assert_eq!(offline.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_reply: MockReply,
    replies: HashMap<String, MockReply>,
    delay: Option<Duration>,
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_reply: MockReply::Text(response.into()),
            replies: HashMap::new(),
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a MockProvider that fails every call
    pub fn failing() -> Self {
        Self {
            default_reply: MockReply::Fail,
            ..Self::default()
        }
    }

    /// Return `response` for exactly `prompt`
    pub fn with_response(mut self, prompt: impl Into<String>, response: impl Into<String>) -> Self {
        self.replies
            .insert(prompt.into(), MockReply::Text(response.into()));
        self
    }

    /// Fail for exactly `prompt`
    pub fn with_failure(mut self, prompt: impl Into<String>) -> Self {
        self.replies.insert(prompt.into(), MockReply::Fail);
        self
    }

    /// Sleep for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl GenerativeBackend for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.replies.get(prompt).unwrap_or(&self.default_reply) {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail => Err(LlmError::Other("Mock error".to_string())),
        }
    }
}
