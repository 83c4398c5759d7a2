//! Gemini Provider Implementation
//!
//! Calls Google's Gemini `generateContent` REST API.
//!
//! # Behavior
//!
//! - A provider without an API key never touches the network and fails
//!   every call with [`LlmError::MissingCredential`]
//! - One request per call; there are no retries
//! - Client-level timeout as a backstop for the caller's own timeout
//!
//! # Examples
//!
//! ```no_run
//! use faqbot_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new(Some("api-key".to_string()), "gemini-1.5-flash").unwrap();
//! ```

use crate::LlmError;
use faqbot_domain::traits::GenerativeBackend;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default client timeout for requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sampling temperature sent with every request
const TEMPERATURE: f32 = 0.7;

/// Gemini API provider
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    /// Concatenated, trimmed text of the first candidate
    fn into_text(self) -> Result<String, LlmError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: API credential; `None` disables generation
    /// - `model`: Model to use (e.g., "gemini-1.5-flash")
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    /// Override the API endpoint (for proxies and tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// The configured model name
    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }

    /// Generate text using the Gemini API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is configured
    /// - Network communication fails or the API returns non-2xx
    /// - The response cannot be parsed, is blocked, or carries no text
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;

        let request_body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: max_tokens,
            },
        };

        debug!(model = %self.model, max_tokens, "Calling Gemini generateContent");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?
            .into_text()
    }
}

impl GenerativeBackend for GeminiProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, Self::Error> {
        self.complete(prompt, max_tokens).await
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new(Some("key".to_string()), "gemini-1.5-flash").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "gemini-1.5-flash");
        assert!(provider.is_available());
    }

    #[test]
    fn test_blank_key_disables_provider() {
        let provider = GeminiProvider::new(Some("  ".to_string()), DEFAULT_MODEL).unwrap();
        assert!(!provider.is_available());
    }

    #[test]
    fn test_url() {
        let provider = GeminiProvider::new(None, "gemini-1.5-flash")
            .unwrap()
            .with_endpoint("http://localhost:8089/");
        assert_eq!(
            provider.url(),
            "http://localhost:8089/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: 400,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 400);
    }

    #[test]
    fn test_response_text_extraction() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "  Hello "}, {"text": "there  "}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "Hello there");
    }

    #[test]
    fn test_empty_response_is_error() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(response.into_text(), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn test_blocked_response_is_error() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(matches!(response.into_text(), Err(LlmError::Blocked(r)) if r == "SAFETY"));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_without_network() {
        let provider = GeminiProvider::new(None, DEFAULT_MODEL).unwrap();
        let result = provider.generate("test", 10).await;
        assert!(matches!(result, Err(LlmError::MissingCredential)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        let provider = GeminiProvider::new(Some("key".to_string()), DEFAULT_MODEL)
            .unwrap()
            .with_endpoint("http://127.0.0.1:9");

        let result = provider.generate("test", 10).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    // Requires a real key in GOOGLE_API_KEY
    #[tokio::test]
    #[ignore]
    async fn test_gemini_generate_integration() {
        let provider = GeminiProvider::new(std::env::var("GOOGLE_API_KEY").ok(), DEFAULT_MODEL).unwrap();
        if let Ok(text) = provider.generate("Say 'hello' and nothing else", 16).await {
            assert!(!text.is_empty());
        }
    }
}
