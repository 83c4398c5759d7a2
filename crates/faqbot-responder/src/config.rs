//! Configuration for response routing
//!
//! Defines the direct-answer threshold, context size, token budgets and the
//! generation timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default assistant persona placed at the top of every prompt
pub const DEFAULT_PERSONA: &str = "You are a helpful assistant for University of Waterloo students.";

/// Configuration for the response router
///
/// # Examples
///
/// ```
/// use faqbot_responder::ResponderConfig;
///
/// let config = ResponderConfig::default();
/// assert_eq!(config.direct_threshold, 0.85);
/// assert_eq!(config.top_k, 3);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Confidence at or above which the corpus answer is returned verbatim
    /// Default: 0.85
    pub direct_threshold: f64,

    /// Number of corpus entries passed as context to /chat generation
    /// Default: 3
    pub top_k: usize,

    /// Output token budget for /chat generation
    /// Default: 400
    pub chat_max_tokens: u32,

    /// Output token budget for /ask generation
    /// Default: 512
    pub ask_max_tokens: u32,

    /// Per-call generation timeout in milliseconds
    /// Default: 5000
    pub generation_timeout_ms: u64,

    /// Instruction line opening every prompt
    pub persona: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            direct_threshold: 0.85,
            top_k: 3,
            chat_max_tokens: 400,
            ask_max_tokens: 512,
            generation_timeout_ms: 5000,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

impl ResponderConfig {
    /// Get the generation timeout as Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_millis(self.generation_timeout_ms)
    }

    /// Check value ranges, returning a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        if !(self.direct_threshold > 0.0 && self.direct_threshold <= 1.0) {
            return Err(format!(
                "direct_threshold must be in (0, 1], got {}",
                self.direct_threshold
            ));
        }
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
        }
        if self.generation_timeout_ms == 0 {
            return Err("generation_timeout_ms must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResponderConfig::default();
        assert_eq!(config.direct_threshold, 0.85);
        assert_eq!(config.top_k, 3);
        assert_eq!(config.chat_max_tokens, 400);
        assert_eq!(config.ask_max_tokens, 512);
        assert_eq!(config.generation_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ResponderConfig = toml::from_str("top_k = 5").unwrap();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.direct_threshold, 0.85);
        assert_eq!(config.persona, DEFAULT_PERSONA);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ResponderConfig {
            direct_threshold: 0.0,
            ..ResponderConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ResponderConfig {
            top_k: 0,
            ..ResponderConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ResponderConfig::default();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: ResponderConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config.top_k, deserialized.top_k);
        assert_eq!(config.persona, deserialized.persona);
    }
}
