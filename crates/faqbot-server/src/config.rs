//! Configuration file parsing for the server.
//!
//! Loads settings from TOML files including bind address, FAQ path, history
//! window, Gemini credentials and routing thresholds. Environment variables
//! `PORT`, `GOOGLE_API_KEY` and `FAQ_PATH` override file values.

use faqbot_llm::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use faqbot_responder::ResponderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (default: 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Path to the FAQ JSON file
    #[serde(default = "default_faq_path")]
    pub faq_path: PathBuf,

    /// Number of turns returned with each /chat response (default: 10)
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Maximum retained turns; unbounded when absent
    #[serde(default)]
    pub history_capacity: Option<usize>,

    /// Generative backend settings
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Routing thresholds and budgets
    #[serde(default)]
    pub responder: ResponderConfig,
}

/// Gemini backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    /// API key; generation is disabled without one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

fn default_faq_path() -> PathBuf {
    PathBuf::from("faq.json")
}

fn default_history_window() -> usize {
    10
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration with every default and no API key
    pub fn default_config() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            faq_path: default_faq_path(),
            history_window: default_history_window(),
            history_capacity: None,
            gemini: GeminiConfig::default(),
            responder: ResponderConfig::default(),
        }
    }

    /// Apply `PORT`, `GOOGLE_API_KEY` and `FAQ_PATH` from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.bind_port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a port number: {}", port)))?;
        }
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.gemini.api_key = Some(key);
        }
        if let Some(path) = lookup("FAQ_PATH") {
            self.faq_path = PathBuf::from(path);
        }
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.responder.validate().map_err(ConfigError::Invalid)
    }

    /// Whether an API key is configured
    pub fn generative_enabled(&self) -> bool {
        self.gemini
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default_config();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 5000);
        assert_eq!(config.history_window, 10);
        assert!(config.history_capacity.is_none());
        assert!(!config.generative_enabled());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000
            faq_path = "data/faq.json"
            history_capacity = 200

            [gemini]
            api_key = "secret"
            model = "gemini-1.5-pro"

            [responder]
            direct_threshold = 0.9
            top_k = 5
        "#;

        let config: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert_eq!(config.faq_path, PathBuf::from("data/faq.json"));
        assert_eq!(config.history_window, 10);
        assert_eq!(config.history_capacity, Some(200));
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.gemini.endpoint, DEFAULT_ENDPOINT);
        assert!(config.generative_enabled());
        assert_eq!(config.responder.direct_threshold, 0.9);
        assert_eq!(config.responder.top_k, 5);
        assert_eq!(config.responder.ask_max_tokens, 512);
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.bind_port, 5000);
        assert_eq!(config.gemini.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8081"),
            ("GOOGLE_API_KEY", "from-env"),
            ("FAQ_PATH", "/srv/faq.json"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::default_config()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.bind_port, 8081);
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.faq_path, PathBuf::from("/srv/faq.json"));
    }

    #[test]
    fn test_bad_port_override() {
        let result = ServerConfig::default_config()
            .with_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_responder_section() {
        let config: ServerConfig = toml::from_str("[responder]\ntop_k = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_key_is_disabled() {
        let mut config = ServerConfig::default_config();
        config.gemini.api_key = Some("   ".to_string());
        assert!(!config.generative_enabled());
    }
}
