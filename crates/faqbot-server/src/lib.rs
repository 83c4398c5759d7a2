//! Faqbot Server
//!
//! HTTP surface for the FAQ chat backend: loads the corpus, wires the
//! matcher, generative backend and conversation log together, and serves
//! the JSON endpoints with axum.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use faqbot_llm::{GeminiProvider, LlmError};
use faqbot_matcher::{FaqCorpus, Matcher};
use faqbot_responder::ResponseRouter;
use faqbot_store::InMemoryConversationStore;
use handlers::{create_router, AppState, SharedHistory};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Generative backend could not be constructed
    #[error("Backend error: {0}")]
    Backend(#[from] LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`, defaulting to `info`. Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the application state described by `config`
///
/// A missing or malformed FAQ file yields an empty corpus; a missing API key
/// yields a backend that always defers to the static fallback.
pub fn build_state(config: &ServerConfig) -> Result<AppState<GeminiProvider>, ServerError> {
    let corpus = Arc::new(FaqCorpus::load_or_empty(&config.faq_path));
    let matcher = Matcher::new(corpus);

    let backend = GeminiProvider::new(config.gemini.api_key.clone(), config.gemini.model.clone())?
        .with_endpoint(config.gemini.endpoint.clone());
    if !config.generative_enabled() {
        warn!("GOOGLE_API_KEY not set; answering from FAQ and static fallbacks only");
    }

    let router = ResponseRouter::new(matcher, backend, config.responder.clone());

    let history: SharedHistory = match config.history_capacity {
        Some(capacity) => Arc::new(InMemoryConversationStore::bounded(capacity)),
        None => Arc::new(InMemoryConversationStore::new()),
    };

    Ok(AppState::new(router, history, config.history_window))
}

/// Start the HTTP server
///
/// Builds the application state and serves until the process exits.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Faqbot server");
    info!("Bind address: {}", config.bind_addr());
    info!("FAQ path: {}", config.faq_path.display());
    info!("Generative backend enabled: {}", config.generative_enabled());

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server is running on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
