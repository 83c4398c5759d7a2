//! HTTP request handlers for the chat backend.
//!
//! Implements the chat, ask, history, liveness and health endpoints using axum.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use chrono::{DateTime, Utc};
use faqbot_domain::traits::{ConversationStore, GenerativeBackend};
use faqbot_domain::{ConversationTurn, RoutingDecision};
use faqbot_responder::ResponseRouter;
use faqbot_store::StoreError;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Body returned for every 500
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Shared conversation log
pub type SharedHistory = Arc<dyn ConversationStore<Error = StoreError>>;

/// Shared application state
pub struct AppState<G> {
    /// Response router over the corpus and generative backend
    pub router: Arc<ResponseRouter<G>>,
    /// Conversation log
    pub history: SharedHistory,
    /// Number of turns returned with each /chat response
    pub history_window: usize,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            history: Arc::clone(&self.history),
            history_window: self.history_window,
        }
    }
}

impl<G: GenerativeBackend> AppState<G> {
    /// Create application state
    pub fn new(router: ResponseRouter<G>, history: SharedHistory, history_window: usize) -> Self {
        Self {
            router: Arc::new(router),
            history,
            history_window,
        }
    }
}

/// /chat request
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// User message
    #[serde(default)]
    pub message: Option<String>,
}

/// /ask request
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    /// User question
    #[serde(default)]
    pub question: Option<String>,
}

/// One conversation turn on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnBody {
    /// "user" or "bot"
    pub role: String,
    /// Message text
    pub content: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

impl From<&ConversationTurn> for TurnBody {
    fn from(turn: &ConversationTurn) -> Self {
        let timestamp = i64::try_from(turn.timestamp_ms)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_default()
            .to_rfc3339();
        Self {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
            timestamp,
        }
    }
}

/// Routing details attached to /chat responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMetadata {
    /// Matcher confidence behind the chosen path
    pub confidence: f64,
    /// Questions of the FAQ entries that informed the answer
    pub faq_context: Vec<String>,
}

/// /chat response
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Answer text
    pub response: String,
    /// Most recent turns, including this exchange
    pub history: Vec<TurnBody>,
    /// Provenance tag
    pub source: String,
    /// Routing details
    pub metadata: ChatMetadata,
}

/// /ask response
#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text
    pub answer: String,
    /// Provenance tag
    pub source: String,
    /// Matcher confidence
    pub confidence: f64,
}

/// GET /history response
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Every retained turn, oldest first
    pub history: Vec<TurnBody>,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Always "ok" while the process serves requests
    pub status: String,
    /// Number of loaded FAQ entries
    pub faq_entries: usize,
    /// Whether the generative backend has a credential
    pub generative_enabled: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// A required request field is missing
    InputError(&'static str),
    /// Conversation log failure
    StoreError(StoreError),
    /// Internal server error
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InputError(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            AppError::StoreError(e) => {
                error!(error = %e, "Conversation store failure");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
            AppError::InternalError(msg) => {
                error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::StoreError(e)
    }
}

/// Non-blank text from an optional field
fn required(value: Option<String>, message: &'static str) -> Result<String, AppError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(AppError::InputError(message))
}

fn turns(turns: &[ConversationTurn]) -> Vec<TurnBody> {
    turns.iter().map(TurnBody::from).collect()
}

/// GET / - Liveness message
async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Chatbot API is running!".to_string(),
    })
}

/// GET /health - Corpus and backend status
async fn health_check<G: GenerativeBackend + 'static>(
    State(state): State<AppState<G>>,
) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "ok".to_string(),
        faq_entries: state.router.matcher().corpus().len(),
        generative_enabled: state.router.backend().is_available(),
    })
}

/// POST /chat - Answer a message and record the exchange
///
/// A missing, non-string or whitespace-only `message` is rejected with 400
/// and nothing is recorded.
async fn chat<G: GenerativeBackend + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let message = required(request.message, "Message is required")?;

    state.history.append(ConversationTurn::user(message.as_str()))?;

    let RoutingDecision {
        answer,
        source,
        confidence,
        context,
    } = state.router.chat(&message).await;
    debug!(
        source = %source,
        generated = source.is_generated(),
        confidence,
        "Answered chat message"
    );

    state.history.append(ConversationTurn::bot(answer.as_str()))?;
    let history = state.history.recent(state.history_window)?;

    Ok(Json(ChatResponse {
        response: answer,
        history: turns(&history),
        source: source.to_string(),
        metadata: ChatMetadata {
            confidence,
            faq_context: context,
        },
    }))
}

/// POST /ask - Answer a question from the single best FAQ match
///
/// A missing, non-string or whitespace-only `question` is rejected with 400.
async fn ask<G: GenerativeBackend + 'static>(
    State(state): State<AppState<G>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let question = required(request.question, "Question is required")?;

    let decision = state.router.ask(&question).await;
    debug!(
        source = %decision.source,
        generated = decision.source.is_generated(),
        confidence = decision.confidence,
        "Answered question"
    );

    Ok(Json(AskResponse {
        answer: decision.answer,
        source: decision.source.to_string(),
        confidence: decision.confidence,
    }))
}

/// GET /history - Full conversation log
async fn get_history<G: GenerativeBackend + 'static>(
    State(state): State<AppState<G>>,
) -> Result<Json<HistoryResponse>, AppError> {
    let history = state.history.all()?;
    Ok(Json(HistoryResponse {
        history: turns(&history),
    }))
}

/// DELETE /history - Clear the conversation log
async fn clear_history<G: GenerativeBackend + 'static>(
    State(state): State<AppState<G>>,
) -> Result<Json<MessageResponse>, AppError> {
    state.history.clear()?;
    Ok(Json(MessageResponse {
        message: "Chat history cleared".to_string(),
    }))
}

/// Turn a handler panic into an opaque 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::InternalError(format!("handler panicked: {}", detail)).into_response()
}

/// Create the axum router with all routes
pub fn create_router<G: GenerativeBackend + 'static>(state: AppState<G>) -> AxumRouter {
    AxumRouter::new()
        .route("/", get(root))
        .route("/health", get(health_check::<G>))
        .route("/chat", post(chat::<G>))
        .route("/ask", post(ask::<G>))
        .route("/history", get(get_history::<G>).delete(clear_history::<G>))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
