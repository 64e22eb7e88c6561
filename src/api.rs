//! api.rs — Axum HTTP surface for the honeypot service.
//!
//! Routes mirror the deployed contract: `/honeypot` for per-turn processing,
//! `/final-output` for an on-demand report, `/session/{id}` for debugging.
//! The transport validates only the api key and the two required fields; all
//! heavier lifting lives in the core modules.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::llm::{self, DynReplyClient};
use crate::notify;
use crate::obs::anon_hash;
use crate::reply;
use crate::report;
use crate::session::{ConversationMessage, SessionStore};

pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub config: Arc<AppConfig>,
    pub reply_client: DynReplyClient,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Self {
        let reply_client = llm::build_client(&config);
        Self {
            store: Arc::new(SessionStore::new()),
            config: Arc::new(config),
            reply_client,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(AppConfig::from_env())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/honeypot", post(honeypot))
        .route("/final-output", post(final_output))
        .route("/session/{id}", get(session_debug))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// FastAPI-style error payload: `{"detail": "..."}` with a status code.
struct ApiError {
    status: StatusCode,
    detail: &'static str,
}

impl ApiError {
    fn new(status: StatusCode, detail: &'static str) -> Self {
        Self { status, detail }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

fn check_api_key(config: &AppConfig, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = &config.api_key else {
        return Ok(());
    };
    let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if provided == Some(expected.as_str()) {
        Ok(())
    } else {
        Err(ApiError::new(StatusCode::UNAUTHORIZED, "Invalid API Key"))
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Honeypot API Running",
        "version": SERVICE_VERSION,
        "status": "active",
    }))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": state.store.now_unix(),
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IncomingMessage {
    text: String,
    #[allow(dead_code)]
    timestamp: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HoneypotRequest {
    session_id: String,
    message: IncomingMessage,
    conversation_history: Vec<ConversationMessage>,
    #[allow(dead_code)]
    metadata: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct TurnResponse {
    status: &'static str,
    reply: String,
}

/// Main turn endpoint: generate a reply, fold the turn into the session,
/// and past the configured turn threshold ship the report to the callback.
async fn honeypot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<HoneypotRequest>,
) -> Result<Json<TurnResponse>, ApiError> {
    check_api_key(&state.config, &headers)?;

    let text = req.message.text.trim();
    if req.session_id.is_empty() || text.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Missing sessionId or message text",
        ));
    }

    let turn = req.conversation_history.len();
    tracing::info!(
        session = %req.session_id,
        turn = turn + 1,
        msg = %anon_hash(text),
        "turn received"
    );

    // Reply first: the LLM path if configured, else the fallback bank.
    let reply = match state
        .reply_client
        .generate(&llm::build_prompt(text, &req.conversation_history))
        .await
    {
        Some(r) => r,
        None => {
            let used = state.store.used_responses(&req.session_id);
            let scam_detected = state
                .store
                .get(&req.session_id)
                .is_some_and(|s| s.scam_detected);
            reply::pick_fallback(text, turn, &used, scam_detected)
        }
    };

    let session = state
        .store
        .update(&req.session_id, text, &req.conversation_history, &reply);
    tracing::info!(
        session = %req.session_id,
        scam_detected = session.scam_detected,
        scam_type = session.scam_type.as_str(),
        artifacts = session.intelligence.total_count(),
        "session updated"
    );

    if turn >= state.config.final_output_min_turn {
        let final_report = report::build(&req.session_id, &session, state.store.now_unix());
        state.store.mark_callback_sent(&req.session_id);
        tokio::spawn(notify::send_final_report(
            state.http.clone(),
            state.config.callback_url.clone(),
            final_report,
        ));
    }

    Ok(Json(TurnResponse {
        status: "success",
        reply,
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct FinalOutputRequest {
    session_id: String,
}

/// On-demand report for an existing session.
async fn final_output(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FinalOutputRequest>,
) -> Result<Json<report::FinalReport>, ApiError> {
    check_api_key(&state.config, &headers)?;
    if req.session_id.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Missing sessionId"));
    }

    state
        .store
        .final_report(&req.session_id)
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Session not found"))
}

/// Serializable projection of a session for inspection; the raw dedup set is
/// reduced to a count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionView {
    start_time: u64,
    scam_detected: bool,
    scam_type: &'static str,
    confidence_level: f32,
    intelligence: crate::intel::IntelligenceRecord,
    red_flags_found: Vec<String>,
    questions_asked: u32,
    total_messages_exchanged: u32,
    callback_sent: bool,
    history_processed: bool,
    used_responses_count: usize,
    messages_seen: usize,
}

async fn session_debug(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    check_api_key(&state.config, &headers)?;

    let session = state
        .store
        .get(&id)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Session not found"))?;

    Ok(Json(SessionView {
        start_time: session.start_time,
        scam_detected: session.scam_detected,
        scam_type: session.scam_type.as_str(),
        confidence_level: session.confidence_level,
        intelligence: session.intelligence,
        red_flags_found: session.red_flags_found,
        questions_asked: session.questions_asked,
        total_messages_exchanged: session.total_messages_exchanged,
        callback_sent: session.callback_sent,
        history_processed: session.history_processed,
        used_responses_count: session.used_responses.len(),
        messages_seen: session.all_scammer_texts.len(),
    }))
}
