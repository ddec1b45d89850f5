//! Chat relay route.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use database::chat::{self, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use database::validation::validate_message;
use database::ChatMessage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::state::AppState;

fn default_include_context() -> bool {
    true
}

/// A chat message from the extension.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Prefix the prompt with the user's browsing context.
    #[serde(default = "default_include_context")]
    pub include_context: bool,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Relay reply.
#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: String,
}

/// Send a chat message to the AI relay.
///
/// The relay never fails, so the only errors are a missing message and a
/// failure to store the exchange.
#[instrument(name = "send_chat", skip_all)]
pub async fn send_message(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let Json(request) = payload?;
    let message = validate_message(request.message.as_deref())?;

    let user_id = request.user_id.unwrap_or_default();
    let session_id = request.session_id.unwrap_or_default();

    let context = request
        .include_context
        .then(|| state.relay.get_chat_context(&user_id, &session_id));

    let response = state
        .relay
        .generate_response(&message, context.as_deref(), request.max_tokens)
        .await;

    let recorded =
        chat::record_exchange(state.db.pool(), &user_id, &session_id, &message, &response).await?;
    if !recorded.counted && !session_id.is_empty() {
        debug!(session_id = %session_id, "Chat message for unknown session not counted");
    }

    info!(user_id = %user_id, session_id = %session_id, "Chat reply sent");

    Ok(Json(ChatResponse {
        success: true,
        response,
        timestamp: database::time::now_timestamp(),
    }))
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Number of most recent exchanges to return.
    pub limit: Option<i64>,
}

/// A user's chat history.
#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub user_id: String,
    /// Total exchanges stored for the user.
    pub total: i64,
    /// Most recent exchanges, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// Return a user's most recent chat exchanges.
#[instrument(name = "chat_history", skip_all, fields(user_id = %user_id))]
pub async fn history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: std::result::Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let pool = state.db.pool();
    let total = chat::count_for_user(pool, &user_id).await?;
    let messages = chat::list_recent_for_user(pool, &user_id, limit).await?;

    Ok(Json(HistoryResponse {
        success: true,
        user_id,
        total,
        messages,
    }))
}
