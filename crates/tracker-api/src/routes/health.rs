//! Health check endpoint.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    /// "connected" or "error"
    pub database: &'static str,
    /// "configured" or "not_configured"
    pub gemini_ai: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = match database::inspect::ping(state.db.pool()).await {
        Ok(()) => "connected",
        Err(err) => {
            tracing::error!(error = %err, "Database health check failed");
            "error"
        }
    };

    let gemini_ai = if state.relay.is_available() {
        "configured"
    } else {
        "not_configured"
    };

    let endpoints = BTreeMap::from([
        ("chat", "/api/chat/send"),
        ("history", "/api/chat/history/<user_id>"),
        ("tracking", "/api/track/activity"),
        ("summary", "/api/track/summary/<user_id>"),
    ]);

    Json(Health {
        status: "healthy",
        service: "browser-extension-backend",
        database,
        gemini_ai,
        endpoints,
    })
}
