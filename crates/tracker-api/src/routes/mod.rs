//! Route handlers for the tracker API.

pub mod chat;
pub mod debug;
pub mod health;
pub mod tracking;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(health::health))
        // Tracking
        .route("/api/track/activity", post(tracking::track_activity))
        .route("/api/track/summary/:user_id", get(tracking::daily_summary))
        // Chat
        .route("/api/chat/send", post(chat::send_message))
        .route("/api/chat/history/:user_id", get(chat::history))
        // Diagnostics
        .route("/api/debug/db-status", get(debug::db_status))
        .route("/api/debug/user-data/:user_id", get(debug::user_data))
}
