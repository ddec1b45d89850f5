//! Database models.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;

/// A browser extension user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// External user identifier (supplied by the extension or generated).
    pub user_id: String,
    /// Session the user was first seen with.
    pub session_id: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Timestamp of the most recent tracked event.
    pub last_active: String,
}

/// A single recorded browsing event. Never updated once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BrowserActivity {
    /// Generated UUID.
    pub activity_id: String,
    pub user_id: String,
    pub session_id: String,
    pub url: String,
    /// Authority of `url` as written, empty when it could not be derived.
    pub domain: String,
    pub page_title: String,
    /// Open set, e.g. "page_visit", "click", "scroll".
    pub activity_type: String,
    /// Opaque payload describing the element interacted with.
    pub element_details: Json<Value>,
    pub duration_seconds: f64,
    /// Write timestamp.
    pub timestamp: String,
}

/// Running aggregate for one client-declared browsing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DailySession {
    pub session_id: String,
    pub user_id: String,
    /// Time of the first event in the session.
    pub start_time: String,
    /// Time of the most recent event in the session.
    pub end_time: String,
    pub total_pages_visited: i64,
    pub total_interactions: i64,
    pub chat_messages_count: i64,
}

/// One chat exchange: the user's message and the relay's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Generated UUID.
    pub message_id: String,
    pub user_id: String,
    /// Session the message was sent from, empty when none was given.
    pub session_id: String,
    pub message: String,
    pub response: String,
    pub timestamp: String,
}

/// The activity type counted as a page view.
pub const PAGE_VISIT: &str = "page_visit";
