//! Application state shared across handlers.

use std::sync::Arc;

use database::Database;
use gemini_relay::AiRelay;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// AI relay, built once at startup.
    pub relay: Arc<AiRelay>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, relay: AiRelay) -> Self {
        Self {
            db,
            relay: Arc::new(relay),
        }
    }
}
