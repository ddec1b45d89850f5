//! HTTP backend for the browser activity tracker extension.
//!
//! Records browsing events, serves per-user daily summaries and relays chat
//! prompts to Gemini. The binary in `main.rs` wires configuration, the database
//! and the relay into [`app`].

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError, CorsOrigins};
pub use error::{ApiError, Result};
pub use state::AppState;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete application: routes, CORS and request tracing.
pub fn app(state: AppState, cors_origins: &CorsOrigins) -> Router {
    routes::router()
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the extension's origins.
///
/// Credentials are only allowed with an explicit origin list.
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    match origins {
        CorsOrigins::Any => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any),
        CorsOrigins::List(list) => {
            let origins: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(methods)
                .allow_headers([CONTENT_TYPE, AUTHORIZATION])
                .allow_credentials(true)
        }
    }
}
