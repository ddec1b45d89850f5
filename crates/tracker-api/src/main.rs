//! Browser activity tracker server.

use database::Database;
use gemini_relay::AiRelay;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tracker_api::{AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting tracker API");

    // Connect to database
    let db = Database::connect_with_pool_size(&config.database_url, config.pool_size).await?;
    db.migrate().await?;

    // Build the AI relay once; handlers share it
    let relay = AiRelay::from_env();
    info!(
        gemini_ai = if relay.is_available() { "configured" } else { "not_configured" },
        "AI relay ready"
    );

    let state = AppState::new(db, relay);
    let app = tracker_api::app(state, &config.cors_origins);

    // Start server
    info!(addr = %config.addr, "Tracker API listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
