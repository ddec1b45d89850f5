//! SQLite persistence layer for the browser activity tracker.
//!
//! This crate stores users, browsing activity, per-session aggregates and chat
//! history using SQLx with SQLite, and implements the two operations built on them:
//! [`ingest::record_activity`] and [`summary::get_daily_summary`].
//!
//! # Example
//!
//! ```no_run
//! use database::{ingest::NewActivity, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:tracker.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Record a page visit
//!     let event = NewActivity::new("page_visit")
//!         .for_session("user-1", "session-1")
//!         .with_url("https://example.com/docs");
//!     let recorded = database::ingest::record_activity(db.pool(), event).await?;
//!
//!     // Summarize today
//!     let summary =
//!         database::summary::get_daily_summary(db.pool(), &recorded.user_id, None).await?;
//!     println!("{} pages today", summary.total_pages);
//!
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod chat;
pub mod daily_session;
pub mod error;
pub mod ingest;
pub mod inspect;
pub mod models;
pub mod summary;
pub mod time;
pub mod user;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use ingest::{NewActivity, RecordedActivity};
pub use models::{BrowserActivity, ChatMessage, DailySession, User};
pub use summary::{DailySummary, SessionWindow};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/tracker.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Migrated single-connection in-memory database for tests.
#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrate_creates_tables() {
        let db = test_db().await;

        let tables = inspect::list_tables(db.pool()).await.unwrap();
        assert_eq!(
            tables,
            vec!["browser_activities", "chat_messages", "daily_sessions", "users"]
        );
        inspect::ping(db.pool()).await.unwrap();

        // Running migrations twice is a no-op.
        db.migrate().await.unwrap();
    }

    #[tokio::test]
    async fn test_user_lookup() {
        let db = test_db().await;

        user::upsert_user(db.pool(), "u1", "s1", "2026-01-01T00:00:00.000000Z")
            .await
            .unwrap();

        let fetched = user::get_user(db.pool(), "u1").await.unwrap();
        assert_eq!(fetched.session_id, "s1");
        assert_eq!(fetched.last_active, "2026-01-01T00:00:00.000000Z");

        let missing = user::get_user(db.pool(), "u2").await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
        assert!(user::find_user(db.pool(), "u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_activity_requires_known_user() {
        let db = test_db().await;

        let orphan = BrowserActivity {
            activity_id: "a1".to_string(),
            user_id: "ghost".to_string(),
            session_id: "s1".to_string(),
            url: String::new(),
            domain: String::new(),
            page_title: String::new(),
            activity_type: "click".to_string(),
            element_details: sqlx::types::Json(serde_json::json!({})),
            duration_seconds: 0.0,
            timestamp: time::now_timestamp(),
        };
        let result = activity::insert_activity(db.pool(), &orphan).await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));
    }

    #[tokio::test]
    async fn test_chat_increment_requires_session() {
        let db = test_db().await;

        assert!(!daily_session::increment_chat_messages(db.pool(), "s1").await.unwrap());
        assert_eq!(daily_session::count_sessions(db.pool()).await.unwrap(), 0);

        user::upsert_user(db.pool(), "u1", "s1", "2026-01-01T00:00:00.000000Z")
            .await
            .unwrap();
        daily_session::record_event(db.pool(), "s1", "u1", false, "2026-01-01T00:00:00.000000Z")
            .await
            .unwrap();
        assert!(daily_session::increment_chat_messages(db.pool(), "s1").await.unwrap());
        assert!(daily_session::increment_chat_messages(db.pool(), "s1").await.unwrap());

        let session = daily_session::get_session(db.pool(), "s1").await.unwrap().unwrap();
        assert_eq!(session.chat_messages_count, 2);
        assert_eq!(session.total_interactions, 1);
        assert_eq!(daily_session::list_for_user(db.pool(), "u1").await.unwrap().len(), 1);
    }
}
