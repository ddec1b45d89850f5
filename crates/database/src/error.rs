//! Database error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Input rejected before anything was written
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl DatabaseError {
    /// Whether this error was caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DatabaseError::Validation(_))
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
