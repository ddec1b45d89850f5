//! User persistence.

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Create a user on first sight, or refresh `last_active` for a known one.
///
/// The session and creation time of an existing user are left untouched.
pub async fn upsert_user<'e, E>(
    executor: E,
    user_id: &str,
    session_id: &str,
    now: &str,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO users (user_id, session_id, created_at, last_active)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            last_active = excluded.last_active
        "#,
    )
    .bind(user_id)
    .bind(session_id)
    .bind(now)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<User> {
    find_user(pool, user_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "User",
            id: user_id.to_string(),
        })
}

/// Look up a user by ID, returning `None` if unknown.
pub async fn find_user(pool: &SqlitePool, user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT user_id, session_id, created_at, last_active
        FROM users
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
