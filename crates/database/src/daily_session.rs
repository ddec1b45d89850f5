//! Daily session aggregates.

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::DailySession;
use crate::Result;

/// Count one activity event against its session.
///
/// The first event for a session creates the row with `start_time = end_time = now`
/// and counters seeded from that event. Later events increment the counters and
/// move `end_time` forward. Done as a single upsert so concurrent events for the
/// same session cannot lose an increment or create a second row.
pub async fn record_event<'e, E>(
    executor: E,
    session_id: &str,
    user_id: &str,
    is_page_visit: bool,
    now: &str,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let page_increment: i64 = if is_page_visit { 1 } else { 0 };

    sqlx::query(
        r#"
        INSERT INTO daily_sessions (
            session_id, user_id, start_time, end_time,
            total_pages_visited, total_interactions, chat_messages_count
        )
        VALUES (?, ?, ?, ?, ?, 1, 0)
        ON CONFLICT(session_id) DO UPDATE SET
            total_pages_visited = total_pages_visited + excluded.total_pages_visited,
            total_interactions = total_interactions + 1,
            end_time = excluded.end_time
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .bind(now)
    .bind(now)
    .bind(page_increment)
    .execute(executor)
    .await?;

    Ok(())
}

/// Get a session by ID.
pub async fn get_session(pool: &SqlitePool, session_id: &str) -> Result<Option<DailySession>> {
    let session = sqlx::query_as::<_, DailySession>(
        r#"
        SELECT session_id, user_id, start_time, end_time,
               total_pages_visited, total_interactions, chat_messages_count
        FROM daily_sessions
        WHERE session_id = ?
        "#,
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// Get the user's most recently active session, regardless of day.
pub async fn latest_for_user(pool: &SqlitePool, user_id: &str) -> Result<Option<DailySession>> {
    let session = sqlx::query_as::<_, DailySession>(
        r#"
        SELECT session_id, user_id, start_time, end_time,
               total_pages_visited, total_interactions, chat_messages_count
        FROM daily_sessions
        WHERE user_id = ?
        ORDER BY end_time DESC, session_id
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// List all of a user's sessions, most recently started first.
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<DailySession>> {
    let sessions = sqlx::query_as::<_, DailySession>(
        r#"
        SELECT session_id, user_id, start_time, end_time,
               total_pages_visited, total_interactions, chat_messages_count
        FROM daily_sessions
        WHERE user_id = ?
        ORDER BY start_time DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Count one chat message against an existing session.
///
/// Returns `false` if the session does not exist; no row is created.
pub async fn increment_chat_messages<'e, E>(executor: E, session_id: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE daily_sessions
        SET chat_messages_count = chat_messages_count + 1
        WHERE session_id = ?
        "#,
    )
    .bind(session_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Count total sessions.
pub async fn count_sessions(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM daily_sessions
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
