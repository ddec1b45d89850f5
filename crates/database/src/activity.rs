//! Browser activity persistence.
//!
//! Activities are append-only: there is no update or delete here.

use sqlx::{Executor, Sqlite, SqlitePool};

use crate::models::BrowserActivity;
use crate::Result;

/// Insert a new activity row.
pub async fn insert_activity<'e, E>(executor: E, activity: &BrowserActivity) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO browser_activities (
            activity_id, user_id, session_id, url, domain, page_title,
            activity_type, element_details, duration_seconds, timestamp
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&activity.activity_id)
    .bind(&activity.user_id)
    .bind(&activity.session_id)
    .bind(&activity.url)
    .bind(&activity.domain)
    .bind(&activity.page_title)
    .bind(&activity.activity_type)
    .bind(&activity.element_details)
    .bind(activity.duration_seconds)
    .bind(&activity.timestamp)
    .execute(executor)
    .await?;

    Ok(())
}

/// List a user's activities with `start <= timestamp < end`, oldest first.
pub async fn list_between(
    pool: &SqlitePool,
    user_id: &str,
    start: &str,
    end: &str,
) -> Result<Vec<BrowserActivity>> {
    let rows = sqlx::query_as::<_, BrowserActivity>(
        r#"
        SELECT activity_id, user_id, session_id, url, domain, page_title,
               activity_type, element_details, duration_seconds, timestamp
        FROM browser_activities
        WHERE user_id = ? AND timestamp >= ? AND timestamp < ?
        ORDER BY timestamp
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List a user's most recent activities, newest first.
pub async fn list_recent_for_user(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<BrowserActivity>> {
    let rows = sqlx::query_as::<_, BrowserActivity>(
        r#"
        SELECT activity_id, user_id, session_id, url, domain, page_title,
               activity_type, element_details, duration_seconds, timestamp
        FROM browser_activities
        WHERE user_id = ?
        ORDER BY timestamp DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List the most recent activities across all users, newest first.
pub async fn list_latest(pool: &SqlitePool, limit: i64) -> Result<Vec<BrowserActivity>> {
    let rows = sqlx::query_as::<_, BrowserActivity>(
        r#"
        SELECT activity_id, user_id, session_id, url, domain, page_title,
               activity_type, element_details, duration_seconds, timestamp
        FROM browser_activities
        ORDER BY timestamp DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count a user's activities.
pub async fn count_for_user(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM browser_activities WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count total activities.
pub async fn count_activities(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM browser_activities
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
