//! Read-only schema inspection used by the diagnostics endpoints.

use sqlx::SqlitePool;

use crate::Result;

/// List application tables, excluding SQLite and migration bookkeeping.
pub async fn list_tables(pool: &SqlitePool) -> Result<Vec<String>> {
    let tables = sqlx::query_scalar::<_, String>(
        r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
          AND name NOT LIKE 'sqlite_%'
          AND name NOT LIKE '_sqlx_%'
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(tables)
}

/// Run a trivial query to confirm the store is reachable.
pub async fn ping(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
