//! Chat history.

use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::ChatMessage;
use crate::time::now_timestamp;
use crate::{daily_session, Result};

/// Messages returned by the history endpoint when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Upper bound on a requested history limit.
pub const MAX_HISTORY_LIMIT: i64 = 200;

/// Outcome of [`record_exchange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedChat {
    /// The stored exchange; `None` when no user was given.
    pub stored: Option<ChatMessage>,
    /// Whether the exchange was counted against an existing session.
    pub counted: bool,
}

/// Store a chat exchange and count it against its session, in one transaction.
///
/// Exchanges without a user are not stored, since history is keyed by user.
/// Sessions are never created here; an unknown or empty session is not counted.
pub async fn record_exchange(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
    message: &str,
    response: &str,
) -> Result<RecordedChat> {
    let mut tx = pool.begin().await?;

    let stored = if user_id.is_empty() {
        None
    } else {
        let chat = ChatMessage {
            message_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            message: message.to_string(),
            response: response.to_string(),
            timestamp: now_timestamp(),
        };
        insert_message(&mut *tx, &chat).await?;
        Some(chat)
    };

    let counted = if session_id.is_empty() {
        false
    } else {
        daily_session::increment_chat_messages(&mut *tx, session_id).await?
    };

    tx.commit().await?;

    Ok(RecordedChat { stored, counted })
}

/// Insert one chat exchange.
pub async fn insert_message<'e, E>(executor: E, chat: &ChatMessage) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO chat_messages (message_id, user_id, session_id, message, response, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&chat.message_id)
    .bind(&chat.user_id)
    .bind(&chat.session_id)
    .bind(&chat.message)
    .bind(&chat.response)
    .bind(&chat.timestamp)
    .execute(executor)
    .await?;

    Ok(())
}

/// The user's most recent `limit` exchanges, oldest first.
pub async fn list_recent_for_user(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<ChatMessage>> {
    let messages = sqlx::query_as::<_, ChatMessage>(
        r#"
        SELECT message_id, user_id, session_id, message, response, timestamp
        FROM (
            SELECT rowid AS seq, message_id, user_id, session_id, message, response, timestamp
            FROM chat_messages
            WHERE user_id = ?
            ORDER BY timestamp DESC, seq DESC
            LIMIT ?
        )
        ORDER BY timestamp ASC, seq ASC
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}

/// Count a user's stored exchanges.
pub async fn count_for_user(pool: &SqlitePool, user_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chat_messages WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count total stored exchanges.
pub async fn count_messages(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM chat_messages
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{record_activity, NewActivity};
    use crate::test_db;

    #[tokio::test]
    async fn test_exchange_stored_and_counted() {
        let db = test_db().await;
        record_activity(db.pool(), NewActivity::new("click").for_session("u1", "s1"))
            .await
            .unwrap();

        let recorded = record_exchange(db.pool(), "u1", "s1", "hello", "hi there")
            .await
            .unwrap();
        assert!(recorded.counted);
        let stored = recorded.stored.unwrap();
        assert_eq!(stored.message, "hello");
        assert_eq!(stored.response, "hi there");

        let history = list_recent_for_user(db.pool(), "u1", DEFAULT_HISTORY_LIMIT)
            .await
            .unwrap();
        assert_eq!(history, vec![stored]);

        let session = daily_session::get_session(db.pool(), "s1").await.unwrap().unwrap();
        assert_eq!(session.chat_messages_count, 1);
    }

    #[tokio::test]
    async fn test_exchange_without_session_or_user() {
        let db = test_db().await;

        let recorded = record_exchange(db.pool(), "u1", "ghost", "q", "a").await.unwrap();
        assert!(!recorded.counted);
        assert!(recorded.stored.is_some());
        assert_eq!(daily_session::count_sessions(db.pool()).await.unwrap(), 0);

        let recorded = record_exchange(db.pool(), "", "", "q", "a").await.unwrap();
        assert!(!recorded.counted);
        assert!(recorded.stored.is_none());
        assert_eq!(count_messages(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_history_keeps_latest_in_order() {
        let db = test_db().await;

        for i in 0..5 {
            record_exchange(db.pool(), "u1", "", &format!("m{}", i), "r")
                .await
                .unwrap();
        }
        record_exchange(db.pool(), "u2", "", "other", "r").await.unwrap();

        let history = list_recent_for_user(db.pool(), "u1", 3).await.unwrap();
        let messages: Vec<_> = history.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(messages, vec!["m2", "m3", "m4"]);

        assert_eq!(count_for_user(db.pool(), "u1").await.unwrap(), 5);
        assert_eq!(count_messages(db.pool()).await.unwrap(), 6);
    }
}
