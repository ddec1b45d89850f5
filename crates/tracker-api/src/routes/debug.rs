//! Diagnostics routes for inspecting stored data.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{activity, chat, daily_session, inspect, user, BrowserActivity, DailySession, User};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Latest activities shown in the status report.
const LATEST_ACTIVITIES: i64 = 5;

/// Activities listed per user.
const USER_ACTIVITY_LIMIT: i64 = 50;

/// URLs in the status report are cut to this many characters.
const URL_PREVIEW_CHARS: usize = 50;

#[derive(Serialize)]
pub struct Counts {
    pub users: i64,
    pub activities: i64,
    pub sessions: i64,
    pub chat_messages: i64,
}

#[derive(Serialize)]
pub struct ActivityPreview {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub url: String,
    pub timestamp: String,
}

impl From<BrowserActivity> for ActivityPreview {
    fn from(activity: BrowserActivity) -> Self {
        Self {
            id: activity.activity_id,
            user_id: activity.user_id,
            activity_type: activity.activity_type,
            url: activity.url.chars().take(URL_PREVIEW_CHARS).collect(),
            timestamp: activity.timestamp,
        }
    }
}

#[derive(Serialize)]
pub struct DbStatus {
    pub success: bool,
    pub database_status: &'static str,
    pub tables: Vec<String>,
    pub counts: Counts,
    pub latest_activities: Vec<ActivityPreview>,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct UserData {
    pub success: bool,
    pub user: User,
    pub activities_count: i64,
    pub sessions_count: usize,
    pub activities: Vec<BrowserActivity>,
    pub sessions: Vec<DailySession>,
}

/// Table names, row counts and the most recent activities.
pub async fn db_status(State(state): State<AppState>) -> Result<Json<DbStatus>> {
    let pool = state.db.pool();

    let tables = inspect::list_tables(pool).await?;
    let counts = Counts {
        users: user::count_users(pool).await?,
        activities: activity::count_activities(pool).await?,
        sessions: daily_session::count_sessions(pool).await?,
        chat_messages: chat::count_messages(pool).await?,
    };
    let latest_activities = activity::list_latest(pool, LATEST_ACTIVITIES)
        .await?
        .into_iter()
        .map(ActivityPreview::from)
        .collect();

    Ok(Json(DbStatus {
        success: true,
        database_status: "connected",
        tables,
        counts,
        latest_activities,
        timestamp: database::time::now_timestamp(),
    }))
}

/// Everything stored for one user.
pub async fn user_data(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response> {
    let pool = state.db.pool();

    let Some(user) = user::find_user(pool, &user_id).await? else {
        let body = serde_json::json!({
            "success": false,
            "error": format!("User {} not found", user_id),
            "user_exists": false,
        });
        return Ok((StatusCode::NOT_FOUND, Json(body)).into_response());
    };

    let activities_count = activity::count_for_user(pool, &user_id).await?;
    let activities = activity::list_recent_for_user(pool, &user_id, USER_ACTIVITY_LIMIT).await?;
    let sessions = daily_session::list_for_user(pool, &user_id).await?;

    Ok(Json(UserData {
        success: true,
        user,
        activities_count,
        sessions_count: sessions.len(),
        activities,
        sessions,
    })
    .into_response())
}
