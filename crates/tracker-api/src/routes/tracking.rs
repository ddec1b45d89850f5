//! Activity tracking and daily summary routes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use database::{DailySummary, NewActivity};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;
use crate::state::AppState;

/// Response to a recorded activity.
#[derive(Serialize)]
pub struct TrackResponse {
    pub success: bool,
    pub activity_id: String,
    pub user_id: String,
    pub session_id: String,
    pub timestamp: String,
}

/// Query parameters for the summary endpoint.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// ISO-8601 date or date-time; today (UTC) when absent.
    pub date: Option<String>,
}

/// Daily summary response.
#[derive(Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: DailySummary,
}

/// Record one browsing event.
#[instrument(name = "track_activity", skip_all)]
pub async fn track_activity(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewActivity>, JsonRejection>,
) -> Result<Json<TrackResponse>> {
    let Json(event) = payload?;

    let recorded = database::ingest::record_activity(state.db.pool(), event).await?;

    info!(
        activity_id = %recorded.activity_id,
        user_id = %recorded.user_id,
        session_id = %recorded.session_id,
        "Activity tracked"
    );

    Ok(Json(TrackResponse {
        success: true,
        activity_id: recorded.activity_id,
        user_id: recorded.user_id,
        session_id: recorded.session_id,
        timestamp: recorded.timestamp,
    }))
}

/// Summarize a user's activity for one day.
#[instrument(name = "daily_summary", skip_all, fields(user_id = %user_id))]
pub async fn daily_summary(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    query: std::result::Result<Query<SummaryQuery>, QueryRejection>,
) -> Result<Json<SummaryResponse>> {
    let Query(query) = query?;
    let summary =
        database::summary::get_daily_summary(state.db.pool(), &user_id, query.date.as_deref())
            .await?;

    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}
