//! Daily summary aggregation.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::models::{BrowserActivity, DailySession, PAGE_VISIT};
use crate::time::format_timestamp;
use crate::validation::ValidationError;
use crate::{activity, daily_session, Result};

/// Naive date-time layouts accepted for the target date, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Rollup of one user's activity over one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    /// Target day, `YYYY-MM-DD`.
    pub date: String,
    pub total_pages: i64,
    pub total_interactions: i64,
    pub unique_domains: i64,
    pub domains_visited: BTreeMap<String, i64>,
    pub activity_breakdown: BTreeMap<String, i64>,
    /// Session window of the user's most recent session, on any day.
    pub daily_session: Option<SessionWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionWindow {
    pub start_time: String,
    pub end_time: String,
    pub chat_messages: i64,
}

impl From<&DailySession> for SessionWindow {
    fn from(session: &DailySession) -> Self {
        Self {
            start_time: session.start_time.clone(),
            end_time: session.end_time.clone(),
            chat_messages: session.chat_messages_count,
        }
    }
}

/// A calendar day in some fixed offset, as a half-open UTC interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    /// The day containing `at`, in `at`'s own offset.
    pub fn containing(at: DateTime<FixedOffset>) -> Self {
        let day = at.date_naive();
        let offset = Duration::seconds(i64::from(at.offset().local_minus_utc()));
        let start = day.and_time(NaiveTime::MIN).and_utc() - offset;

        Self {
            day,
            start,
            end: start + Duration::days(1),
        }
    }
}

/// Parse the requested day, defaulting to `now` when absent or blank.
///
/// Accepts RFC 3339 date-times (the offset is kept), naive date-times and plain
/// `YYYY-MM-DD` dates (both taken as UTC).
pub fn parse_target_date(
    input: Option<&str>,
    now: DateTime<Utc>,
) -> std::result::Result<DateTime<FixedOffset>, ValidationError> {
    let input = match input.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(now.fixed_offset()),
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Ok(at);
    }

    if let Ok(at) = DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(at);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        .map_err(|err| {
            ValidationError::InvalidDate(format!(
                "'{}' is not an ISO-8601 date or date-time ({})",
                input, err
            ))
        })
}

/// Aggregate activities that already fall inside one day.
pub fn summarize(
    day: NaiveDate,
    activities: &[BrowserActivity],
    session: Option<&DailySession>,
) -> DailySummary {
    let mut domains_visited = BTreeMap::new();
    let mut activity_breakdown = BTreeMap::new();
    let mut total_pages = 0;

    for activity in activities {
        if !activity.domain.is_empty() {
            *domains_visited.entry(activity.domain.clone()).or_insert(0) += 1;
        }
        *activity_breakdown
            .entry(activity.activity_type.clone())
            .or_insert(0) += 1;
        if activity.activity_type == PAGE_VISIT {
            total_pages += 1;
        }
    }

    DailySummary {
        date: day.format("%Y-%m-%d").to_string(),
        total_pages,
        total_interactions: activities.len() as i64,
        unique_domains: domains_visited.len() as i64,
        domains_visited,
        activity_breakdown,
        daily_session: session.map(SessionWindow::from),
    }
}

/// Build the summary of `user_id`'s activity on the requested day.
pub async fn get_daily_summary(
    pool: &SqlitePool,
    user_id: &str,
    date: Option<&str>,
) -> Result<DailySummary> {
    let target = parse_target_date(date, Utc::now())?;
    let window = DayWindow::containing(target);

    let activities = activity::list_between(
        pool,
        user_id,
        &format_timestamp(window.start),
        &format_timestamp(window.end),
    )
    .await?;
    let session = daily_session::latest_for_user(pool, user_id).await?;

    tracing::debug!(
        user_id,
        day = %window.day,
        activities = activities.len(),
        "Built daily summary"
    );

    Ok(summarize(window.day, &activities, session.as_ref()))
}
