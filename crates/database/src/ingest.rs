//! Activity ingestion.
//!
//! Records one browsing event: upserts the owning user, appends the activity
//! row and counts the event against its session, all in one transaction.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::models::{BrowserActivity, PAGE_VISIT};
use crate::time::format_timestamp;
use crate::validation::{validate_activity_type, validate_duration};
use crate::{activity, daily_session, user, Result};

/// An activity event as reported by the extension.
///
/// Only `activity_type` is required; everything else has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewActivity {
    pub activity_type: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub url: Option<String>,
    pub page_title: Option<String>,
    pub element_details: Option<Value>,
    pub duration_seconds: Option<f64>,
}

impl NewActivity {
    /// Create an event of the given type with every optional field absent.
    pub fn new(activity_type: impl Into<String>) -> Self {
        Self {
            activity_type: Some(activity_type.into()),
            ..Self::default()
        }
    }

    /// Set the user and session the event belongs to.
    pub fn for_session(
        mut self,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        self.user_id = Some(user_id.into());
        self.session_id = Some(session_id.into());
        self
    }

    /// Set the page URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Outcome of a successfully recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedActivity {
    pub activity_id: String,
    /// Supplied or generated user ID.
    pub user_id: String,
    /// Supplied or generated session ID.
    pub session_id: String,
    /// Write timestamp shared by the activity row and the session update.
    pub timestamp: String,
}

/// Record one activity event.
///
/// Validation happens before anything touches the database. Any failure after
/// that rolls back the whole transaction, so either every row is written or none.
pub async fn record_activity(pool: &SqlitePool, new: NewActivity) -> Result<RecordedActivity> {
    let activity_type = validate_activity_type(new.activity_type.as_deref())?;
    let duration_seconds = validate_duration(new.duration_seconds)?;

    let user_id = non_empty_or_generated(new.user_id);
    let session_id = non_empty_or_generated(new.session_id);
    let url = new.url.unwrap_or_default();
    let domain = extract_domain(&url);
    let now = format_timestamp(Utc::now());
    let is_page_visit = activity_type == PAGE_VISIT;

    let activity = BrowserActivity {
        activity_id: Uuid::new_v4().to_string(),
        user_id,
        session_id,
        url,
        domain,
        page_title: new.page_title.unwrap_or_default(),
        activity_type,
        element_details: Json(
            new.element_details
                .unwrap_or_else(|| Value::Object(Default::default())),
        ),
        duration_seconds,
        timestamp: now.clone(),
    };

    let mut tx = pool.begin().await?;

    user::upsert_user(&mut *tx, &activity.user_id, &activity.session_id, &now).await?;
    activity::insert_activity(&mut *tx, &activity).await?;
    daily_session::record_event(
        &mut *tx,
        &activity.session_id,
        &activity.user_id,
        is_page_visit,
        &now,
    )
    .await?;

    tx.commit().await?;

    debug!(
        activity_id = %activity.activity_id,
        user_id = %activity.user_id,
        session_id = %activity.session_id,
        activity_type = %activity.activity_type,
        "Recorded activity"
    );

    Ok(RecordedActivity {
        activity_id: activity.activity_id,
        user_id: activity.user_id,
        session_id: activity.session_id,
        timestamp: now,
    })
}

/// Derive the network location of a URL: its authority exactly as written.
///
/// Case, userinfo, ports and non-ASCII hosts are kept verbatim so that the
/// same site always maps to the same key. Protocol-relative URLs (`//host/x`)
/// have an authority; relative paths, opaque URLs like `mailto:` and strings
/// that do not parse as URLs yield an empty string.
pub fn extract_domain(url: &str) -> String {
    let url = url.trim();
    let Some(authority) = raw_authority(url) else {
        return String::new();
    };

    let parsed = if url.starts_with("//") {
        Url::parse(&format!("http:{}", url))
    } else {
        Url::parse(url)
    };

    match parsed {
        Ok(_) => authority.to_string(),
        Err(err) => {
            debug!(url, error = %err, "Could not derive domain from URL");
            String::new()
        }
    }
}

/// The text between `scheme://` (or a leading `//`) and the first `/`, `?` or `#`.
fn raw_authority(url: &str) -> Option<&str> {
    let rest = match url.strip_prefix("//") {
        Some(rest) => rest,
        None => {
            let (scheme, rest) = url.split_once(':')?;
            if !is_scheme(scheme) {
                return None;
            }
            rest.strip_prefix("//")?
        }
    };

    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    Some(&rest[..end]).filter(|authority| !authority.is_empty())
}

fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn non_empty_or_generated(id: Option<String>) -> String {
    id.filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
