//! Timestamp formatting shared by every table.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with microsecond
//! precision, so comparing the stored text orders rows chronologically.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC instant for storage.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The current time, formatted for storage.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
