//! Timestamp and time-derived identifier helpers.

use chrono::{DateTime, Local};

/// Format used for the `timestamp` field.
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time as `YYYY-MM-DD HH:mm:ss`.
pub fn format_local_timestamp(now: &DateTime<Local>) -> String {
    now.format(EVENT_TIMESTAMP_FORMAT).to_string()
}

/// Session id built from epoch millis and the first six characters of the client id.
pub fn session_id(now: &DateTime<Local>, client_id: &str) -> String {
    let prefix: String = client_id.chars().take(6).collect();
    format!("sess_{}_{prefix}", now.timestamp_millis())
}
