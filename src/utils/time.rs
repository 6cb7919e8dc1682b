//! Timestamp helpers.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with millisecond precision.
///
/// Millisecond precision keeps lexicographic ordering of stored
/// timestamps consistent with insertion order for pagination cursors.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fresh v4 UUID string id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
