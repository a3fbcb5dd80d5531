use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A free-text note attached to a target. Server-assigned id; the server
/// returns lists most-recent-first, so element 0 is the latest note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub target_id: String,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Parse a server timestamp (`YYYY-MM-DD HH:MM:SS`, server-local time).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Compact display form: time-of-day within the last 24 hours, otherwise
/// month/day plus time.
pub fn format_note_time(raw: &str, now: DateTime<Local>) -> String {
    let Some(ts) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    let age = now.naive_local().signed_duration_since(ts);
    if age.num_hours().abs() < 24 {
        ts.format("%-I:%M %p").to_string()
    } else {
        ts.format("%b %-d, %-I:%M %p").to_string()
    }
}
