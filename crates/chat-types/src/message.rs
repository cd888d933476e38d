use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Only ever received from the backend; the client never creates one.
    System,
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &str {
        match self {
            Role::System => "System",
            Role::User => "You",
            Role::Assistant => "AI",
        }
    }
}

/// A single transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// RFC 3339. Server history may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::stamped(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::stamped(Role::Assistant, text)
    }

    fn stamped(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            content: text.into(),
            timestamp: Some(Utc::now().to_rfc3339()),
        }
    }

    /// Local `HH:MM` of the timestamp, or an empty string when absent or unparsable.
    pub fn time_label(&self) -> String {
        self.timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

/// Parse a backend timestamp into the user's local time.
///
/// Accepts RFC 3339 and the offset-less ISO form the backend emits for naive
/// datetimes, which are UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}
