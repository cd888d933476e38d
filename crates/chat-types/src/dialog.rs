use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::message::Message;
use crate::validation::not_blank;

/// Opaque backend identifier. Round-trips in whatever JSON form the server used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(n) => write!(f, "{}", n),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        ResourceId::Int(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Text(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        ResourceId::Text(s)
    }
}

/// A named, persisted conversation thread.
///
/// `messages` is only populated by `GET /dialogs/{id}`; list responses omit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialog {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

impl Dialog {
    pub fn into_messages(self) -> Vec<Message> {
        self.messages.unwrap_or_default()
    }

    /// `YYYY-MM-DD HH:MM` of `updated_at` for list display.
    pub fn updated_label(&self) -> String {
        crate::message::parse_timestamp(&self.updated_at)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| self.updated_at.clone())
    }
}

/// A file attached to a dialog as extra context for the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogFile {
    pub id: ResourceId,
    pub filename: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl DialogFile {
    /// Human-readable size in 1024-based units, e.g. `1.5 KB`.
    pub fn size_label(&self) -> String {
        const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
        if self.file_size == 0 {
            return "0 Bytes".to_string();
        }
        let mut size = self.file_size as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        let rounded = (size * 100.0).round() / 100.0;
        format!("{} {}", rounded, UNITS[unit])
    }
}

/// Body of `POST /dialogs`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDialogRequest {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
}

/// Body of `POST /chat/dialog`. A `None` dialog id asks the server to create one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogTurnRequest {
    pub message: String,
    pub dialog_id: Option<ResourceId>,
    pub conversation_history: Vec<Message>,
}

/// Authoritative history after a turn, including the user message and the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogTurnResponse {
    pub conversation_history: Vec<Message>,
    pub dialog_id: ResourceId,
}

/// `skip`/`limit` window for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Page {
    pub fn first(limit: u32) -> Self {
        Self { skip: 0, limit }
    }

    pub fn query(&self) -> String {
        format!("skip={}&limit={}", self.skip, self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(100)
    }
}
