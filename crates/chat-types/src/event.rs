use serde::{Deserialize, Serialize};

use crate::dialog::ResourceId;

/// Events emitted by the session manager and the assistant directory.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// The transcript of the active dialog was replaced or appended to
    TranscriptChanged,

    /// The cached dialog list changed (load, create, delete)
    DialogsChanged,

    /// A different dialog became active; `None` is the unsaved new dialog
    ActiveDialogChanged { dialog_id: Option<ResourceId> },

    /// Assistant profiles were created, edited or deleted somewhere;
    /// holders of a cached list should reload
    AssistantsChanged,

    /// The cached assistant list was reloaded
    AssistantsLoaded,

    /// The local assistant selection changed
    AssistantSelected { assistant_id: Option<ResourceId> },

    /// The settings record of a dialog was written
    DialogSettingsChanged { dialog_id: ResourceId },

    /// A file was attached to or removed from a dialog
    DialogFilesChanged { dialog_id: ResourceId },

    /// A send entered the pending phase
    SendStarted,

    /// The pending send resolved, successfully or not
    SendFinished { success: bool },

    /// Transient user-visible notification
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            level,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }
}
