//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `chat-core` (pure Rust).
//! The HTTP implementation lives in `chat-platform`.
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use chat_types::{
    Result,
    assistant::{AssistantDraft, AssistantProfile, DialogSettings, ModelInfo},
    dialog::{Dialog, DialogFile, DialogTurnRequest, DialogTurnResponse, Page, ResourceId},
};

// ─── Dialog Port ─────────────────────────────────────────────

#[async_trait(?Send)]
pub trait DialogPort {
    /// Dialog list without messages
    async fn list_dialogs(&self, page: Page) -> Result<Vec<Dialog>>;

    /// A single dialog including its messages
    async fn get_dialog(&self, id: &ResourceId) -> Result<Dialog>;

    async fn create_dialog(&self, title: &str) -> Result<Dialog>;

    async fn delete_dialog(&self, id: &ResourceId) -> Result<()>;

    /// Continue (or, with no dialog id, start) a conversation
    async fn send_message(&self, req: DialogTurnRequest) -> Result<DialogTurnResponse>;

    async fn get_dialog_settings(&self, id: &ResourceId) -> Result<DialogSettings>;

    /// Replace the settings record; 404 when the dialog has none yet
    async fn update_dialog_settings(
        &self,
        id: &ResourceId,
        settings: &DialogSettings,
    ) -> Result<DialogSettings>;

    async fn create_dialog_settings(
        &self,
        id: &ResourceId,
        settings: &DialogSettings,
    ) -> Result<DialogSettings>;

    async fn list_dialog_files(&self, id: &ResourceId) -> Result<Vec<DialogFile>>;

    async fn upload_dialog_file(
        &self,
        id: &ResourceId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<DialogFile>;

    async fn delete_dialog_file(&self, id: &ResourceId, file_id: &ResourceId) -> Result<()>;
}

// ─── Assistant Port ──────────────────────────────────────────

#[async_trait(?Send)]
pub trait AssistantPort {
    async fn list_assistants(&self, page: Page) -> Result<Vec<AssistantProfile>>;

    async fn create_assistant(&self, draft: &AssistantDraft) -> Result<AssistantProfile>;

    async fn update_assistant(
        &self,
        id: &ResourceId,
        draft: &AssistantDraft,
    ) -> Result<AssistantProfile>;

    async fn delete_assistant(&self, id: &ResourceId) -> Result<()>;

    /// Models the backend can route to
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}
