//! Assistant profiles and per-dialog settings for the settings surface.
//!
//! Every successful profile mutation publishes `AssistantsChanged` on the
//! shared bus; session managers observing the bus reload their cached list.
//! Writes to a dialog's settings or files publish `DialogSettingsChanged` and
//! `DialogFilesChanged` for whoever shows them.

use std::rc::Rc;

use chat_types::{
    ChatError, Result,
    assistant::{AssistantDraft, AssistantProfile, DialogSettings, ModelInfo},
    dialog::{DialogFile, Page, ResourceId},
    event::{Notice, SessionEvent},
};

use crate::event_bus::EventBus;
use crate::ports::{AssistantPort, DialogPort};

/// Update a dialog's settings, or create them when the dialog has none yet.
pub(crate) async fn upsert_settings(
    dialogs: &dyn DialogPort,
    dialog_id: &ResourceId,
    settings: &DialogSettings,
) -> Result<DialogSettings> {
    match dialogs.update_dialog_settings(dialog_id, settings).await {
        Err(ChatError::Server { status: 404, .. }) => {
            log::info!("Dialog {} has no settings yet; creating them", dialog_id);
            dialogs.create_dialog_settings(dialog_id, settings).await
        }
        other => other,
    }
}

#[derive(Clone)]
pub struct AssistantDirectory {
    assistants: Rc<dyn AssistantPort>,
    dialogs: Rc<dyn DialogPort>,
    events: EventBus,
    page: Page,
}

impl AssistantDirectory {
    pub fn new(
        assistants: Rc<dyn AssistantPort>,
        dialogs: Rc<dyn DialogPort>,
        events: EventBus,
        page_size: u32,
    ) -> Self {
        Self {
            assistants,
            dialogs,
            events,
            page: Page::first(page_size),
        }
    }

    pub async fn list(&self) -> Result<Vec<AssistantProfile>> {
        self.assistants.list_assistants(self.page).await
    }

    pub async fn models(&self) -> Result<Vec<ModelInfo>> {
        self.assistants.list_models().await
    }

    pub async fn dialog_settings(&self, dialog_id: &ResourceId) -> Result<DialogSettings> {
        self.dialogs.get_dialog_settings(dialog_id).await
    }

    pub async fn create(&self, draft: &AssistantDraft) -> Result<AssistantProfile> {
        self.check(draft)?;
        let result = self.assistants.create_assistant(draft).await;
        self.report(result, "Assistant created", "Failed to create assistant")
    }

    pub async fn update(&self, id: &ResourceId, draft: &AssistantDraft) -> Result<AssistantProfile> {
        self.check(draft)?;
        let result = self.assistants.update_assistant(id, draft).await;
        self.report(result, "Assistant updated", "Failed to update assistant")
    }

    pub async fn delete(&self, id: &ResourceId) -> Result<()> {
        let result = self.assistants.delete_assistant(id).await;
        self.report(result, "Assistant deleted", "Failed to delete assistant")
    }

    // ─── Dialog settings ─────────────────────────────────────

    /// Write a dialog's settings, creating the record if the dialog has none.
    pub async fn save_dialog_settings(
        &self,
        dialog_id: &ResourceId,
        settings: DialogSettings,
    ) -> Result<DialogSettings> {
        let settings = settings.normalized();
        if let Err(e) = chat_types::validate(&settings) {
            log::warn!("Settings of dialog {} rejected: {}", dialog_id, e);
            self.events.notify(Notice::warning(e.to_string()));
            return Err(e);
        }

        match upsert_settings(self.dialogs.as_ref(), dialog_id, &settings).await {
            Ok(saved) => {
                log::info!("Saved settings of dialog {}", dialog_id);
                self.events.emit(SessionEvent::DialogSettingsChanged {
                    dialog_id: dialog_id.clone(),
                });
                self.events.notify(Notice::success("Dialog settings saved"));
                Ok(saved)
            }
            Err(e) => {
                log::error!("Failed to save settings of dialog {}: {}", dialog_id, e);
                self.events.notify(Notice::error(format!("Failed to save dialog settings: {}", e)));
                Err(e)
            }
        }
    }

    // ─── Dialog files ────────────────────────────────────────

    pub async fn dialog_files(&self, dialog_id: &ResourceId) -> Result<Vec<DialogFile>> {
        self.dialogs.list_dialog_files(dialog_id).await
    }

    pub async fn upload_dialog_file(
        &self,
        dialog_id: &ResourceId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<DialogFile> {
        let result = self.dialogs.upload_dialog_file(dialog_id, filename, bytes).await;
        self.report_files(dialog_id, result, "File uploaded", "Failed to upload file")
    }

    pub async fn delete_dialog_file(&self, dialog_id: &ResourceId, file_id: &ResourceId) -> Result<()> {
        let result = self.dialogs.delete_dialog_file(dialog_id, file_id).await;
        self.report_files(dialog_id, result, "File deleted", "Failed to delete file")
    }

    fn check(&self, draft: &AssistantDraft) -> Result<()> {
        chat_types::validate(draft).map_err(|e| {
            log::warn!("Assistant draft rejected: {}", e);
            self.events.notify(Notice::warning(e.to_string()));
            e
        })
    }

    fn report<T>(&self, result: Result<T>, ok_text: &str, err_text: &str) -> Result<T> {
        match result {
            Ok(v) => {
                log::info!("{}", ok_text);
                self.events.emit(SessionEvent::AssistantsChanged);
                self.events.notify(Notice::success(ok_text));
                Ok(v)
            }
            Err(e) => {
                log::error!("{}: {}", err_text, e);
                self.events.notify(Notice::error(format!("{}: {}", err_text, e)));
                Err(e)
            }
        }
    }

    fn report_files<T>(
        &self,
        dialog_id: &ResourceId,
        result: Result<T>,
        ok_text: &str,
        err_text: &str,
    ) -> Result<T> {
        match result {
            Ok(v) => {
                log::info!("{} (dialog {})", ok_text, dialog_id);
                self.events.emit(SessionEvent::DialogFilesChanged {
                    dialog_id: dialog_id.clone(),
                });
                self.events.notify(Notice::success(ok_text));
                Ok(v)
            }
            Err(e) => {
                log::error!("{} (dialog {}): {}", err_text, dialog_id, e);
                self.events.notify(Notice::error(format!("{}: {}", err_text, e)));
                Err(e)
            }
        }
    }
}
