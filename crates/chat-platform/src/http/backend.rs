use async_trait::async_trait;

use chat_core::ports::{AssistantPort, DialogPort};
use chat_types::{
    Result,
    assistant::{AssistantDraft, AssistantProfile, DialogSettings, ModelInfo},
    config::ClientConfig,
    dialog::{
        CreateDialogRequest, Dialog, DialogFile, DialogTurnRequest, DialogTurnResponse, Page,
        ResourceId,
    },
};

use super::paths;
use super::transport::{Method, Transport};

/// REST backend reached through the browser's `fetch()`.
/// Implements both ports so one instance can be shared by the session
/// manager and the assistant directory.
pub struct HttpBackend {
    transport: Transport,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        log::info!("Using chat API at {}", config.api_base);
        Self { transport: Transport::new(config) }
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }
}

#[async_trait(?Send)]
impl DialogPort for HttpBackend {
    async fn list_dialogs(&self, page: Page) -> Result<Vec<Dialog>> {
        self.transport.get(&paths::dialog_list(page)).await
    }

    async fn get_dialog(&self, id: &ResourceId) -> Result<Dialog> {
        self.transport.get(&paths::dialog(id)).await
    }

    async fn create_dialog(&self, title: &str) -> Result<Dialog> {
        let body = CreateDialogRequest { title: title.to_string() };
        self.transport
            .send_json(Method::Post, paths::DIALOGS, &body)
            .await
    }

    async fn delete_dialog(&self, id: &ResourceId) -> Result<()> {
        self.transport.delete(&paths::dialog(id)).await
    }

    async fn send_message(&self, req: DialogTurnRequest) -> Result<DialogTurnResponse> {
        self.transport
            .send_json(Method::Post, paths::DIALOG_TURN, &req)
            .await
    }

    async fn get_dialog_settings(&self, id: &ResourceId) -> Result<DialogSettings> {
        self.transport.get(&paths::dialog_settings(id)).await
    }

    async fn update_dialog_settings(
        &self,
        id: &ResourceId,
        settings: &DialogSettings,
    ) -> Result<DialogSettings> {
        self.transport
            .send_json(Method::Put, &paths::dialog_settings(id), settings)
            .await
    }

    async fn create_dialog_settings(
        &self,
        id: &ResourceId,
        settings: &DialogSettings,
    ) -> Result<DialogSettings> {
        self.transport
            .send_json(Method::Post, &paths::dialog_settings(id), settings)
            .await
    }

    async fn list_dialog_files(&self, id: &ResourceId) -> Result<Vec<DialogFile>> {
        self.transport.get(&paths::dialog_files(id)).await
    }

    async fn upload_dialog_file(
        &self,
        id: &ResourceId,
        filename: &str,
        bytes: &[u8],
    ) -> Result<DialogFile> {
        log::info!("Uploading {} ({} bytes) to dialog {}", filename, bytes.len(), id);
        self.transport
            .upload(&paths::dialog_files(id), filename, bytes)
            .await
    }

    async fn delete_dialog_file(&self, id: &ResourceId, file_id: &ResourceId) -> Result<()> {
        self.transport.delete(&paths::dialog_file(id, file_id)).await
    }
}

#[async_trait(?Send)]
impl AssistantPort for HttpBackend {
    async fn list_assistants(&self, page: Page) -> Result<Vec<AssistantProfile>> {
        self.transport.get(&paths::assistant_list(page)).await
    }

    async fn create_assistant(&self, draft: &AssistantDraft) -> Result<AssistantProfile> {
        self.transport
            .send_json(Method::Post, paths::ASSISTANTS, draft)
            .await
    }

    async fn update_assistant(
        &self,
        id: &ResourceId,
        draft: &AssistantDraft,
    ) -> Result<AssistantProfile> {
        self.transport
            .send_json(Method::Put, &paths::assistant(id), draft)
            .await
    }

    async fn delete_assistant(&self, id: &ResourceId) -> Result<()> {
        self.transport.delete(&paths::assistant(id)).await
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.transport.get(paths::MODELS).await
    }
}
