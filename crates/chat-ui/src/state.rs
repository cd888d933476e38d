//! UI-level state that drives rendering.
//!
//! Session data (transcript, dialogs, assistants) is read from a snapshot each
//! frame; this struct only holds what belongs to the screen itself: input
//! buffers, panel toggles, the status line and on-screen notices, plus the
//! settings and files of the active dialog as last fetched.

use egui_commonmark::CommonMarkCache;

use chat_types::{
    assistant::{AssistantDraft, AssistantProfile, DialogSettings, ModelInfo},
    dialog::{DialogFile, ResourceId},
    event::{Notice, NoticeLevel, SessionEvent},
};

/// Seconds a notice stays on screen.
pub const NOTICE_TTL_SECS: f64 = 4.0;
/// Errors linger longer so they can be read.
pub const ERROR_NOTICE_TTL_SECS: f64 = 8.0;

/// User intent reported by panels. The app turns each into a session or
/// directory call.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Send(String),
    SelectDialog(ResourceId),
    DeleteDialog(ResourceId),
    CreateDialog(String),
    StartNewDialog,
    RefreshDialogs,
    SelectAssistant(Option<ResourceId>),
    SaveAssistant { id: Option<ResourceId>, draft: AssistantDraft },
    DeleteAssistant(ResourceId),
    LoadModels,
    LoadDialogSettings(ResourceId),
    SaveDialogSettings { dialog_id: ResourceId, settings: DialogSettings },
    LoadDialogFiles(ResourceId),
    UploadDialogFile { dialog_id: ResourceId, filename: String, bytes: Vec<u8> },
    DeleteDialogFile { dialog_id: ResourceId, file_id: ResourceId },
}

/// A notice plus the time (egui seconds) it was first shown.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownNotice {
    pub notice: Notice,
    pub shown_at: f64,
}

impl ShownNotice {
    pub fn ttl(&self) -> f64 {
        match self.notice.level {
            NoticeLevel::Error => ERROR_NOTICE_TTL_SECS,
            _ => NOTICE_TTL_SECS,
        }
    }

    pub fn expired(&self, now: f64) -> bool {
        now - self.shown_at >= self.ttl()
    }
}

/// Create/edit form for an assistant profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssistantForm {
    /// `None` while composing a new profile
    pub editing: Option<ResourceId>,
    pub draft: AssistantDraft,
}

impl AssistantForm {
    pub fn edit(&mut self, profile: &AssistantProfile) {
        self.editing = Some(profile.id.clone());
        self.draft = AssistantDraft::from(profile);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_editing(&self, id: &ResourceId) -> bool {
        self.editing.as_ref() == Some(id)
    }

    pub fn submit(&self) -> UiAction {
        UiAction::SaveAssistant {
            id: self.editing.clone(),
            draft: self.draft.clone(),
        }
    }
}

/// Editable copy of a dialog's settings. Blank fields and a zero token
/// limit mean "backend default".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialogSettingsForm {
    pub system_prompt: String,
    pub model: String,
    pub temperature: String,
    pub max_tokens: u32,
}

impl DialogSettingsForm {
    pub fn load(&mut self, settings: &DialogSettings) {
        self.system_prompt = settings.system_prompt.clone().unwrap_or_default();
        self.model = settings.model.clone().unwrap_or_default();
        self.temperature = settings.temperature.clone().unwrap_or_default();
        self.max_tokens = settings.max_tokens.unwrap_or(0);
    }

    pub fn to_settings(&self) -> DialogSettings {
        DialogSettings {
            system_prompt: Some(self.system_prompt.clone()),
            model: Some(self.model.clone()),
            temperature: Some(self.temperature.trim().to_string()),
            max_tokens: (self.max_tokens > 0).then_some(self.max_tokens),
        }
        .normalized()
    }

    pub fn submit(&self, dialog_id: &ResourceId) -> UiAction {
        UiAction::SaveDialogSettings {
            dialog_id: dialog_id.clone(),
            settings: self.to_settings(),
        }
    }
}

/// State visible to UI panels
pub struct UiState {
    /// Message composer content
    pub input_text: String,
    /// Title typed into the "new dialog" field
    pub new_dialog_title: String,
    pub show_dialogs: bool,
    pub show_assistants: bool,
    pub status_text: String,
    pub notices: Vec<ShownNotice>,
    pub assistant_form: AssistantForm,
    pub models: Vec<ModelInfo>,
    /// Settings of the active dialog as last fetched, tagged with that dialog
    pub dialog_settings: Option<(ResourceId, DialogSettings)>,
    pub settings_form: DialogSettingsForm,
    pub dialog_files: Option<(ResourceId, Vec<DialogFile>)>,
    /// Parsed Markdown of rendered replies
    pub markdown: CommonMarkCache,
    /// Dialog on screen, as last announced on the bus
    active_dialog_id: Option<ResourceId>,
    sending: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            new_dialog_title: String::new(),
            show_dialogs: true,
            show_assistants: false,
            status_text: "Ready".to_string(),
            notices: Vec::new(),
            assistant_form: AssistantForm::default(),
            models: Vec::new(),
            dialog_settings: None,
            settings_form: DialogSettingsForm::default(),
            dialog_files: None,
            markdown: CommonMarkCache::default(),
            active_dialog_id: None,
            sending: false,
        }
    }

    pub fn active_dialog_id(&self) -> Option<&ResourceId> {
        self.active_dialog_id.as_ref()
    }

    /// Fold drained bus events into screen state. `now` is the egui clock.
    ///
    /// Returns the fetches the events call for: settings and files of a newly
    /// active dialog, or of the active dialog after they were written.
    pub fn process_events(&mut self, events: &[SessionEvent], now: f64) -> Vec<UiAction> {
        let mut follow_ups = Vec::new();
        for event in events {
            match event {
                SessionEvent::SendStarted => {
                    self.sending = true;
                    self.status_text = "Waiting for reply...".to_string();
                }
                SessionEvent::SendFinished { success } => {
                    self.sending = false;
                    self.status_text = if *success {
                        "Ready".to_string()
                    } else {
                        "Last message failed".to_string()
                    };
                }
                SessionEvent::ActiveDialogChanged { dialog_id } => {
                    if self.active_dialog_id != *dialog_id {
                        self.dialog_settings = None;
                        self.dialog_files = None;
                        self.settings_form = DialogSettingsForm::default();
                    }
                    self.active_dialog_id = dialog_id.clone();
                    if let Some(id) = dialog_id {
                        follow_ups.push(UiAction::LoadDialogSettings(id.clone()));
                        follow_ups.push(UiAction::LoadDialogFiles(id.clone()));
                    }
                }
                SessionEvent::DialogSettingsChanged { dialog_id } => {
                    if self.is_active(dialog_id) {
                        follow_ups.push(UiAction::LoadDialogSettings(dialog_id.clone()));
                    }
                }
                SessionEvent::DialogFilesChanged { dialog_id } => {
                    if self.is_active(dialog_id) {
                        follow_ups.push(UiAction::LoadDialogFiles(dialog_id.clone()));
                    }
                }
                SessionEvent::Notice(notice) => self.push_notice(notice.clone(), now),
                SessionEvent::AssistantsChanged => self.assistant_form.reset(),
                SessionEvent::TranscriptChanged
                | SessionEvent::DialogsChanged
                | SessionEvent::AssistantsLoaded
                | SessionEvent::AssistantSelected { .. } => {}
            }
        }
        let mut unique: Vec<UiAction> = Vec::with_capacity(follow_ups.len());
        for action in follow_ups {
            if !unique.contains(&action) {
                unique.push(action);
            }
        }
        unique
    }

    fn is_active(&self, dialog_id: &ResourceId) -> bool {
        self.active_dialog_id.as_ref() == Some(dialog_id)
    }

    /// Show fetched settings if they still belong to the active dialog.
    /// Returns false when the reply arrived too late and was dropped.
    pub fn accept_dialog_settings(&mut self, dialog_id: ResourceId, settings: DialogSettings) -> bool {
        if !self.is_active(&dialog_id) {
            log::debug!("Dropping settings of dialog {}: no longer active", dialog_id);
            return false;
        }
        self.settings_form.load(&settings);
        self.dialog_settings = Some((dialog_id, settings));
        true
    }

    /// Show a fetched file list if it still belongs to the active dialog.
    pub fn accept_dialog_files(&mut self, dialog_id: ResourceId, files: Vec<DialogFile>) -> bool {
        if !self.is_active(&dialog_id) {
            log::debug!("Dropping files of dialog {}: no longer active", dialog_id);
            return false;
        }
        self.dialog_files = Some((dialog_id, files));
        true
    }

    pub fn push_notice(&mut self, notice: Notice, now: f64) {
        self.notices.push(ShownNotice { notice, shown_at: now });
    }

    pub fn dismiss(&mut self, id: &str) {
        self.notices.retain(|n| n.notice.id != id);
    }

    /// Drop expired notices. Returns true if any were removed.
    pub fn prune_notices(&mut self, now: f64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| !n.expired(now));
        self.notices.len() != before
    }

    /// Take the composer text for sending, leaving the field empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input_text)
    }

    /// `Send` with the composer text, newlines included. Blank input stays
    /// in the field and sends nothing.
    pub fn submit_input(&mut self) -> Option<UiAction> {
        if self.input_text.trim().is_empty() {
            return None;
        }
        Some(UiAction::Send(self.take_input()))
    }

    /// Clear the title field after `title` became a dialog, unless the
    /// user has typed something else since.
    pub fn dialog_created(&mut self, title: &str) {
        if self.new_dialog_title.trim() == title.trim() {
            self.new_dialog_title.clear();
        }
    }

    pub fn is_busy(&self) -> bool {
        self.sending
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
