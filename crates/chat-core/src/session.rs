//! Conversation session manager.
//!
//! Owns the transcript of the active dialog, the cached dialog and assistant
//! lists, and the assistant selection. All mutation happens in short
//! `RefCell` borrows between awaits, so UI code can read a snapshot while a
//! request is in flight.
//!
//! Every change of the active dialog advances a generation counter. Responses
//! that come back under an older generation are discarded instead of being
//! written into whatever dialog is now on screen.

use std::cell::RefCell;
use std::rc::Rc;

use chat_types::{
    ChatError, Result,
    assistant::AssistantProfile,
    dialog::{CreateDialogRequest, Dialog, DialogTurnResponse, Page, ResourceId},
    event::{Notice, SessionEvent},
    message::Message,
};

use crate::assistants::upsert_settings;
use crate::event_bus::EventBus;
use crate::ports::{AssistantPort, DialogPort};
use crate::transcript::{PendingTurn, TurnOutcome, Transcript};

/// Client-only session state. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub active_dialog_id: Option<ResourceId>,
    pub transcript: Transcript,
    pub selected_assistant_id: Option<ResourceId>,
    pub dialogs: Vec<Dialog>,
    pub assistants: Vec<AssistantProfile>,
    pub dialogs_loading: bool,
    pub assistants_loading: bool,
    generation: u64,
    select_ticket: u64,
    /// Dialog the latest `select_dialog` is fetching
    selecting: Option<ResourceId>,
}

impl SessionState {
    /// Switch to another dialog (or the unsaved one) with the given history.
    fn activate(&mut self, dialog_id: Option<ResourceId>, messages: Vec<Message>) {
        self.active_dialog_id = dialog_id;
        self.transcript.replace(messages);
        self.generation += 1;
    }

    fn is_active(&self, id: &ResourceId) -> bool {
        self.active_dialog_id.as_ref() == Some(id)
    }
}

/// Owned copy of the state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub active_dialog_id: Option<ResourceId>,
    pub transcript: Vec<Message>,
    pub selected_assistant_id: Option<ResourceId>,
    pub pending_send: bool,
    pub dialogs: Vec<Dialog>,
    pub assistants: Vec<AssistantProfile>,
    pub dialogs_loading: bool,
    pub assistants_loading: bool,
}

impl SessionSnapshot {
    pub fn selected_assistant(&self) -> Option<&AssistantProfile> {
        let id = self.selected_assistant_id.as_ref()?;
        self.assistants.iter().find(|a| &a.id == id)
    }
}

/// Shared handle, clone-cheap via Rc.
#[derive(Clone)]
pub struct SessionManager {
    state: Rc<RefCell<SessionState>>,
    dialogs: Rc<dyn DialogPort>,
    assistants: Rc<dyn AssistantPort>,
    events: EventBus,
    page: Page,
}

impl SessionManager {
    pub fn new(
        dialogs: Rc<dyn DialogPort>,
        assistants: Rc<dyn AssistantPort>,
        events: EventBus,
        page_size: u32,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(SessionState::default())),
            dialogs,
            assistants,
            events,
            page: Page::first(page_size),
        }
    }

    // ─── Accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        let st = self.state.borrow();
        SessionSnapshot {
            active_dialog_id: st.active_dialog_id.clone(),
            transcript: st.transcript.messages().to_vec(),
            selected_assistant_id: st.selected_assistant_id.clone(),
            pending_send: st.transcript.is_pending(),
            dialogs: st.dialogs.clone(),
            assistants: st.assistants.clone(),
            dialogs_loading: st.dialogs_loading,
            assistants_loading: st.assistants_loading,
        }
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.state.borrow().transcript.messages().to_vec()
    }

    pub fn active_dialog_id(&self) -> Option<ResourceId> {
        self.state.borrow().active_dialog_id.clone()
    }

    pub fn dialogs(&self) -> Vec<Dialog> {
        self.state.borrow().dialogs.clone()
    }

    pub fn assistants(&self) -> Vec<AssistantProfile> {
        self.state.borrow().assistants.clone()
    }

    pub fn selected_assistant_id(&self) -> Option<ResourceId> {
        self.state.borrow().selected_assistant_id.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().transcript.is_pending()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ─── Sending ─────────────────────────────────────────────

    /// Send one user turn.
    ///
    /// The user message is in the transcript before this future first yields.
    /// `Err` means the send was rejected up front (blank text, another send in
    /// flight) and nothing changed; network and server failures resolve to
    /// `Ok(TurnOutcome::Failed)` after the failure marker has been appended,
    /// or to `Ok(TurnOutcome::Stale)` if the session switched dialogs meanwhile.
    pub async fn send_message(&self, text: &str) -> Result<TurnOutcome> {
        let turn = self.begin_send(text)?;
        let result = self.dialogs.send_message(turn.request()).await;
        Ok(self.finish_send(turn, result).await)
    }

    fn begin_send(&self, text: &str) -> Result<PendingTurn> {
        let begun = {
            let mut st = self.state.borrow_mut();
            let dialog_id = st.active_dialog_id.clone();
            let generation = st.generation;
            st.transcript.begin(text, dialog_id, generation)
        };

        match begun {
            Ok(turn) => {
                log::info!(
                    "Sending message to dialog {}",
                    turn.dialog_id
                        .as_ref()
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "<new>".to_string())
                );
                self.events.emit(SessionEvent::TranscriptChanged);
                self.events.emit(SessionEvent::SendStarted);
                Ok(turn)
            }
            Err(e) => {
                log::warn!("Send rejected: {}", e);
                if let ChatError::Validation(_) = e {
                    self.events.notify(Notice::warning("Enter a message"));
                }
                Err(e)
            }
        }
    }

    async fn finish_send(
        &self,
        turn: PendingTurn,
        result: Result<DialogTurnResponse>,
    ) -> TurnOutcome {
        let created = turn.creates_dialog();
        let outcome = {
            let mut st = self.state.borrow_mut();
            let stale = st.generation != turn.generation;

            match result {
                Ok(resp) if stale => {
                    log::warn!(
                        "Discarding reply for dialog {}: session moved on",
                        resp.dialog_id
                    );
                    st.transcript.settle();
                    TurnOutcome::Stale { dialog_id: Some(resp.dialog_id) }
                }
                Ok(resp) => {
                    st.transcript.commit(resp.conversation_history);
                    st.active_dialog_id = Some(resp.dialog_id.clone());
                    TurnOutcome::Committed {
                        dialog_id: resp.dialog_id,
                        created,
                    }
                }
                Err(e) if stale => {
                    log::warn!("Dropping failed send: session moved on ({})", e);
                    st.transcript.settle();
                    TurnOutcome::Stale { dialog_id: None }
                }
                Err(e) => {
                    log::error!("Send failed: {}", e);
                    st.transcript.fail();
                    TurnOutcome::Failed(e)
                }
            }
        };

        match &outcome {
            TurnOutcome::Committed { dialog_id, created } => {
                self.events.emit(SessionEvent::TranscriptChanged);
                if *created {
                    self.events.emit(SessionEvent::ActiveDialogChanged {
                        dialog_id: Some(dialog_id.clone()),
                    });
                }
            }
            TurnOutcome::Failed(e) => {
                self.events.emit(SessionEvent::TranscriptChanged);
                self.events.notify(Notice::error(format!(
                    "Failed to send message. Please try again. ({})",
                    e
                )));
            }
            TurnOutcome::Stale { .. } => {}
        }
        self.events.emit(SessionEvent::SendFinished {
            success: !matches!(outcome, TurnOutcome::Failed(_)),
        });

        let accepted = matches!(
            outcome,
            TurnOutcome::Committed { .. } | TurnOutcome::Stale { dialog_id: Some(_) }
        );
        if created && accepted {
            // Failure is already reported by load_dialogs itself
            let _ = self.load_dialogs().await;
        }

        outcome
    }

    // ─── Dialog lifecycle ────────────────────────────────────

    pub async fn load_dialogs(&self) -> Result<()> {
        self.state.borrow_mut().dialogs_loading = true;
        let result = self.dialogs.list_dialogs(self.page).await;

        let mut st = self.state.borrow_mut();
        st.dialogs_loading = false;
        match result {
            Ok(dialogs) => {
                log::info!("Loaded {} dialogs", dialogs.len());
                st.dialogs = dialogs;
                drop(st);
                self.events.emit(SessionEvent::DialogsChanged);
                Ok(())
            }
            Err(e) => {
                drop(st);
                log::error!("Failed to load dialogs: {}", e);
                self.events.notify(Notice::error(format!("Failed to load dialogs: {}", e)));
                Err(e)
            }
        }
    }

    /// Make `id` the active dialog with its server-side history.
    /// On failure nothing changes.
    pub async fn select_dialog(&self, id: &ResourceId) -> Result<()> {
        let (generation, ticket) = {
            let mut st = self.state.borrow_mut();
            st.select_ticket += 1;
            st.selecting = Some(id.clone());
            (st.generation, st.select_ticket)
        };

        let dialog = match self.dialogs.get_dialog(id).await {
            Ok(d) => d,
            Err(e) => {
                let mut st = self.state.borrow_mut();
                if st.select_ticket == ticket {
                    st.selecting = None;
                }
                drop(st);
                log::error!("Failed to load dialog {}: {}", id, e);
                self.events.notify(Notice::error(format!("Failed to load dialog: {}", e)));
                return Err(e);
            }
        };

        {
            let mut st = self.state.borrow_mut();
            if st.select_ticket == ticket {
                st.selecting = None;
            }
            if st.generation != generation || st.select_ticket != ticket {
                log::warn!("Ignoring dialog {}: superseded or deleted meanwhile", id);
                return Ok(());
            }
            st.activate(Some(id.clone()), dialog.into_messages());
        }

        log::info!("Switched to dialog {}", id);
        self.events.emit(SessionEvent::ActiveDialogChanged { dialog_id: Some(id.clone()) });
        self.events.emit(SessionEvent::TranscriptChanged);
        Ok(())
    }

    /// Create a dialog, put it first in the list and make it active.
    pub async fn create_dialog(&self, title: &str) -> Result<Dialog> {
        let req = CreateDialogRequest { title: title.trim().to_string() };
        if let Err(e) = chat_types::validate(&req) {
            log::warn!("Dialog creation rejected: {}", e);
            self.events.notify(Notice::warning("Enter a dialog title"));
            return Err(e);
        }

        let dialog = match self.dialogs.create_dialog(&req.title).await {
            Ok(d) => d,
            Err(e) => {
                log::error!("Failed to create dialog: {}", e);
                self.events.notify(Notice::error(format!("Failed to create dialog: {}", e)));
                return Err(e);
            }
        };

        {
            let mut st = self.state.borrow_mut();
            st.dialogs.insert(0, dialog.clone());
            st.activate(Some(dialog.id.clone()), Vec::new());
        }

        log::info!("Created dialog {} ({})", dialog.id, dialog.title);
        self.events.emit(SessionEvent::DialogsChanged);
        self.events.emit(SessionEvent::ActiveDialogChanged { dialog_id: Some(dialog.id.clone()) });
        self.events.emit(SessionEvent::TranscriptChanged);
        self.events.notify(Notice::success("New dialog created"));
        Ok(dialog)
    }

    /// Delete a dialog. Deleting the active one reverts to the unsaved dialog.
    pub async fn delete_dialog(&self, id: &ResourceId) -> Result<()> {
        if let Err(e) = self.dialogs.delete_dialog(id).await {
            log::error!("Failed to delete dialog {}: {}", id, e);
            self.events.notify(Notice::error(format!("Failed to delete dialog: {}", e)));
            return Err(e);
        }

        let was_active = {
            let mut st = self.state.borrow_mut();
            st.dialogs.retain(|d| &d.id != id);
            if st.selecting.as_ref() == Some(id) {
                // The fetch in flight must not resurrect it
                st.select_ticket += 1;
            }
            let was_active = st.is_active(id);
            if was_active {
                st.activate(None, Vec::new());
            }
            was_active
        };

        log::info!("Deleted dialog {}", id);
        self.events.emit(SessionEvent::DialogsChanged);
        if was_active {
            self.events.emit(SessionEvent::ActiveDialogChanged { dialog_id: None });
            self.events.emit(SessionEvent::TranscriptChanged);
        }
        self.events.notify(Notice::success("Dialog deleted"));
        Ok(())
    }

    /// Compose a dialog that is created lazily by the first send.
    pub fn start_new_dialog(&self) {
        self.state.borrow_mut().activate(None, Vec::new());
        self.events.emit(SessionEvent::ActiveDialogChanged { dialog_id: None });
        self.events.emit(SessionEvent::TranscriptChanged);
    }

    // ─── Assistant profiles ──────────────────────────────────

    pub async fn load_assistants(&self) -> Result<()> {
        self.state.borrow_mut().assistants_loading = true;
        let result = self.assistants.list_assistants(self.page).await;

        let cleared_selection = {
            let mut st = self.state.borrow_mut();
            st.assistants_loading = false;
            match &result {
                Ok(list) => {
                    st.assistants = list.clone();
                    // A profile deleted elsewhere cannot stay selected
                    let dangling = st
                        .selected_assistant_id
                        .as_ref()
                        .is_some_and(|sel| !list.iter().any(|a| &a.id == sel));
                    if dangling {
                        st.selected_assistant_id = None;
                    }
                    dangling
                }
                Err(_) => false,
            }
        };

        match result {
            Ok(list) => {
                log::info!("Loaded {} assistants", list.len());
                self.events.emit(SessionEvent::AssistantsLoaded);
                if cleared_selection {
                    self.events.emit(SessionEvent::AssistantSelected { assistant_id: None });
                }
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load assistants: {}", e);
                self.events.notify(Notice::error(format!("Failed to load assistants: {}", e)));
                Err(e)
            }
        }
    }

    /// Select a cached profile by id, or clear the selection with `None`.
    /// Unknown ids are ignored.
    pub async fn select_assistant(&self, id: Option<&ResourceId>) -> Result<()> {
        let Some(id) = id else {
            self.state.borrow_mut().selected_assistant_id = None;
            self.events.emit(SessionEvent::AssistantSelected { assistant_id: None });
            return Ok(());
        };

        let profile = self
            .state
            .borrow()
            .assistants
            .iter()
            .find(|a| &a.id == id)
            .cloned();
        match profile {
            Some(p) => self.apply_assistant_profile(&p).await,
            None => {
                log::warn!("Unknown assistant {}", id);
                Ok(())
            }
        }
    }

    /// Select `profile` and, if a dialog is active, push its settings onto it.
    ///
    /// The selection is kept even when the push fails; the two are not
    /// transactional.
    pub async fn apply_assistant_profile(&self, profile: &AssistantProfile) -> Result<()> {
        let active = {
            let mut st = self.state.borrow_mut();
            st.selected_assistant_id = Some(profile.id.clone());
            st.active_dialog_id.clone()
        };
        self.events.emit(SessionEvent::AssistantSelected {
            assistant_id: Some(profile.id.clone()),
        });

        let Some(dialog_id) = active else {
            log::info!("Assistant {} selected; no active dialog to apply it to", profile.name);
            return Ok(());
        };

        match upsert_settings(self.dialogs.as_ref(), &dialog_id, &profile.to_settings()).await {
            Ok(_) => {
                log::info!("Applied assistant {} to dialog {}", profile.name, dialog_id);
                self.events.emit(SessionEvent::DialogSettingsChanged {
                    dialog_id: dialog_id.clone(),
                });
                self.events.notify(Notice::success(format!(
                    "Assistant \"{}\" applied to dialog",
                    profile.name
                )));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to apply assistant {}: {}", profile.name, e);
                self.events.notify(Notice::error(format!(
                    "Assistant selected, but its settings were not applied to the dialog: {}",
                    e
                )));
                Err(e)
            }
        }
    }

    // ─── Bus observation ─────────────────────────────────────

    /// React to events produced elsewhere on the shared bus.
    pub async fn handle_event(&self, event: &SessionEvent) {
        if let SessionEvent::AssistantsChanged = event {
            let _ = self.load_assistants().await;
        }
    }
}
