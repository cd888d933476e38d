//! Main egui application: composes the panels and dispatches user actions
//! to the session manager and the assistant directory.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use chat_core::assistants::AssistantDirectory;
use chat_core::event_bus::EventBus;
use chat_core::session::SessionManager;
use chat_platform::HttpBackend;
use chat_types::assistant::{DialogSettings, ModelInfo};
use chat_types::config::ClientConfig;
use chat_types::dialog::{DialogFile, ResourceId};
use chat_types::event::SessionEvent;
use chat_ui::panels::{assistants, chat, dialogs, notices};
use chat_ui::state::{UiAction, UiState};
use chat_ui::theme;

/// Results of background fetches that only the UI cares about.
#[derive(Default)]
struct Slots {
    models: Option<Vec<ModelInfo>>,
    dialog_settings: Option<(ResourceId, DialogSettings)>,
    dialog_files: Option<(ResourceId, Vec<DialogFile>)>,
    /// Title of a dialog that was just created
    created_title: Option<String>,
}

/// The main application state
pub struct ChatApp {
    ui_state: UiState,
    event_bus: EventBus,
    session: SessionManager,
    directory: AssistantDirectory,
    slots: Rc<RefCell<Slots>>,
    first_frame: bool,
}

impl ChatApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = ClientConfig::from_build_env();
        let event_bus = EventBus::new();
        let backend = Rc::new(HttpBackend::new(config.clone()));

        let session = SessionManager::new(
            backend.clone(),
            backend.clone(),
            event_bus.clone(),
            config.page_size,
        );
        let directory = AssistantDirectory::new(
            backend.clone(),
            backend,
            event_bus.clone(),
            config.page_size,
        );

        Self {
            ui_state: UiState::new(),
            event_bus,
            session,
            directory,
            slots: Rc::new(RefCell::new(Slots::default())),
            first_frame: true,
        }
    }

    /// Initial list loads. Failures surface as notices.
    fn load_initial(&self, ctx: &egui::Context) {
        let session = self.session.clone();
        spawn_repaint(ctx, async move {
            let _ = session.load_dialogs().await;
        });
        let session = self.session.clone();
        spawn_repaint(ctx, async move {
            let _ = session.load_assistants().await;
        });
    }

    /// Move finished background fetches into UI state.
    fn collect_slots(&mut self) {
        let mut slots = self.slots.borrow_mut();
        if let Some(models) = slots.models.take() {
            self.ui_state.models = models;
        }
        if let Some((id, settings)) = slots.dialog_settings.take() {
            self.ui_state.accept_dialog_settings(id, settings);
        }
        if let Some((id, files)) = slots.dialog_files.take() {
            self.ui_state.accept_dialog_files(id, files);
        }
        if let Some(title) = slots.created_title.take() {
            self.ui_state.dialog_created(&title);
        }
    }

    fn process_bus(&mut self, ctx: &egui::Context) {
        let events = self.event_bus.drain();
        if events.is_empty() {
            return;
        }
        for event in &events {
            if let SessionEvent::AssistantsChanged = event {
                let session = self.session.clone();
                let event = event.clone();
                spawn_repaint(ctx, async move {
                    session.handle_event(&event).await;
                });
            }
        }
        let now = ctx.input(|i| i.time);
        let follow_ups = self.ui_state.process_events(&events, now);
        for action in follow_ups {
            self.dispatch(action, ctx);
        }
        ctx.request_repaint();
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.load_initial(ctx);
            self.first_frame = false;
        }

        self.process_bus(ctx);
        self.collect_slots();

        let now = ctx.input(|i| i.time);
        if self.ui_state.prune_notices(now) {
            ctx.request_repaint();
        }
        if !self.ui_state.notices.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        let snapshot = self.session.snapshot();
        if snapshot.pending_send {
            ctx.request_repaint();
        }

        let mut actions: Vec<UiAction> = Vec::new();

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.ui_state.show_dialogs, "☰")
                    .on_hover_text("Dialogs")
                    .clicked()
                {
                    self.ui_state.show_dialogs = !self.ui_state.show_dialogs;
                }
                ui.label(
                    RichText::new("AI Chat")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                actions.extend(assistants::assistant_selector(ui, &snapshot));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_assistants, "Assistants")
                        .clicked()
                    {
                        self.ui_state.show_assistants = !self.ui_state.show_assistants;
                    }
                });
            });
        });

        // ── Dialog list ──────────────────────────────────────
        if self.ui_state.show_dialogs {
            SidePanel::left("dialogs_panel")
                .min_width(220.0)
                .max_width(300.0)
                .show(ctx, |ui| {
                    actions.extend(dialogs::dialogs_panel(ui, &mut self.ui_state, &snapshot));
                });
        }

        // ── Assistant editor ─────────────────────────────────
        if self.ui_state.show_assistants {
            SidePanel::right("assistants_panel")
                .min_width(280.0)
                .max_width(360.0)
                .show(ctx, |ui| {
                    actions.extend(assistants::assistants_panel(ui, &mut self.ui_state, &snapshot));
                });
        }

        // ── Transcript ───────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            actions.extend(chat::chat_panel(ui, &mut self.ui_state, &snapshot));
        });

        notices::notices_overlay(ctx, &mut self.ui_state);

        for action in actions {
            self.dispatch(action, ctx);
        }
    }
}

impl ChatApp {
    /// Run one user action in the background.
    fn dispatch(&self, action: UiAction, ctx: &egui::Context) {
        match &action {
            UiAction::UploadDialogFile { dialog_id, filename, bytes } => log::debug!(
                "Dispatching upload of {} ({} bytes) to dialog {}",
                filename,
                bytes.len(),
                dialog_id
            ),
            other => log::debug!("Dispatching {:?}", other),
        }
        let session = self.session.clone();
        let directory = self.directory.clone();

        match action {
            UiAction::Send(text) => spawn_repaint(ctx, async move {
                let _ = session.send_message(&text).await;
            }),
            UiAction::SelectDialog(id) => spawn_repaint(ctx, async move {
                let _ = session.select_dialog(&id).await;
            }),
            UiAction::DeleteDialog(id) => spawn_repaint(ctx, async move {
                let _ = session.delete_dialog(&id).await;
            }),
            UiAction::CreateDialog(title) => {
                let slots = self.slots.clone();
                spawn_repaint(ctx, async move {
                    if session.create_dialog(&title).await.is_ok() {
                        slots.borrow_mut().created_title = Some(title);
                    }
                });
            }
            UiAction::StartNewDialog => {
                session.start_new_dialog();
                ctx.request_repaint();
            }
            UiAction::RefreshDialogs => spawn_repaint(ctx, async move {
                let _ = session.load_dialogs().await;
            }),
            UiAction::SelectAssistant(id) => spawn_repaint(ctx, async move {
                let _ = session.select_assistant(id.as_ref()).await;
            }),
            UiAction::SaveAssistant { id, draft } => spawn_repaint(ctx, async move {
                let _ = match id {
                    Some(id) => directory.update(&id, &draft).await.map(|_| ()),
                    None => directory.create(&draft).await.map(|_| ()),
                };
            }),
            UiAction::DeleteAssistant(id) => spawn_repaint(ctx, async move {
                let _ = directory.delete(&id).await;
            }),
            UiAction::LoadModels => {
                let slots = self.slots.clone();
                spawn_repaint(ctx, async move {
                    match directory.models().await {
                        Ok(models) => slots.borrow_mut().models = Some(models),
                        Err(e) => log::error!("Failed to load models: {}", e),
                    }
                });
            }
            UiAction::LoadDialogSettings(id) => {
                let slots = self.slots.clone();
                spawn_repaint(ctx, async move {
                    match directory.dialog_settings(&id).await {
                        Ok(settings) => slots.borrow_mut().dialog_settings = Some((id, settings)),
                        Err(e) => log::error!("Failed to load settings of dialog {}: {}", id, e),
                    }
                });
            }
            UiAction::SaveDialogSettings { dialog_id, settings } => spawn_repaint(ctx, async move {
                let _ = directory.save_dialog_settings(&dialog_id, settings).await;
            }),
            UiAction::LoadDialogFiles(id) => {
                let slots = self.slots.clone();
                spawn_repaint(ctx, async move {
                    match directory.dialog_files(&id).await {
                        Ok(files) => slots.borrow_mut().dialog_files = Some((id, files)),
                        Err(e) => log::error!("Failed to load files of dialog {}: {}", id, e),
                    }
                });
            }
            UiAction::UploadDialogFile { dialog_id, filename, bytes } => spawn_repaint(ctx, async move {
                let _ = directory.upload_dialog_file(&dialog_id, &filename, &bytes).await;
            }),
            UiAction::DeleteDialogFile { dialog_id, file_id } => spawn_repaint(ctx, async move {
                let _ = directory.delete_dialog_file(&dialog_id, &file_id).await;
            }),
        }
    }
}

/// Spawn on the browser event loop and repaint once the task settles.
fn spawn_repaint<F>(ctx: &egui::Context, task: F)
where
    F: Future<Output = ()> + 'static,
{
    let ctx = ctx.clone();
    wasm_bindgen_futures::spawn_local(async move {
        task.await;
        ctx.request_repaint();
    });
}
