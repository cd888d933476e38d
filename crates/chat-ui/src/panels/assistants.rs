//! Assistant selector and profile editor.
//!
//! The selector lives in the top bar; the editor is a side panel for creating,
//! editing and deleting profiles, and for the active dialog's own settings
//! and attached files.

use egui::{self, RichText, Vec2};

use chat_core::session::SessionSnapshot;
use chat_types::assistant::AssistantProfile;
use chat_types::dialog::{DialogFile, ResourceId};

use crate::state::{UiAction, UiState};
use crate::theme::*;

const NO_ASSISTANT: &str = "No assistant";

/// Compact ComboBox over the cached profiles.
pub fn assistant_selector(ui: &mut egui::Ui, session: &SessionSnapshot) -> Option<UiAction> {
    let mut action = None;
    let current = session
        .selected_assistant()
        .map(|a| a.name.clone())
        .unwrap_or_else(|| NO_ASSISTANT.to_string());

    ui.label(RichText::new("Assistant").color(TEXT_SECONDARY).small());
    egui::ComboBox::from_id_salt("assistant_selector")
        .selected_text(current)
        .width(180.0)
        .show_ui(ui, |ui| {
            if ui
                .selectable_label(session.selected_assistant_id.is_none(), NO_ASSISTANT)
                .clicked()
            {
                action = Some(UiAction::SelectAssistant(None));
            }
            for profile in &session.assistants {
                let selected = session.selected_assistant_id.as_ref() == Some(&profile.id);
                let item = ui
                    .selectable_label(selected, &profile.name)
                    .on_hover_text(profile.description.as_deref().unwrap_or(&profile.model));
                if item.clicked() && !selected {
                    action = Some(UiAction::SelectAssistant(Some(profile.id.clone())));
                }
            }
        });
    if session.assistants_loading {
        ui.spinner();
    }

    action
}

/// Render the profile editor and, with a dialog active, that dialog's
/// settings and files. Returns the actions for the caller to dispatch.
pub fn assistants_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: &SessionSnapshot,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Assistants").color(TEXT_PRIMARY));
            ui.separator();

            // ── Profiles ─────────────────────────────────────
            egui::ScrollArea::vertical()
                .id_salt("assistant_list")
                .max_height(180.0)
                .show(ui, |ui| {
                    if session.assistants.is_empty() {
                        ui.label(RichText::new("No assistants yet").color(TEXT_SECONDARY).italics());
                    }
                    for profile in &session.assistants {
                        actions.extend(profile_row(ui, state, profile));
                    }
                });

            ui.add_space(8.0);
            ui.separator();

            // ── Form ─────────────────────────────────────────
            let heading = if state.assistant_form.editing.is_some() {
                "Edit assistant"
            } else {
                "New assistant"
            };
            ui.label(RichText::new(heading).color(ACCENT).strong());
            ui.add_space(2.0);

            let form = &mut state.assistant_form.draft;

            ui.label(RichText::new("Name").color(TEXT_SECONDARY).small());
            ui.text_edit_singleline(&mut form.name);

            ui.label(RichText::new("Description").color(TEXT_SECONDARY).small());
            let mut description = form.description.clone().unwrap_or_default();
            if ui.text_edit_singleline(&mut description).changed() {
                form.description = if description.trim().is_empty() {
                    None
                } else {
                    Some(description)
                };
            }

            ui.label(RichText::new("System prompt").color(TEXT_SECONDARY).small());
            ui.add(
                egui::TextEdit::multiline(&mut form.system_prompt)
                    .desired_rows(4)
                    .hint_text("You are a helpful assistant..."),
            );

            ui.label(RichText::new("Model").color(TEXT_SECONDARY).small());
            ui.horizontal(|ui| {
                if state.models.is_empty() {
                    ui.text_edit_singleline(&mut form.model);
                    if ui.small_button("⟳").on_hover_text("Load models").clicked() {
                        actions.push(UiAction::LoadModels);
                    }
                } else {
                    let selected = state
                        .models
                        .iter()
                        .find(|m| m.id == form.model)
                        .map(|m| m.name.clone())
                        .unwrap_or_else(|| form.model.clone());
                    egui::ComboBox::from_id_salt("assistant_model")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for model in &state.models {
                                ui.selectable_value(&mut form.model, model.id.clone(), &model.name);
                            }
                        });
                }
            });

            ui.label(RichText::new("Temperature (0.0 - 1.0)").color(TEXT_SECONDARY).small());
            ui.add(egui::TextEdit::singleline(&mut form.temperature).desired_width(80.0));

            ui.label(RichText::new("Max tokens").color(TEXT_SECONDARY).small());
            ui.add(egui::DragValue::new(&mut form.max_tokens).range(1..=32_000));

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                let save = ui.add(
                    egui::Button::new(RichText::new("Save").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(90.0, 28.0)),
                );
                if save.clicked() {
                    actions.push(state.assistant_form.submit());
                }
                if state.assistant_form.editing.is_some() && ui.button("Cancel").clicked() {
                    state.assistant_form.reset();
                }
            });

            // ── Active dialog ────────────────────────────────
            if let Some(dialog_id) = &session.active_dialog_id {
                ui.add_space(12.0);
                ui.separator();
                egui::ScrollArea::vertical()
                    .id_salt("dialog_settings")
                    .show(ui, |ui| {
                        actions.extend(dialog_section(ui, state, dialog_id));
                    });
            }
        });

    actions
}

fn profile_row(ui: &mut egui::Ui, state: &mut UiState, profile: &AssistantProfile) -> Option<UiAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        let editing = state.assistant_form.is_editing(&profile.id);
        let name = RichText::new(&profile.name).color(if editing { ACCENT } else { TEXT_PRIMARY });
        ui.label(name);
        ui.label(RichText::new(&profile.model).color(TEXT_SECONDARY).small());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                action = Some(UiAction::DeleteAssistant(profile.id.clone()));
            }
            if ui.small_button("✏").on_hover_text("Edit").clicked() {
                state.assistant_form.edit(profile);
            }
        });
    });
    action
}

fn dialog_section(ui: &mut egui::Ui, state: &mut UiState, dialog_id: &ResourceId) -> Vec<UiAction> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        ui.label(RichText::new("Current dialog").color(ACCENT).strong());
        if ui.small_button("⟳").on_hover_text("Reload settings and files").clicked() {
            actions.push(UiAction::LoadDialogSettings(dialog_id.clone()));
            actions.push(UiAction::LoadDialogFiles(dialog_id.clone()));
        }
    });

    let loaded = state
        .dialog_settings
        .as_ref()
        .is_some_and(|(id, _)| id == dialog_id);
    if loaded {
        let form = &mut state.settings_form;

        ui.label(RichText::new("System prompt").color(TEXT_SECONDARY).small());
        ui.add(
            egui::TextEdit::multiline(&mut form.system_prompt)
                .desired_rows(3)
                .hint_text("Backend default"),
        );

        ui.label(RichText::new("Model").color(TEXT_SECONDARY).small());
        if state.models.is_empty() {
            ui.add(egui::TextEdit::singleline(&mut form.model).hint_text("Backend default"));
        } else {
            egui::ComboBox::from_id_salt("dialog_model")
                .selected_text(if form.model.is_empty() { "Default" } else { form.model.as_str() })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut form.model, String::new(), "Default");
                    for model in &state.models {
                        ui.selectable_value(&mut form.model, model.id.clone(), &model.name);
                    }
                });
        }

        ui.label(RichText::new("Temperature (0.0 - 1.0)").color(TEXT_SECONDARY).small());
        ui.add(
            egui::TextEdit::singleline(&mut form.temperature)
                .desired_width(80.0)
                .hint_text("default"),
        );

        ui.label(RichText::new("Max tokens (0 = default)").color(TEXT_SECONDARY).small());
        ui.add(egui::DragValue::new(&mut form.max_tokens).range(0..=32_000));

        ui.add_space(6.0);
        if ui.button("Save settings").clicked() {
            actions.push(form.submit(dialog_id));
        }
    } else {
        ui.label(RichText::new("Settings not loaded").color(TEXT_SECONDARY).small().italics());
    }

    // ── Files ────────────────────────────────────────
    ui.add_space(10.0);
    ui.label(RichText::new("Files").color(ACCENT).strong());
    match &state.dialog_files {
        Some((id, files)) if id == dialog_id => {
            if files.is_empty() {
                ui.label(RichText::new("No files attached").color(TEXT_SECONDARY).small().italics());
            }
            for file in files {
                actions.extend(file_row(ui, dialog_id, file));
            }
        }
        _ => {
            ui.label(RichText::new("Files not loaded").color(TEXT_SECONDARY).small().italics());
        }
    }

    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    let hint = if hovering {
        "Release to attach to this dialog"
    } else {
        "Drop a file on the window to attach it"
    };
    ui.label(RichText::new(hint).color(TEXT_SECONDARY).small());

    for dropped in ui.ctx().input(|i| i.raw.dropped_files.clone()) {
        match dropped.bytes {
            Some(bytes) => {
                log::debug!("Attaching dropped file {} to dialog {}", dropped.name, dialog_id);
                actions.push(UiAction::UploadDialogFile {
                    dialog_id: dialog_id.clone(),
                    filename: dropped.name.clone(),
                    bytes: bytes.to_vec(),
                });
            }
            None => log::warn!("Dropped file {} carries no contents", dropped.name),
        }
    }

    actions
}

fn file_row(ui: &mut egui::Ui, dialog_id: &ResourceId, file: &DialogFile) -> Option<UiAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        ui.label(RichText::new(&file.filename).color(TEXT_PRIMARY));
        ui.label(RichText::new(file.size_label()).color(TEXT_SECONDARY).small());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let hover = if file.file_type.is_empty() { "Delete" } else { file.file_type.as_str() };
            if ui.small_button("🗑").on_hover_text(hover).clicked() {
                action = Some(UiAction::DeleteDialogFile {
                    dialog_id: dialog_id.clone(),
                    file_id: file.id.clone(),
                });
            }
        });
    });
    action
}
