//! Chat panel: transcript of the active dialog and the message composer.
//!
//! Assistant replies are Markdown (GFM tables, lists, code) and are rendered
//! as such; user and system messages stay plain text.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};

use chat_core::session::SessionSnapshot;
use chat_types::message::{Message, Role};

use crate::state::{UiAction, UiState};
use crate::theme::*;

/// Render the chat panel. Returns `UiAction::Send` when the user submits.
pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: &SessionSnapshot,
) -> Option<UiAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.horizontal(|ui| {
                    ui.heading(RichText::new(dialog_title(session)).color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if session.pending_send { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                    });
                });

                ui.separator();

                let available_height = ui.available_height() - 84.0;
                ScrollArea::vertical()
                    .id_salt("transcript")
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        if session.transcript.is_empty() {
                            ui.add_space(24.0);
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    RichText::new("Start the conversation by typing a message below.")
                                        .color(TEXT_SECONDARY)
                                        .italics(),
                                );
                            });
                        }

                        for message in &session.transcript {
                            render_message(ui, message, &mut state.markdown);
                            ui.add_space(4.0);
                        }

                        if session.pending_send {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.label(RichText::new("AI is typing...").color(TEXT_SECONDARY).small());
                            });
                        }
                    });

                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let composer_id = ui.make_persistent_id("composer");
                    // Plain Enter sends; Shift+Enter reaches the editor as a newline
                    let enter = ui.memory(|m| m.has_focus(composer_id))
                        && !ui.input(|i| i.modifiers.shift)
                        && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));

                    let input = egui::TextEdit::multiline(&mut state.input_text)
                        .id(composer_id)
                        .hint_text("Type a message... (Shift+Enter for a new line)")
                        .desired_rows(2)
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));
                    let response = ui.add_enabled(!session.pending_send, input);

                    let can_send = !state.input_text.trim().is_empty() && !session.pending_send;
                    let send_btn = ui.add_enabled(
                        can_send,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if can_send { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    if !session.pending_send && (enter || send_btn.clicked()) {
                        action = state.submit_input();
                        response.request_focus();
                    }
                });
            });
        });

    action
}

fn dialog_title(session: &SessionSnapshot) -> String {
    session
        .active_dialog_id
        .as_ref()
        .and_then(|id| session.dialogs.iter().find(|d| &d.id == id))
        .map(|d| d.title.clone())
        .unwrap_or_else(|| "New dialog".to_string())
}

fn render_message(ui: &mut egui::Ui, message: &Message, markdown: &mut CommonMarkCache) {
    let (label_color, bg) = role_style(message.role);

    egui::Frame::default()
        .fill(bg)
        .corner_radius(BUBBLE_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(message.role.label()).color(label_color).strong().small());
                let time = message.time_label();
                if !time.is_empty() {
                    ui.label(RichText::new(time).color(TEXT_SECONDARY).small());
                }
            });
            match message.role {
                Role::Assistant => {
                    CommonMarkViewer::new().show(ui, markdown, &message.content);
                }
                Role::User | Role::System => {
                    ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
                }
            }
        });
}
