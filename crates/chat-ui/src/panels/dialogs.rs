//! Dialog list: switch, create and delete conversations.

use egui::{self, RichText, ScrollArea, Vec2};

use chat_core::session::SessionSnapshot;
use chat_types::dialog::Dialog;

use crate::state::{UiAction, UiState};
use crate::theme::*;

pub fn dialogs_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: &SessionSnapshot,
) -> Option<UiAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Dialogs").color(TEXT_PRIMARY));
        if session.dialogs_loading {
            ui.spinner();
        } else if ui.small_button("⟳").on_hover_text("Reload").clicked() {
            action = Some(UiAction::RefreshDialogs);
        }
    });
    ui.separator();

    let new_chat = ui.add_sized(
        Vec2::new(ui.available_width(), 28.0),
        egui::Button::new(RichText::new("New chat").color(TEXT_PRIMARY))
            .fill(ACCENT)
            .corner_radius(PANEL_ROUNDING),
    );
    if new_chat.clicked() {
        action = Some(UiAction::StartNewDialog);
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let field = ui.add(
            egui::TextEdit::singleline(&mut state.new_dialog_title)
                .hint_text("Dialog title")
                .desired_width(ui.available_width() - 64.0),
        );
        let enter = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Create").clicked() || enter {
            // Blank titles are rejected by the session with a notice.
            // The field is cleared once the dialog exists.
            action = Some(UiAction::CreateDialog(state.new_dialog_title.trim().to_string()));
        }
    });

    ui.add_space(6.0);
    ui.separator();

    ScrollArea::vertical()
        .id_salt("dialog_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if session.dialogs.is_empty() && !session.dialogs_loading {
                ui.label(RichText::new("No dialogs yet").color(TEXT_SECONDARY).italics());
            }
            for dialog in &session.dialogs {
                let active = session.active_dialog_id.as_ref() == Some(&dialog.id);
                if let Some(a) = dialog_row(ui, dialog, active) {
                    action = Some(a);
                }
            }
        });

    action
}

fn dialog_row(ui: &mut egui::Ui, dialog: &Dialog, active: bool) -> Option<UiAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(if active { BG_SURFACE } else { BG_SECONDARY })
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    let title = ui.selectable_label(active, RichText::new(&dialog.title).color(TEXT_PRIMARY));
                    if title.clicked() && !active {
                        action = Some(UiAction::SelectDialog(dialog.id.clone()));
                    }
                    ui.label(RichText::new(dialog.updated_label()).color(TEXT_SECONDARY).small());
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("🗑").on_hover_text("Delete dialog").clicked() {
                        action = Some(UiAction::DeleteDialog(dialog.id.clone()));
                    }
                });
            });
        });
    ui.add_space(2.0);

    action
}
