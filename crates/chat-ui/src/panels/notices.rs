//! Transient notices stacked in the top-right corner.

use egui::{self, Align2, RichText};

use crate::state::UiState;
use crate::theme::*;

pub fn notices_overlay(ctx: &egui::Context, state: &mut UiState) {
    if state.notices.is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notices"))
        .anchor(Align2::RIGHT_TOP, egui::vec2(-12.0, 48.0))
        .show(ctx, |ui| {
            ui.set_max_width(320.0);
            for shown in &state.notices {
                let color = notice_color(shown.notice.level);
                egui::Frame::default()
                    .fill(BG_SECONDARY)
                    .stroke(egui::Stroke::new(1.0, color))
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&shown.notice.text).color(color));
                            if ui.small_button("✕").clicked() {
                                dismissed = Some(shown.notice.id.clone());
                            }
                        });
                    });
                ui.add_space(4.0);
            }
        });

    if let Some(id) = dismissed {
        state.dismiss(&id);
    }
}
