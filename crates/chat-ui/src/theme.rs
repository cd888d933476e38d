//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

use chat_types::{event::NoticeLevel, message::Role};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(22, 24, 29);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(34, 37, 44);
pub const BG_SURFACE: Color32 = Color32::from_rgb(48, 52, 61);
pub const BG_USER_BUBBLE: Color32 = Color32::from_rgb(40, 52, 86);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(229, 231, 235);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 163, 175);
pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const INFO: Color32 = Color32::from_rgb(56, 189, 248);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const BUBBLE_ROUNDING: CornerRadius = CornerRadius::same(10);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Success => SUCCESS,
        NoticeLevel::Info => INFO,
        NoticeLevel::Warning => WARNING,
        NoticeLevel::Error => ERROR,
    }
}

/// Label color and bubble fill for a transcript entry.
pub fn role_style(role: Role) -> (Color32, Color32) {
    match role {
        Role::User => (ACCENT, BG_USER_BUBBLE),
        Role::Assistant => (SUCCESS, BG_SECONDARY),
        Role::System => (TEXT_SECONDARY, BG_SURFACE),
    }
}

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_SECONDARY;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.35);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
