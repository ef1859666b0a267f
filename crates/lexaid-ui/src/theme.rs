//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};
use lexaid_types::config::Theme;

pub const BG_PRIMARY: Color32 = Color32::from_rgb(22, 25, 31);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(33, 38, 46);
pub const BG_SURFACE: Color32 = Color32::from_rgb(46, 52, 62);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(226, 229, 233);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(152, 160, 172);
pub const ACCENT: Color32 = Color32::from_rgb(191, 155, 82);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);

/// Apply the selected theme to an egui context
pub fn apply_theme(ctx: &egui::Context, theme: &Theme) {
    match theme {
        Theme::Dark => apply_dark(ctx),
        Theme::Light => apply_light(ctx),
    }
}

fn apply_dark(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = true;
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_SECONDARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}

fn apply_light(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);
    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
