//! Settings panel — theme, language, jurisdiction, privacy, API base.
//! Includes an explicit Save button with visual feedback.

use egui::{self, RichText, Vec2};
use lexaid_types::config::{ClientConfig, Preferences, Theme};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed (apply immediately)
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    prefs: &mut Preferences,
    config: &mut ClientConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Appearance ───────────────────────────────────
            ui.label(RichText::new("Appearance").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Theme").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("pref_theme")
                .selected_text(prefs.theme.label())
                .show_ui(ui, |ui| {
                    for theme in Theme::all() {
                        if ui
                            .selectable_value(&mut prefs.theme, theme.clone(), theme.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);

            // ── Locale ───────────────────────────────────────
            ui.label(RichText::new("Locale").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Language").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut prefs.language).changed() {
                changed = true;
            }

            ui.label(RichText::new("Jurisdiction").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut prefs.jurisdiction).changed() {
                changed = true;
            }

            ui.add_space(4.0);

            // ── Privacy ──────────────────────────────────────
            ui.label(RichText::new("Privacy").color(ACCENT).strong());
            ui.add_space(2.0);

            if ui
                .checkbox(
                    &mut prefs.privacy.store_history_locally,
                    "Keep chat history in this browser",
                )
                .changed()
            {
                changed = true;
            }
            if ui
                .checkbox(
                    &mut prefs.privacy.redact_pii,
                    "Redact personal data before analysis",
                )
                .changed()
            {
                changed = true;
            }

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Backend ──────────────────────────────────────
            ui.label(RichText::new("Backend").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("API base URL").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut config.api.base_url).changed() {
                changed = true;
            }

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(
                        RichText::new("Save Settings").color(TEXT_PRIMARY).strong(),
                    )
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}
