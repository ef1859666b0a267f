//! FAQ panel — search with category filter and helpfulness feedback.

use egui::{self, RichText, ScrollArea, Vec2};
use crate::state::UiState;
use crate::theme::*;

pub enum FaqAction {
    Search,
    Feedback { faq_id: String, helpful: bool },
}

pub fn faq_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<FaqAction> {
    let mut action = None;
    let busy = state.faq.busy.is_busy();

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let input = egui::TextEdit::singleline(&mut state.faq.query)
                    .hint_text("Search frequently asked questions...")
                    .desired_width(ui.available_width() - 180.0);
                let response = ui.add(input);

                egui::ComboBox::from_id_salt("faq_category")
                    .selected_text(
                        state
                            .faq
                            .selected_category
                            .as_deref()
                            .unwrap_or("All categories"),
                    )
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_label(state.faq.selected_category.is_none(), "All categories")
                            .clicked()
                        {
                            state.faq.selected_category = None;
                        }
                        for category in state.faq.categories.clone() {
                            let selected =
                                state.faq.selected_category.as_deref() == Some(category.as_str());
                            if ui.selectable_label(selected, &category).clicked() {
                                state.faq.selected_category = Some(category);
                            }
                        }
                    });

                let search_enabled = !state.faq.query.trim().is_empty() && !busy;
                let btn = ui.add_enabled(
                    search_enabled,
                    egui::Button::new(RichText::new("Search").color(TEXT_PRIMARY))
                        .fill(if search_enabled { ACCENT } else { BG_SURFACE })
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(70.0, 0.0)),
                );
                if btn.clicked()
                    || (response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        && search_enabled)
                {
                    action = Some(FaqAction::Search);
                }
            });

            if let Some(error) = &state.faq.error {
                ui.label(RichText::new(error).color(ERROR).small());
            }

            if !state.faq.recent_searches.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new("Recent:").color(TEXT_SECONDARY).small());
                    for recent in state.faq.recent_searches.clone() {
                        if ui.small_button(&recent).clicked() {
                            state.faq.query = recent;
                            action = Some(FaqAction::Search);
                        }
                    }
                });
            }
        });

    ui.add_space(8.0);

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        for entry in &state.faq.results {
            egui::Frame::default()
                .fill(BG_SECONDARY)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(&entry.question).color(TEXT_PRIMARY).strong());
                    ui.label(RichText::new(&entry.answer).color(TEXT_PRIMARY));
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&entry.category).color(TEXT_SECONDARY).small());
                        if ui.small_button("Helpful").clicked() {
                            action = Some(FaqAction::Feedback {
                                faq_id: entry.id.clone(),
                                helpful: true,
                            });
                        }
                        if ui.small_button("Not helpful").clicked() {
                            action = Some(FaqAction::Feedback {
                                faq_id: entry.id.clone(),
                                helpful: false,
                            });
                        }
                    });
                });
            ui.add_space(4.0);
        }
    });

    action
}
