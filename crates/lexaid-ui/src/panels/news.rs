//! Legal news panel — paged feed plus push subscription.

use egui::{self, RichText, ScrollArea, Vec2};
use lexaid_types::api::ImpactLevel;
use crate::state::UiState;
use crate::theme::*;

pub enum NewsAction {
    LoadPage(u32),
    Subscribe,
}

pub fn news_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<NewsAction> {
    let mut action = None;
    let busy = state.news.busy.is_busy();

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.label(RichText::new("Subscribe to updates").color(ACCENT).strong());
            ui.label(
                RichText::new("Comma-separated legal areas, e.g. family_law, tax_law")
                    .color(TEXT_SECONDARY)
                    .small(),
            );
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut state.news.subscribed_areas);
                let btn = ui.add_enabled(
                    !busy,
                    egui::Button::new(RichText::new("Subscribe").color(TEXT_PRIMARY))
                        .fill(if busy { BG_SURFACE } else { ACCENT })
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(90.0, 0.0)),
                );
                if btn.clicked() {
                    action = Some(NewsAction::Subscribe);
                }
            });
            if state.news.subscription_confirmed {
                ui.label(RichText::new("Subscribed — live updates active").color(SUCCESS).small());
            }
            if let Some(error) = &state.news.error {
                ui.label(RichText::new(error).color(ERROR).small());
            }
        });

    ui.add_space(8.0);

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        for item in &state.news.items {
            let impact_color = match item.impact {
                ImpactLevel::High => ERROR,
                ImpactLevel::Medium => WARNING,
                ImpactLevel::Low => TEXT_SECONDARY,
            };
            egui::Frame::default()
                .fill(BG_SECONDARY)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&item.title).color(TEXT_PRIMARY).strong());
                        ui.label(
                            RichText::new(item.impact.label())
                                .color(impact_color)
                                .small(),
                        );
                    });
                    ui.label(RichText::new(&item.summary).color(TEXT_PRIMARY));
                    ui.label(
                        RichText::new(format!(
                            "{} · {} · {}",
                            item.source, item.jurisdiction, item.date
                        ))
                        .color(TEXT_SECONDARY)
                        .small(),
                    );
                    ui.hyperlink_to(RichText::new("Read more").small(), &item.url);
                });
            ui.add_space(4.0);
        }

        // Pager
        ui.horizontal(|ui| {
            if state.news.page > 1
                && ui.add_enabled(!busy, egui::Button::new("Previous")).clicked()
            {
                action = Some(NewsAction::LoadPage(state.news.page - 1));
            }
            ui.label(
                RichText::new(format!(
                    "Page {} of {}",
                    state.news.page.max(1),
                    state.news.total_pages.max(1)
                ))
                .color(TEXT_SECONDARY)
                .small(),
            );
            if state.news.page < state.news.total_pages
                && ui.add_enabled(!busy, egui::Button::new("Next")).clicked()
            {
                action = Some(NewsAction::LoadPage(state.news.page + 1));
            }
        });
    });

    action
}
