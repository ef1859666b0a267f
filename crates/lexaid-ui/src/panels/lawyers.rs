//! Lawyer matching panel — search, availability, booking.

use egui::{self, RichText, ScrollArea, Vec2};
use crate::state::UiState;
use crate::theme::*;

pub enum LawyerAction {
    Match,
    LoadSlots(String),
    Book,
    CancelBooking,
}

pub fn lawyers_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<LawyerAction> {
    let mut action = None;
    let busy = state.lawyers.busy.is_busy();

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(PANEL_PADDING)
            .show(ui, |ui| {
                ui.label(RichText::new("Describe your legal issue").color(ACCENT).strong());
                ui.add(
                    egui::TextEdit::multiline(&mut state.lawyers.issue)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY)
                        .hint_text("e.g. custody arrangement after a relocation"),
                );
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Jurisdiction").color(TEXT_SECONDARY).small());
                    ui.text_edit_singleline(&mut state.lawyers.jurisdiction);
                    let btn = ui.add_enabled(
                        !busy,
                        egui::Button::new(RichText::new("Find lawyers").color(TEXT_PRIMARY))
                            .fill(if busy { BG_SURFACE } else { ACCENT })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(100.0, 0.0)),
                    );
                    if btn.clicked() {
                        action = Some(LawyerAction::Match);
                    }
                });
                if let Some(error) = &state.lawyers.error {
                    ui.label(RichText::new(error).color(ERROR).small());
                }
            });

        ui.add_space(8.0);

        // Matches, best score first
        for lawyer in &state.lawyers.results {
            let selected = state.lawyers.selected_lawyer.as_deref() == Some(lawyer.id.as_str());
            egui::Frame::default()
                .fill(if selected { BG_SURFACE } else { BG_SECONDARY })
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&lawyer.name).color(TEXT_PRIMARY).strong());
                        ui.label(
                            RichText::new(format!("{}% match", lawyer.match_score))
                                .color(ACCENT)
                                .small(),
                        );
                        ui.label(
                            RichText::new(format!("★ {:.1}", lawyer.rating))
                                .color(WARNING)
                                .small(),
                        );
                    });
                    ui.label(
                        RichText::new(format!(
                            "{} · {} years · {}",
                            lawyer.specialties.join(", "),
                            lawyer.experience_years,
                            lawyer.languages.join(", ")
                        ))
                        .color(TEXT_SECONDARY)
                        .small(),
                    );
                    if ui
                        .add_enabled(!busy, egui::Button::new("See availability"))
                        .clicked()
                    {
                        state.lawyers.selected_lawyer = Some(lawyer.id.clone());
                        action = Some(LawyerAction::LoadSlots(lawyer.id.clone()));
                    }
                });
            ui.add_space(4.0);
        }

        // Booking form once slots are loaded
        if !state.lawyers.slots.is_empty() {
            egui::Frame::default()
                .fill(BG_SECONDARY)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(PANEL_PADDING)
                .show(ui, |ui| {
                    ui.label(RichText::new("Book an appointment").color(ACCENT).strong());

                    for day in &state.lawyers.slots {
                        ui.label(RichText::new(&day.date).color(TEXT_SECONDARY).small());
                        ui.horizontal_wrapped(|ui| {
                            for time in &day.times {
                                let picked = state.lawyers.booking_date == *day.date
                                    && state.lawyers.booking_time == *time;
                                if ui.selectable_label(picked, time).clicked() {
                                    state.lawyers.booking_date = day.date.clone();
                                    state.lawyers.booking_time = time.clone();
                                }
                            }
                        });
                    }

                    ui.label(
                        RichText::new("What do you want to discuss? *")
                            .color(TEXT_SECONDARY)
                            .small(),
                    );
                    ui.text_edit_singleline(&mut state.lawyers.booking_issue);

                    let btn = ui.add_enabled(
                        !busy,
                        egui::Button::new(RichText::new("Book").color(TEXT_PRIMARY))
                            .fill(if busy { BG_SURFACE } else { ACCENT })
                            .corner_radius(PANEL_ROUNDING),
                    );
                    if btn.clicked() {
                        action = Some(LawyerAction::Book);
                    }

                    if let Some(confirmation) = &state.lawyers.confirmation {
                        ui.label(
                            RichText::new(format!(
                                "Confirmed with {} on {} at {}",
                                confirmation.lawyer_name, confirmation.date, confirmation.time
                            ))
                            .color(SUCCESS)
                            .small(),
                        );
                        if ui.add_enabled(!busy, egui::Button::new("Cancel")).clicked() {
                            action = Some(LawyerAction::CancelBooking);
                        }
                    }
                });
        }
    });

    action
}
