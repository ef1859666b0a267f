//! Chat panel — displays the conversation and input field.

use egui::{self, Align, Color32, Layout, RichText, ScrollArea, Vec2};
use crate::state::UiState;
use crate::theme::*;

pub enum ChatAction {
    Send(String),
    Summarize,
}

/// Render the chat panel. Returns an action when the user submits input
/// or asks for a conversation summary.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<ChatAction> {
    let mut submitted = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    ui.heading(
                        RichText::new("Legal Assistant")
                            .color(TEXT_PRIMARY)
                            .strong(),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let color = if state.reachable { SUCCESS } else { ERROR };
                        ui.label(RichText::new("●").color(color).small());
                        ui.label(
                            RichText::new(&state.status_text)
                                .color(TEXT_SECONDARY)
                                .small(),
                        );
                        if !state.chat.entries.is_empty()
                            && !state.chat.busy.is_busy()
                            && ui.small_button("Summarize").clicked()
                        {
                            submitted = Some(ChatAction::Summarize);
                        }
                    });
                });

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 80.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in &state.chat.entries {
                            render_message(ui, entry);
                            ui.add_space(4.0);
                        }
                    });

                // Inline banner after a failed send
                if let Some(notice) = &state.chat.notice {
                    egui::Frame::default()
                        .fill(Color32::from_rgb(50, 20, 20))
                        .corner_radius(PANEL_ROUNDING)
                        .inner_margin(8.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new(notice).color(ERROR).small());
                        });
                }

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.chat.input_text)
                        .hint_text("Describe your legal question...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));

                    let response = ui.add(input);

                    let send_enabled =
                        !state.chat.input_text.trim().is_empty() && !state.chat.busy.is_busy();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    if (response.lost_focus()
                        && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        && send_enabled)
                        || send_btn.clicked()
                    {
                        let text = state.chat.input_text.trim().to_string();
                        state.push_user_message(&text);
                        submitted = Some(ChatAction::Send(text));
                        state.chat.input_text.clear();
                        response.request_focus();
                    }
                });
            });
        });

    submitted
}

fn render_message(ui: &mut egui::Ui, entry: &crate::state::ChatEntry) {
    let (label, label_color, bg) = match entry.role.as_str() {
        "user" => ("You", ACCENT, BG_SECONDARY),
        "assistant" => ("Assistant", SUCCESS, BG_SECONDARY),
        "system" => ("Notice", WARNING, BG_SURFACE),
        _ => ("???", TEXT_SECONDARY, BG_SECONDARY),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(label).color(label_color).strong().small());
                if !entry.timestamp.is_empty() {
                    ui.label(
                        RichText::new(&entry.timestamp)
                            .color(TEXT_SECONDARY)
                            .small(),
                    );
                }
            });
            ui.label(RichText::new(&entry.content).color(TEXT_PRIMARY));
        });
}
