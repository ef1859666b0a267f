//! Documents panel — analysis, template-driven generation, monitoring.

use egui::{self, RichText, ScrollArea, Vec2};
use crate::state::UiState;
use crate::theme::*;

/// What the app layer should dispatch after rendering
pub enum DocumentAction {
    Analyze,
    Generate,
    Monitor,
    CheckUpdates,
}

pub fn documents_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<DocumentAction> {
    let mut action = None;
    let busy = state.documents.busy.is_busy();

    ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        // ── Analyze ──────────────────────────────────────────
        section(ui, "Analyze a document", |ui| {
            ui.label(
                RichText::new("Paste the document text")
                    .color(TEXT_SECONDARY)
                    .small(),
            );
            ui.add(
                egui::TextEdit::multiline(&mut state.documents.analyze_text)
                    .desired_rows(6)
                    .desired_width(f32::INFINITY)
                    .hint_text("Full text of the contract, lease, notice..."),
            );

            ui.horizontal(|ui| {
                ui.label(RichText::new("Type").color(TEXT_SECONDARY).small());
                ui.text_edit_singleline(&mut state.documents.analyze_type);
                if submit_button(ui, "Analyze", busy).clicked() {
                    action = Some(DocumentAction::Analyze);
                }
            });

            if let Some(analysis) = &state.documents.analysis {
                result_frame(ui, &analysis.analysis);
            }
        });

        ui.add_space(10.0);

        // ── Generate ─────────────────────────────────────────
        section(ui, "Generate a document", |ui| {
            let selected_name = state
                .documents
                .selected_template()
                .map(|t| t.name.clone())
                .unwrap_or_default();

            let mut switch_to = None;
            egui::ComboBox::from_id_salt("document_template")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    for (i, template) in state.documents.templates.iter().enumerate() {
                        if ui
                            .selectable_label(i == state.documents.selected_template, &template.name)
                            .clicked()
                        {
                            switch_to = Some(i);
                        }
                    }
                });
            if let Some(i) = switch_to {
                state.documents.select_template(i);
            }

            ui.add_space(4.0);

            // One labelled input per template field, required ones marked
            let params: Vec<(String, bool, String)> = state
                .documents
                .selected_template()
                .map(|t| {
                    t.parameters
                        .iter()
                        .map(|p| (p.name.clone(), p.required, p.description.clone()))
                        .collect()
                })
                .unwrap_or_default();

            for (name, required, description) in params {
                let label = if required {
                    format!("{} *", description)
                } else {
                    description
                };
                ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
                let value = state.documents.field_values.entry(name).or_default();
                ui.text_edit_singleline(value);
                ui.add_space(2.0);
            }

            if let Some(error) = &state.documents.error {
                ui.label(RichText::new(error).color(ERROR).small());
            }

            if submit_button(ui, "Generate", busy).clicked() {
                action = Some(DocumentAction::Generate);
            }

            if let Some(generated) = &state.documents.generated {
                result_frame(ui, &generated.content);
            }
        });

        ui.add_space(10.0);

        // ── Monitor ──────────────────────────────────────────
        section(ui, "Monitor for legal changes", |ui| {
            ui.label(
                RichText::new("Register the analyzed document under an id")
                    .color(TEXT_SECONDARY)
                    .small(),
            );
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut state.documents.monitor_id);
                if submit_button(ui, "Monitor", busy).clicked() {
                    action = Some(DocumentAction::Monitor);
                }
            });
            if let Some(confirmation) = &state.documents.monitor_confirmation {
                ui.label(RichText::new(confirmation).color(SUCCESS).small());
                if submit_button(ui, "Check for updates", busy).clicked() {
                    action = Some(DocumentAction::CheckUpdates);
                }
            }
            for note in &state.documents.update_notes {
                ui.label(RichText::new(format!("• {}", note)).color(TEXT_PRIMARY).small());
            }
        });
    });

    action
}

fn section(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.label(RichText::new(title).color(ACCENT).strong());
            ui.add_space(4.0);
            add_contents(ui);
        });
}

fn submit_button(ui: &mut egui::Ui, label: &str, busy: bool) -> egui::Response {
    ui.add_enabled(
        !busy,
        egui::Button::new(RichText::new(label).color(TEXT_PRIMARY))
            .fill(if busy { BG_SURFACE } else { ACCENT })
            .corner_radius(PANEL_ROUNDING)
            .min_size(Vec2::new(80.0, 0.0)),
    )
}

fn result_frame(ui: &mut egui::Ui, text: &str) {
    ui.add_space(6.0);
    egui::Frame::default()
        .fill(BG_SURFACE)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(TEXT_PRIMARY));
        });
}
