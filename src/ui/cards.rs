use crate::controller::Action;
use crate::theme::Theme;
use crate::ui::UiEvent;
use crate::view::{
    Badge, CardFace, FlipCard, ImpactMeter, LegalView, ResultView, RiskCard, SustainabilityView,
    Tone,
};
use eframe::egui::{self, RichText};

/// Controls drawn around the result cards.
pub struct ResultsChrome<'a> {
    pub languages: &'a [String],
    pub language: &'a str,
    pub show_language: bool,
    pub chat_open: bool,
    pub draft_copied: bool,
    /// Scopes flip state so a new result starts on the front faces.
    pub generation: u64,
}

pub fn render_results(
    ui: &mut egui::Ui,
    theme: &Theme,
    view: &ResultView,
    chrome: &ResultsChrome<'_>,
    emit: &mut dyn FnMut(UiEvent),
) {
    render_header(ui, theme, view, chrome, emit);
    ui.add_space(theme.spacing_12);

    match view {
        ResultView::Legal(legal) => render_legal(ui, theme, legal, chrome, emit),
        ResultView::Sustainability(report) => render_sustainability(ui, theme, report, chrome),
    }
}

fn render_header(
    ui: &mut egui::Ui,
    theme: &Theme,
    view: &ResultView,
    chrome: &ResultsChrome<'_>,
    emit: &mut dyn FnMut(UiEvent),
) {
    let header = view.header();
    ui.horizontal_wrapped(|ui| {
        egui::Frame::new()
            .fill(theme.accent_muted)
            .corner_radius(egui::CornerRadius::same(theme.radius_8))
            .inner_margin(egui::Margin::symmetric(theme.spacing_8 as i8, theme.spacing_4 as i8))
            .show(ui, |ui| {
                ui.label(RichText::new(&header.badge).color(theme.text_on_accent).size(12.0));
            });
        ui.heading(header.title);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.add(theme.subtle_button("New Analysis")).clicked() {
                emit(Action::Reset.into());
            }
            if !chrome.chat_open && ui.add(theme.subtle_button("💬 Ask about this")).clicked() {
                emit(Action::SetChatOpen(true).into());
            }

            if chrome.show_language {
                let mut selected = chrome.language.to_string();
                egui::ComboBox::from_id_salt("result_language")
                    .selected_text(selected.clone())
                    .show_ui(ui, |ui| {
                        for language in chrome.languages {
                            ui.selectable_value(&mut selected, language.clone(), language);
                        }
                    });
                if selected != chrome.language {
                    emit(Action::ChangeResultLanguage(selected).into());
                }
                ui.label(RichText::new("Language").color(theme.text_muted).size(12.0));
            }
        });
    });
}

fn section(ui: &mut egui::Ui, theme: &Theme, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(title).color(theme.text_primary).size(15.0).strong());
        ui.add_space(theme.spacing_8);
        add_contents(ui);
    });
    ui.add_space(theme.spacing_12);
}

fn numbered(ui: &mut egui::Ui, theme: &Theme, items: &[String]) {
    for (index, item) in items.iter().enumerate() {
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(format!("{}.", index + 1)).color(theme.accent_primary));
            ui.label(item);
        });
    }
}

fn render_legal(
    ui: &mut egui::Ui,
    theme: &Theme,
    legal: &LegalView,
    chrome: &ResultsChrome<'_>,
    emit: &mut dyn FnMut(UiEvent),
) {
    section(ui, theme, "📝 Summary", |ui| {
        ui.label(&legal.summary);
    });

    if !legal.key_points.is_empty() {
        section(ui, theme, "🔑 Key Points", |ui| numbered(ui, theme, &legal.key_points));
    }

    if !legal.risks.is_empty() {
        section(ui, theme, "⚠️ Risks & Deadlines", |ui| {
            for risk in &legal.risks {
                risk_card(ui, theme, risk);
                ui.add_space(theme.spacing_4);
            }
        });
    }

    if !legal.actions.is_empty() {
        section(ui, theme, "✅ Recommended Actions", |ui| {
            numbered(ui, theme, &legal.actions)
        });
    }

    if let Some(draft) = &legal.draft_reply {
        section(ui, theme, "✉️ Draft Reply", |ui| {
            egui::Frame::new()
                .fill(theme.surface_3)
                .corner_radius(egui::CornerRadius::same(theme.radius_8))
                .inner_margin(egui::Margin::same(theme.spacing_8 as i8))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new(draft).monospace());
                });
            let label = if chrome.draft_copied { "Copied!" } else { "📋 Copy" };
            if ui.add(theme.subtle_button(label)).clicked() {
                emit(UiEvent::CopyDraft(draft.clone()));
            }
        });
    }

    theme.tone_frame(Tone::Neutral).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(&legal.disclaimer).color(theme.text_muted).size(12.0));
    });
}

fn risk_card(ui: &mut egui::Ui, theme: &Theme, risk: &RiskCard) {
    let (_, accent) = theme.tone_colors(risk.tone);
    theme.tone_frame(risk.tone).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(&risk.severity).color(accent).size(12.0).strong());
        ui.label(&risk.description);
        if let Some(deadline) = &risk.deadline {
            ui.label(RichText::new(deadline).color(theme.text_muted).size(12.0));
        }
    });
}

fn render_sustainability(
    ui: &mut egui::Ui,
    theme: &Theme,
    report: &SustainabilityView,
    chrome: &ResultsChrome<'_>,
) {
    section(ui, theme, "🌍 Environmental Impact", |ui| {
        impact_meter(ui, theme, &report.meter)
    });

    if !report.harmful.is_empty() {
        section(ui, theme, "⚠️ Harmful Items Found", |ui| {
            ui.label(RichText::new(&report.harmful_summary).color(theme.text_muted));
            ui.add_space(theme.spacing_8);
            card_grid(ui, theme, "harmful", &report.harmful, chrome.generation);
        });
    }

    if !report.good_choices.is_empty() {
        section(ui, theme, "✅ Good Choices Found", |ui| {
            ui.horizontal_wrapped(|ui| {
                for badge in &report.good_choices {
                    good_badge(ui, theme, badge);
                }
            });
        });
    }

    if !report.alternatives.is_empty() {
        section(ui, theme, "✅ Recommended Sustainable Alternatives", |ui| {
            ui.label(RichText::new(&report.beneficial_summary).color(theme.text_muted));
            ui.add_space(theme.spacing_8);
            card_grid(ui, theme, "alternative", &report.alternatives, chrome.generation);
        });
    }

    if let Some(fact) = &report.fun_fact {
        theme.tone_frame(Tone::Green).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(format!("💡 {fact}")).italics());
        });
    }
}

fn impact_meter(ui: &mut egui::Ui, theme: &Theme, meter: &ImpactMeter) {
    ui.add(
        egui::ProgressBar::new(meter.fraction())
            .fill(theme.meter_color(meter.percent))
            .text(format!("{}%", meter.percent))
            .desired_height(18.0),
    );
    ui.add_space(theme.spacing_4);
    ui.label(&meter.description);
}

fn good_badge(ui: &mut egui::Ui, theme: &Theme, badge: &Badge) {
    theme.tone_frame(Tone::Green).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(&badge.icon);
            ui.label(RichText::new(&badge.title).strong());
            if !badge.praise.is_empty() {
                ui.label(RichText::new(&badge.praise).color(theme.text_muted).size(12.0));
            }
        });
    });
}

fn card_grid(ui: &mut egui::Ui, theme: &Theme, group: &str, cards: &[FlipCard], generation: u64) {
    ui.horizontal_wrapped(|ui| {
        for (index, card) in cards.iter().enumerate() {
            flip_card(ui, theme, card, flip_card_id(group, generation, index));
        }
    });
}

fn flip_card_id(group: &str, generation: u64, index: usize) -> egui::Id {
    egui::Id::new(("flip_card", group, generation, index))
}

fn card_face(ctx: &egui::Context, id: egui::Id) -> CardFace {
    ctx.data_mut(|data| data.get_temp(id)).unwrap_or_default()
}

fn flip(ctx: &egui::Context, id: egui::Id) {
    let face = card_face(ctx, id).flipped();
    ctx.data_mut(|data| data.insert_temp(id, face));
}

/// One card whose face is kept in egui memory under `id`.
fn flip_card(ui: &mut egui::Ui, theme: &Theme, card: &FlipCard, id: egui::Id) {
    let face = card_face(ui.ctx(), id);
    let (_, accent) = theme.tone_colors(card.tone);

    let response = theme
        .tone_frame(card.tone)
        .show(ui, |ui| {
            ui.style_mut().interaction.selectable_labels = false;
            ui.set_width(theme.card_width);
            ui.set_min_height(theme.card_height);
            ui.vertical(|ui| match face {
                CardFace::Front => {
                    if let Some(category) = &card.category {
                        ui.label(RichText::new(category.to_uppercase()).color(accent).size(11.0));
                    }
                    ui.label(RichText::new(&card.icon).size(28.0));
                    ui.label(RichText::new(&card.title).strong().size(15.0));
                    for line in &card.front {
                        ui.label(line);
                    }
                    ui.add_space(theme.spacing_4);
                    ui.label(
                        RichText::new("Click for details ↻")
                            .color(theme.text_muted)
                            .size(11.0),
                    );
                }
                CardFace::Back => {
                    ui.label(RichText::new(card.back_heading).strong());
                    for field in &card.back {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(RichText::new(format!("{}:", field.label)).strong());
                            ui.label(&field.value);
                        });
                    }
                    ui.add_space(theme.spacing_4);
                    ui.label(
                        RichText::new("Click to return ↻")
                            .color(theme.text_muted)
                            .size(11.0),
                    );
                }
            });
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);

    if response.clicked() {
        flip(ui.ctx(), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_flip_independently() {
        let ctx = egui::Context::default();
        let first = flip_card_id("harmful", 1, 0);
        let second = flip_card_id("harmful", 1, 1);
        let other_group = flip_card_id("alternative", 1, 0);

        flip(&ctx, first);
        assert_eq!(card_face(&ctx, first), CardFace::Back);
        assert_eq!(card_face(&ctx, second), CardFace::Front);
        assert_eq!(card_face(&ctx, other_group), CardFace::Front);

        flip(&ctx, second);
        flip(&ctx, first);
        assert_eq!(card_face(&ctx, first), CardFace::Front);
        assert_eq!(card_face(&ctx, second), CardFace::Back);
    }

    #[test]
    fn new_results_start_on_front_faces() {
        let ctx = egui::Context::default();
        flip(&ctx, flip_card_id("harmful", 1, 0));
        assert_eq!(card_face(&ctx, flip_card_id("harmful", 2, 0)), CardFace::Front);
    }
}
