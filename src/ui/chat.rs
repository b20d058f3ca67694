use crate::chat::{ChatMessage, ChatPanel, Role};
use crate::controller::Action;
use crate::theme::Theme;
use crate::ui::UiEvent;
use crate::view::markup::{self, LineKind};
use eframe::egui::{self, Align, Layout, RichText, ScrollArea};

pub fn render_chat(
    ui: &mut egui::Ui,
    theme: &Theme,
    panel: &ChatPanel,
    input: &mut String,
    scroll_to_bottom: bool,
    emit: &mut dyn FnMut(UiEvent),
) {
    ui.horizontal(|ui| {
        ui.heading("AI Assistant");
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.small_button("✕").on_hover_text("Close chat").clicked() {
                emit(Action::SetChatOpen(false).into());
            }
        });
    });
    ui.separator();

    let transcript_height = (ui.available_height() - 70.0).max(120.0);
    ScrollArea::vertical()
        .id_salt("chat_transcript")
        .max_height(transcript_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in panel.transcript() {
                render_message(ui, theme, message);
                ui.add_space(theme.spacing_4);
            }
            if scroll_to_bottom {
                ui.scroll_to_cursor(Some(Align::BOTTOM));
            }
        });

    ui.separator();
    let mut send_now = false;
    theme.composer_frame().show(ui, |ui| {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(input)
                    .desired_width(ui.available_width() - 70.0)
                    .hint_text("Ask a follow-up question..."),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
            }
            let clicked = ui
                .add_enabled(!input.trim().is_empty(), theme.primary_button("Send"))
                .clicked();
            send_now |= clicked;
        });
    });

    if send_now && !input.trim().is_empty() {
        emit(Action::SendChat(std::mem::take(input)).into());
    }
}

fn render_message(ui: &mut egui::Ui, theme: &Theme, message: &ChatMessage) {
    let (fill, layout) = match message.role {
        Role::User => (theme.accent_muted, Layout::right_to_left(Align::Min)),
        Role::Assistant => (theme.surface_3, Layout::left_to_right(Align::Min)),
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(theme.radius_10))
            .inner_margin(egui::Margin::symmetric(theme.spacing_12 as i8, theme.spacing_8 as i8))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.85);
                if message.is_pending() {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new(message.text()).color(theme.text_muted).italics());
                    });
                    return;
                }
                match message.role {
                    // User text is shown exactly as typed.
                    Role::User => {
                        ui.label(RichText::new(message.text()).color(theme.text_on_accent));
                    }
                    Role::Assistant => render_markup(ui, message.text()),
                }
            });
    });
}

fn render_markup(ui: &mut egui::Ui, text: &str) {
    ui.vertical(|ui| {
        ui.spacing_mut().item_spacing.y = 2.0;
        for line in markup::parse(text) {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                if line.spans.is_empty() {
                    ui.label(" ");
                    return;
                }
                if line.kind == LineKind::Bullet {
                    ui.label("• ");
                }
                for span in &line.spans {
                    let mut rich = RichText::new(&span.text);
                    if span.bold {
                        rich = rich.strong();
                    }
                    if span.italic {
                        rich = rich.italics();
                    }
                    ui.label(rich);
                }
            });
        }
    });
}
