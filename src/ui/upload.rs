use crate::controller::Action;
use crate::session::{Mode, SelectedFile};
use crate::theme::Theme;
use crate::ui::UiEvent;
use eframe::egui::{self, RichText};

pub struct UploadForm<'a> {
    pub mode: Mode,
    pub selected_file: Option<&'a SelectedFile>,
    pub habit_text: &'a str,
    pub languages: &'a [String],
    pub language: &'a str,
    pub show_language: bool,
    pub can_submit: bool,
    /// A file is being dragged over the window.
    pub drop_hover: bool,
}

struct UploadCopy {
    title: &'static str,
    subtitle: &'static str,
    submit: &'static str,
}

fn copy(mode: Mode) -> UploadCopy {
    match mode {
        Mode::Legal => UploadCopy {
            title: "Analyze Legal Documents",
            subtitle: "Upload court notices or legal letters to get a simplified explanation.",
            submit: "Analyze Document",
        },
        Mode::Sustainability => UploadCopy {
            title: "Track Your Impact",
            subtitle: "Upload a receipt or describe your habits below",
            submit: "Analyze Impact",
        },
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KIB * KIB {
        format!("{:.1} KB", bytes / KIB)
    } else {
        format!("{:.2} MB", bytes / (KIB * KIB))
    }
}

pub fn render_upload(
    ui: &mut egui::Ui,
    theme: &Theme,
    form: &UploadForm<'_>,
    emit: &mut dyn FnMut(UiEvent),
) {
    let copy = copy(form.mode);

    theme.card_frame().show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.heading(copy.title);
        ui.label(RichText::new(copy.subtitle).color(theme.text_muted));
        ui.add_space(theme.spacing_12);

        let drop_fill = if form.drop_hover {
            theme.green_tint
        } else {
            theme.surface_3
        };
        egui::Frame::new()
            .fill(drop_fill)
            .stroke(theme_stroke(theme, form.drop_hover))
            .corner_radius(egui::CornerRadius::same(theme.radius_10))
            .inner_margin(egui::Margin::same(theme.spacing_24 as i8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📄").size(32.0));
                    ui.label("Drop a file here or");
                    if ui.add(theme.subtle_button("Browse files")).clicked() {
                        emit(UiEvent::PickFile);
                    }
                    ui.label(
                        RichText::new("PDF, PNG, JPG or WEBP, up to 16MB")
                            .color(theme.text_muted)
                            .size(12.0),
                    );
                });
            });

        if let Some(file) = form.selected_file {
            ui.add_space(theme.spacing_8);
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("📎 {}", file.name)).strong());
                ui.label(RichText::new(format_size(file.size)).color(theme.text_muted));
                if ui.small_button("✕").on_hover_text("Remove file").clicked() {
                    emit(Action::RemoveFile.into());
                }
            });
        }

        if form.mode == Mode::Sustainability {
            ui.add_space(theme.spacing_12);
            ui.label(RichText::new("Or describe your habits").color(theme.text_muted));
            let mut text = form.habit_text.to_string();
            let response = ui.add(
                egui::TextEdit::multiline(&mut text)
                    .id_salt("habit_text")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY)
                    .hint_text("e.g. I drive 50km to work daily and use plastic bags for groceries"),
            );
            if response.changed() {
                emit(Action::SetHabitText(text).into());
            }
        }

        ui.add_space(theme.spacing_12);
        ui.horizontal(|ui| {
            if form.show_language {
                ui.label(RichText::new("Language").color(theme.text_muted));
                let mut selected = form.language.to_string();
                egui::ComboBox::from_id_salt("upload_language")
                    .selected_text(selected.clone())
                    .show_ui(ui, |ui| {
                        for language in form.languages {
                            ui.selectable_value(&mut selected, language.clone(), language);
                        }
                    });
                if selected != form.language {
                    emit(Action::SetLanguage(selected).into());
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(form.can_submit, theme.primary_button(copy.submit))
                    .clicked()
                {
                    emit(Action::Submit.into());
                }
            });
        });
    });
}

fn theme_stroke(theme: &Theme, highlighted: bool) -> egui::Stroke {
    if highlighted {
        egui::Stroke::new(1.5, theme.success)
    } else {
        egui::Stroke::new(1.0, theme.border_subtle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "0.5 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.00 MB");
    }

    #[test]
    fn copy_follows_mode() {
        assert_eq!(copy(Mode::Legal).submit, "Analyze Document");
        assert_eq!(copy(Mode::Sustainability).title, "Track Your Impact");
    }
}
