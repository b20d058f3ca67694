use crate::api::{Dispatcher, HealthStatus};
use crate::controller::{Action, Controller, Effect, ViewState};
use crate::error::AnalysisError;
use crate::event::AppEvent;
use crate::session::validation::{describe_path, ACCEPTED_EXTENSIONS};
use crate::session::Mode;
use crate::theme::Theme;
use crate::ui::cards::{render_results, ResultsChrome};
use crate::ui::chat::render_chat;
use crate::ui::upload::{render_upload, UploadForm};
use crate::ui::UiEvent;
use crate::view;
use eframe::egui::{self, Color32, RichText, ScrollArea};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const DIAGNOSTICS_CAPACITY: usize = 200;
const COPIED_FLASH: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
enum BackendHealth {
    Checking,
    Ready,
    Unconfigured,
    Unreachable,
}

impl BackendHealth {
    fn from_outcome(outcome: &Result<HealthStatus, AnalysisError>) -> Self {
        match outcome {
            Ok(status) if status.groq_configured => Self::Ready,
            Ok(_) => Self::Unconfigured,
            Err(_) => Self::Unreachable,
        }
    }
}

pub struct CivicApp {
    rx: Receiver<AppEvent>,
    dispatcher: Dispatcher,
    controller: Controller,
    theme: Theme,
    backend_url: String,
    health: BackendHealth,
    chat_input: String,
    notice: Option<String>,
    copied_at: Option<Instant>,
    diagnostics_log: VecDeque<String>,
    scroll_chat: bool,
}

impl CivicApp {
    pub fn new(
        rx: Receiver<AppEvent>,
        dispatcher: Dispatcher,
        controller: Controller,
        backend_url: String,
    ) -> Self {
        let mut app = Self {
            rx,
            dispatcher,
            controller,
            theme: Theme::default(),
            backend_url,
            health: BackendHealth::Checking,
            chat_input: String::new(),
            notice: None,
            copied_at: None,
            diagnostics_log: VecDeque::with_capacity(DIAGNOSTICS_CAPACITY),
            scroll_chat: false,
        };
        app.log_diagnostic(format!("backend: {}", app.backend_url));
        app.dispatcher.probe_health();
        app
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        if self.diagnostics_log.len() == DIAGNOSTICS_CAPACITY {
            self.diagnostics_log.pop_front();
        }
        self.diagnostics_log
            .push_back(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn health_label(&self) -> (&'static str, Color32) {
        match self.health {
            BackendHealth::Checking => ("Checking backend...", self.theme.text_muted),
            BackendHealth::Ready => ("Backend ready", self.theme.success),
            BackendHealth::Unconfigured => ("Backend missing API key", self.theme.warning),
            BackendHealth::Unreachable => ("Backend unreachable", self.theme.danger),
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => self.apply_event(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        if let AppEvent::HealthChecked(outcome) = &event {
            self.health = BackendHealth::from_outcome(outcome);
            let line = match outcome {
                Ok(status) => format!(
                    "health: {} (groq configured: {})",
                    status.status.as_deref().unwrap_or("unknown"),
                    status.groq_configured
                ),
                Err(err) => format!("health check failed: {err}"),
            };
            self.log_diagnostic(line);
            return;
        }

        if Self::lost_backend(&event) && self.health != BackendHealth::Unreachable {
            self.health = BackendHealth::Unreachable;
            self.log_diagnostic("backend unreachable during request");
        }

        if let Some(action) = Action::from_event(event) {
            self.dispatch(action);
        }
    }

    fn lost_backend(event: &AppEvent) -> bool {
        match event {
            AppEvent::AnalysisFinished { outcome: Err(err), .. }
            | AppEvent::ChatFinished { outcome: Err(err), .. } => err.is_transport(),
            _ => false,
        }
    }

    fn dispatch(&mut self, action: Action) {
        let effects = self.controller.reduce(action);
        for effect in effects {
            self.perform(effect);
        }
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::Dispatch { ticket, request } => {
                self.log_diagnostic(format!("request #{ticket}: {}", request.kind()));
                self.dispatcher.execute(ticket, request);
            }
            Effect::Notice(message) => {
                self.log_diagnostic(format!("notice: {message}"));
                self.notice = Some(message);
            }
            Effect::ScrollChatToBottom => self.scroll_chat = true,
        }
    }

    fn handle_ui_event(&mut self, event: UiEvent, ctx: &egui::Context) {
        match event {
            UiEvent::Controller(action) => self.dispatch(action),
            UiEvent::PickFile => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Documents and images", &ACCEPTED_EXTENSIONS)
                    .pick_file()
                {
                    self.accept_path(path);
                }
            }
            UiEvent::CopyDraft(text) => {
                ctx.copy_text(text);
                self.copied_at = Some(Instant::now());
                ctx.request_repaint_after(COPIED_FLASH);
            }
            UiEvent::DismissNotice => self.notice = None,
        }
    }

    fn accept_path(&mut self, path: PathBuf) {
        info!(path = %path.display(), "file chosen");
        let action = match describe_path(&path) {
            Ok(file) => Action::SelectFile(file),
            Err(err) => Action::FileUnreadable(err),
        };
        self.dispatch(action);
    }

    fn intake_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        let Some(path) = dropped.into_iter().find_map(|file| file.path) else {
            return;
        };
        if self.controller.view() != ViewState::Idle {
            debug!("ignoring dropped file outside the upload view");
            return;
        }
        self.accept_path(path);
    }

    fn draft_copied(&mut self) -> bool {
        match self.copied_at {
            Some(at) if at.elapsed() < COPIED_FLASH => true,
            Some(_) => {
                self.copied_at = None;
                false
            }
            None => false,
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let (status_label, status_color) = self.health_label();
        let current = self.controller.session().mode;
        let switch_enabled = !self.controller.is_loading();
        let show_chat_toggle =
            !self.controller.chat().is_open() && self.controller.chat_toggle_enabled();

        egui::TopBottomPanel::top("top_bar")
            .frame(self.theme.panel_frame(self.theme.surface_0, Theme::P8 as i8))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.strong(RichText::new("CivicMate").size(18.0));
                    ui.separator();
                    for mode in Mode::ALL {
                        let response = ui.add_enabled(
                            switch_enabled,
                            egui::SelectableLabel::new(mode == current, mode.nav_label()),
                        );
                        if response.clicked() && mode != current {
                            events.push(Action::SwitchMode(mode).into());
                        }
                    }
                    ui.separator();
                    ui.label(RichText::new(status_label).color(status_color).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if show_chat_toggle && ui.add(self.theme.subtle_button("💬 Chat")).clicked() {
                            events.push(Action::SetChatOpen(true).into());
                        }
                    });
                });
            });
    }

    fn render_chat_panel(&mut self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        if !self.controller.chat().is_open() {
            return;
        }

        let scroll = std::mem::take(&mut self.scroll_chat);
        egui::SidePanel::right("chat_panel")
            .resizable(true)
            .default_width(380.0)
            .min_width(300.0)
            .show(ctx, |ui| {
                let mut emit = |event| events.push(event);
                render_chat(
                    ui,
                    &self.theme,
                    self.controller.chat(),
                    &mut self.chat_input,
                    scroll,
                    &mut emit,
                );
            });
    }

    fn render_diagnostics(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("diagnostics_panel").show(ctx, |ui| {
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(120.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(RichText::new(entry).monospace().size(12.0));
                            }
                        });
                });
        });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let drop_hover = ctx.input(|input| !input.raw.hovered_files.is_empty());
        let draft_copied = self.draft_copied();
        let controller = &self.controller;
        let theme = &self.theme;
        let session = controller.session();

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut emit = |event| events.push(event);
            ScrollArea::vertical()
                .id_salt("main_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(theme.spacing_16);
                    match (controller.view(), session.last_analysis.as_ref()) {
                        (ViewState::Loading { .. }, _) => {
                            ui.vertical_centered(|ui| {
                                ui.add_space(theme.spacing_24 * 4.0);
                                ui.add(egui::Spinner::new().size(36.0));
                                let text = match session.mode {
                                    Mode::Legal => "Analyzing your document...",
                                    Mode::Sustainability => "Analyzing your impact...",
                                };
                                ui.label(RichText::new(text).color(theme.text_muted));
                            });
                        }
                        (ViewState::Results, Some(analysis)) => {
                            let chrome = ResultsChrome {
                                languages: controller.languages(),
                                language: &session.language,
                                show_language: controller.language_picker_visible(),
                                chat_open: controller.chat().is_open(),
                                draft_copied,
                                generation: controller.results_generation(),
                            };
                            render_results(ui, theme, &view::render(analysis), &chrome, &mut emit);
                        }
                        _ => {
                            let form = UploadForm {
                                mode: session.mode,
                                selected_file: session.selected_file.as_ref(),
                                habit_text: &session.habit_text,
                                languages: controller.languages(),
                                language: &session.language,
                                show_language: controller.language_picker_visible(),
                                can_submit: controller.can_submit(),
                                drop_hover,
                            };
                            render_upload(ui, theme, &form, &mut emit);
                        }
                    }
                });
        });
    }

    fn render_notice(&mut self, ctx: &egui::Context, events: &mut Vec<UiEvent>) {
        let Some(message) = &self.notice else {
            return;
        };

        let theme = &self.theme;
        let response = egui::Modal::new(egui::Id::new("notice_modal")).show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.label(RichText::new("Notice").strong().size(16.0));
            ui.add_space(theme.spacing_8);
            ui.label(message);
            ui.add_space(theme.spacing_12);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add(theme.primary_button("OK")).clicked()
            })
            .inner
        });

        if response.inner || response.should_close() {
            events.push(UiEvent::DismissNotice);
        }
    }
}

impl eframe::App for CivicApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.intake_dropped_files(ctx);

        let mut events = Vec::new();
        self.render_top_bar(ctx, &mut events);
        self.render_diagnostics(ctx);
        self.render_chat_panel(ctx, &mut events);
        self.render_center_panel(ctx, &mut events);
        self.render_notice(ctx, &mut events);

        for event in events {
            self.handle_ui_event(event, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dispatch::tests::FakeBackend;
    use std::sync::{mpsc, Arc};

    fn app() -> (CivicApp, tokio::runtime::Runtime) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime should build");
        let (tx, rx) = mpsc::channel();
        let dispatcher =
            Dispatcher::new(Arc::new(FakeBackend::default()), runtime.handle().clone(), tx);
        let controller = Controller::new("English", vec!["English".to_string()]);
        let app = CivicApp::new(rx, dispatcher, controller, "http://localhost:5000".to_string());
        (app, runtime)
    }

    #[test]
    fn diagnostics_log_is_bounded() {
        let (mut app, _runtime) = app();
        for index in 0..(DIAGNOSTICS_CAPACITY + 25) {
            app.log_diagnostic(format!("line {index}"));
        }
        assert_eq!(app.diagnostics_log.len(), DIAGNOSTICS_CAPACITY);
        assert!(app
            .diagnostics_log
            .back()
            .is_some_and(|line| line.ends_with(&format!("line {}", DIAGNOSTICS_CAPACITY + 24))));
    }

    #[test]
    fn health_event_updates_status() {
        let (mut app, _runtime) = app();
        assert_eq!(app.health, BackendHealth::Checking);

        app.apply_event(AppEvent::HealthChecked(Ok(HealthStatus::default())));
        assert_eq!(app.health, BackendHealth::Unconfigured);

        app.apply_event(AppEvent::HealthChecked(Err(AnalysisError::transport())));
        assert_eq!(app.health, BackendHealth::Unreachable);
    }

    #[test]
    fn transport_failure_marks_backend_unreachable() {
        let (mut app, _runtime) = app();
        app.apply_event(AppEvent::HealthChecked(Ok(HealthStatus {
            groq_configured: true,
            ..HealthStatus::default()
        })));
        assert_eq!(app.health, BackendHealth::Ready);

        app.apply_event(AppEvent::ChatFinished {
            ticket: 99,
            outcome: Err(AnalysisError::new("Chat failed")),
        });
        assert_eq!(app.health, BackendHealth::Ready);

        app.apply_event(AppEvent::ChatFinished {
            ticket: 100,
            outcome: Err(AnalysisError::transport()),
        });
        assert_eq!(app.health, BackendHealth::Unreachable);
    }

    #[test]
    fn unreadable_path_raises_notice() {
        let (mut app, _runtime) = app();
        app.accept_path(PathBuf::from("/definitely/not/here.pdf"));
        assert!(app.notice.is_some());
        assert!(app.controller.session().selected_file.is_none());
    }

    #[test]
    fn failed_analysis_event_raises_notice() {
        let (mut app, _runtime) = app();
        app.dispatch(Action::SelectFile(crate::session::SelectedFile::new(
            "/docs/a.pdf",
            "application/pdf",
            10,
        )));
        app.dispatch(Action::Submit);
        let ViewState::Loading { ticket, .. } = app.controller.view() else {
            panic!("expected loading");
        };

        app.apply_event(AppEvent::AnalysisFinished {
            ticket,
            outcome: Err(AnalysisError::new("Analysis failed")),
        });
        assert_eq!(app.notice.as_deref(), Some("Analysis failed"));
        assert_eq!(app.controller.view(), ViewState::Idle);
    }
}
