//! View-state controller.
//!
//! Owns the [`Session`] and the [`ChatPanel`] and advances them one
//! [`Action`] at a time. Every transition is synchronous; work that has to
//! leave the UI thread comes back out as an [`Effect`] for the caller to
//! perform, and its outcome re-enters as another action.

use crate::analysis::AnalysisResult;
use crate::api::AnalysisRequest;
use crate::chat::ChatPanel;
use crate::error::{AnalysisError, ControllerError, ValidationError};
use crate::event::{AppEvent, Ticket};
use crate::session::validation::{validate_sustainability_input, validate_upload_file};
use crate::session::{Mode, SelectedFile, Session};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Upload form for the current mode.
    Idle,
    /// Waiting on the analysis issued under `ticket`.
    ///
    /// `rerequest` marks a language change from the results view; its failure
    /// goes back to the results already on screen.
    Loading { ticket: Ticket, rerequest: bool },
    Results,
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Results => "showing results",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SwitchMode(Mode),
    SelectFile(SelectedFile),
    FileUnreadable(ValidationError),
    RemoveFile,
    SetHabitText(String),
    SetLanguage(String),
    Submit,
    ChangeResultLanguage(String),
    Reset,
    SetChatOpen(bool),
    SendChat(String),
    AnalysisFinished {
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    },
    ChatFinished {
        ticket: Ticket,
        outcome: Result<String, AnalysisError>,
    },
}

impl Action {
    /// Map a background event to the action it completes, if any.
    pub fn from_event(event: AppEvent) -> Option<Self> {
        match event {
            AppEvent::AnalysisFinished { ticket, outcome } => {
                Some(Self::AnalysisFinished { ticket, outcome })
            }
            AppEvent::ChatFinished { ticket, outcome } => Some(Self::ChatFinished { ticket, outcome }),
            AppEvent::HealthChecked(_) => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::SwitchMode(_) => "switch_mode",
            Self::SelectFile(_) => "select_file",
            Self::FileUnreadable(_) => "file_unreadable",
            Self::RemoveFile => "remove_file",
            Self::SetHabitText(_) => "set_habit_text",
            Self::SetLanguage(_) => "set_language",
            Self::Submit => "submit",
            Self::ChangeResultLanguage(_) => "change_result_language",
            Self::Reset => "reset",
            Self::SetChatOpen(_) => "set_chat_open",
            Self::SendChat(_) => "send_chat",
            Self::AnalysisFinished { .. } => "analysis_finished",
            Self::ChatFinished { .. } => "chat_finished",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run `request` off the UI thread and report back under `ticket`.
    Dispatch {
        ticket: Ticket,
        request: AnalysisRequest,
    },
    /// Blocking notice the user has to dismiss.
    Notice(String),
    ScrollChatToBottom,
}

pub struct Controller {
    session: Session,
    chat: ChatPanel,
    view: ViewState,
    languages: Vec<String>,
    next_ticket: Ticket,
    results_shown: u64,
}

impl Controller {
    pub fn new(default_language: impl Into<String>, languages: Vec<String>) -> Self {
        let session = Session::new(default_language);
        let chat = ChatPanel::new(session.mode);
        Self {
            session,
            chat,
            view: ViewState::Idle,
            languages,
            next_ticket: 1,
            results_shown: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn chat(&self) -> &ChatPanel {
        &self.chat
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Bumped every time a new result is shown; scopes per-card UI state.
    pub fn results_generation(&self) -> u64 {
        self.results_shown
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, ViewState::Loading { .. })
    }

    pub fn language_picker_visible(&self) -> bool {
        self.session.mode.is_localized()
    }

    pub fn can_submit(&self) -> bool {
        self.view == ViewState::Idle && self.session.has_input()
    }

    pub fn chat_toggle_enabled(&self) -> bool {
        !self.is_loading()
    }

    /// Apply `action`, turning refusals into notices or log lines.
    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        let name = action.name();
        match self.apply(action) {
            Ok(effects) => effects,
            Err(err @ (ControllerError::Validation(_) | ControllerError::StaleSession)) => {
                info!(action = name, error = %err, "action rejected");
                vec![Effect::Notice(err.to_string())]
            }
            Err(err) => {
                warn!(action = name, error = %err, "action ignored");
                Vec::new()
            }
        }
    }

    pub fn apply(&mut self, action: Action) -> Result<Vec<Effect>, ControllerError> {
        match action {
            Action::SwitchMode(mode) => self.switch_mode(mode),
            Action::SelectFile(file) => self.select_file(file),
            Action::FileUnreadable(err) => Err(err.into()),
            Action::RemoveFile => {
                self.require_idle("remove_file")?;
                self.session.selected_file = None;
                Ok(Vec::new())
            }
            Action::SetHabitText(text) => {
                self.require_idle("set_habit_text")?;
                self.session.habit_text = text;
                Ok(Vec::new())
            }
            Action::SetLanguage(language) => self.set_language(language),
            Action::Submit => self.submit(),
            Action::ChangeResultLanguage(language) => self.change_result_language(language),
            Action::Reset => Ok(self.reset()),
            Action::SetChatOpen(open) => {
                if open && self.is_loading() {
                    return Err(self.refuse("set_chat_open"));
                }
                self.chat.set_open(open);
                Ok(Vec::new())
            }
            Action::SendChat(question) => Ok(self.send_chat(question)),
            Action::AnalysisFinished { ticket, outcome } => Ok(self.analysis_finished(ticket, outcome)),
            Action::ChatFinished { ticket, outcome } => {
                if self.chat.resolve_pending(ticket, outcome) {
                    Ok(vec![Effect::ScrollChatToBottom])
                } else {
                    Ok(Vec::new())
                }
            }
        }
    }

    fn refuse(&self, action: &'static str) -> ControllerError {
        ControllerError::InvalidTransition {
            action,
            state: self.view.name(),
        }
    }

    fn require_idle(&self, action: &'static str) -> Result<(), ControllerError> {
        if self.view == ViewState::Idle {
            Ok(())
        } else {
            Err(self.refuse(action))
        }
    }

    fn issue_ticket(&mut self) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn switch_mode(&mut self, mode: Mode) -> Result<Vec<Effect>, ControllerError> {
        if self.is_loading() {
            return Err(self.refuse("switch_mode"));
        }

        info!(from = %self.session.mode, to = %mode, "switching mode");
        self.session.mode = mode;
        if !mode.is_localized() {
            self.session.language = self.session.default_language().to_string();
        }
        self.session.clear_input();
        self.chat.restart(mode);
        self.view = ViewState::Idle;
        Ok(Vec::new())
    }

    fn select_file(&mut self, file: SelectedFile) -> Result<Vec<Effect>, ControllerError> {
        self.require_idle("select_file")?;
        let file = validate_upload_file(file)?;
        debug!(file = %file.name, mime = %file.mime, size = file.size, "file selected");
        self.session.selected_file = Some(file);
        Ok(Vec::new())
    }

    fn set_language(&mut self, language: String) -> Result<Vec<Effect>, ControllerError> {
        if !self.session.mode.is_localized() {
            debug!(language, "language is fixed in this mode; ignoring");
            self.session.language = self.session.default_language().to_string();
            return Ok(Vec::new());
        }

        if self.view == ViewState::Results {
            return self.change_result_language(language);
        }
        self.require_idle("set_language")?;

        if !self.is_known_language(&language) {
            return Ok(Vec::new());
        }
        self.session.language = language;
        Ok(Vec::new())
    }

    fn is_known_language(&self, language: &str) -> bool {
        let known = self.languages.iter().any(|candidate| candidate == language);
        if !known {
            warn!(language, "unknown language; keeping current selection");
        }
        known
    }

    fn analysis_request(&self) -> Result<AnalysisRequest, ControllerError> {
        let session = &self.session;
        match session.mode {
            Mode::Legal => {
                let file = session
                    .selected_file
                    .clone()
                    .ok_or(ValidationError::NoFileSelected)?;
                Ok(AnalysisRequest::Legal {
                    file: validate_upload_file(file)?,
                    language: session.language.clone(),
                })
            }
            Mode::Sustainability => {
                let file = session.selected_file.as_ref();
                let text = session.habit_text();
                validate_sustainability_input(file, text)?;
                Ok(AnalysisRequest::Sustainability {
                    file: file.cloned(),
                    text: text.map(str::to_string),
                    language: session.effective_language().to_string(),
                })
            }
        }
    }

    fn submit(&mut self) -> Result<Vec<Effect>, ControllerError> {
        match self.view {
            ViewState::Idle => {}
            ViewState::Loading { .. } => return Err(ControllerError::Busy),
            ViewState::Results => return Err(self.refuse("submit")),
        }

        let request = self.analysis_request()?;
        let ticket = self.issue_ticket();
        info!(ticket, kind = request.kind(), "analysis submitted");
        self.view = ViewState::Loading {
            ticket,
            rerequest: false,
        };
        Ok(vec![Effect::Dispatch { ticket, request }])
    }

    fn change_result_language(&mut self, language: String) -> Result<Vec<Effect>, ControllerError> {
        if self.view != ViewState::Results {
            return Err(self.refuse("change_result_language"));
        }
        if !self.session.mode.is_localized() {
            debug!(language, "results in this mode are not re-requested");
            return Ok(Vec::new());
        }
        if language == self.session.language || !self.is_known_language(&language) {
            return Ok(Vec::new());
        }

        let Some(file) = self.session.selected_file.clone() else {
            warn!("analysed file no longer selected; forcing reset");
            self.reset();
            return Err(ControllerError::StaleSession);
        };

        self.session.language = language.clone();
        let ticket = self.issue_ticket();
        info!(ticket, language, "re-requesting analysis in new language");
        self.view = ViewState::Loading {
            ticket,
            rerequest: true,
        };
        Ok(vec![Effect::Dispatch {
            ticket,
            request: AnalysisRequest::Legal { file, language },
        }])
    }

    fn reset(&mut self) -> Vec<Effect> {
        if let ViewState::Loading { ticket, .. } = self.view {
            debug!(ticket, "reset while loading; response will be dropped");
        }
        self.session.clear_input();
        self.chat.restart(self.session.mode);
        self.view = ViewState::Idle;
        Vec::new()
    }

    fn send_chat(&mut self, question: String) -> Vec<Effect> {
        let question = question.trim().to_string();
        if question.is_empty() {
            return Vec::new();
        }

        let ticket = self.issue_ticket();
        self.chat.append_message(question.clone(), true);
        self.chat.begin_pending(ticket);

        let request = AnalysisRequest::Chat {
            question,
            context: self.session.last_analysis.clone(),
            mode: self.session.mode,
            language: self.session.effective_language().to_string(),
        };
        vec![
            Effect::ScrollChatToBottom,
            Effect::Dispatch { ticket, request },
        ]
    }

    fn analysis_finished(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Vec<Effect> {
        let rerequest = match self.view {
            ViewState::Loading {
                ticket: expected,
                rerequest,
            } if expected == ticket => rerequest,
            state => {
                info!(ticket, state = state.name(), "dropping stale analysis response");
                return Vec::new();
            }
        };

        match outcome {
            Ok(result) => {
                info!(ticket, mode = %result.mode(), "analysis complete");
                self.session.last_analysis = Some(result);
                self.results_shown += 1;
                self.chat.set_open(false);
                self.view = ViewState::Results;
                Vec::new()
            }
            Err(err) => {
                warn!(ticket, error = %err, "analysis failed");
                self.view = if rerequest && self.session.last_analysis.is_some() {
                    ViewState::Results
                } else {
                    ViewState::Idle
                };
                vec![Effect::Notice(err.message)]
            }
        }
    }
}
