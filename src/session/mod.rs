use crate::analysis::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Legal,
    Sustainability,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Legal, Mode::Sustainability];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legal => "legal",
            Self::Sustainability => "sustainability",
        }
    }

    pub fn nav_label(&self) -> &'static str {
        match self {
            Self::Legal => "Legal Documents",
            Self::Sustainability => "Sustainability",
        }
    }

    /// Sustainability analysis is English-only on the backend.
    pub fn is_localized(&self) -> bool {
        matches!(self, Self::Legal)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file the user picked or dropped, described by metadata only.
///
/// Contents are read when a request is built, so a file deleted after
/// selection surfaces as a transport-side failure of that request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, mime: impl Into<String>, size: u64) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            path,
            name,
            mime: mime.into(),
            size,
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// The single process-wide session, owned by the controller.
#[derive(Debug, Clone)]
pub struct Session {
    pub mode: Mode,
    pub selected_file: Option<SelectedFile>,
    pub habit_text: String,
    pub last_analysis: Option<AnalysisResult>,
    pub language: String,
    default_language: String,
}

impl Session {
    pub fn new(default_language: impl Into<String>) -> Self {
        let default_language = default_language.into();
        Self {
            mode: Mode::default(),
            selected_file: None,
            habit_text: String::new(),
            last_analysis: None,
            language: default_language.clone(),
            default_language,
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Trimmed habit text, or `None` when blank.
    pub fn habit_text(&self) -> Option<&str> {
        let text = self.habit_text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Whether the input of the last submission can be sent again.
    pub fn has_input(&self) -> bool {
        match self.mode {
            Mode::Legal => self.selected_file.is_some(),
            Mode::Sustainability => self.selected_file.is_some() || self.habit_text().is_some(),
        }
    }

    /// Language sent with requests for the current mode.
    pub fn effective_language(&self) -> &str {
        if self.mode.is_localized() {
            &self.language
        } else {
            &self.default_language
        }
    }

    pub fn clear_input(&mut self) {
        self.selected_file = None;
        self.habit_text.clear();
        self.last_analysis = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_habit_text_counts_as_absent() {
        let mut session = Session::new("English");
        session.mode = Mode::Sustainability;
        session.habit_text = "   \n".to_string();
        assert!(session.habit_text().is_none());
        assert!(!session.has_input());

        session.habit_text = "  I drive 50km daily ".to_string();
        assert_eq!(session.habit_text(), Some("I drive 50km daily"));
        assert!(session.has_input());
    }

    #[test]
    fn sustainability_ignores_selected_language() {
        let mut session = Session::new("English");
        session.language = "Hindi".to_string();
        assert_eq!(session.effective_language(), "Hindi");

        session.mode = Mode::Sustainability;
        assert_eq!(session.effective_language(), "English");
    }

    #[test]
    fn selected_file_name_comes_from_path() {
        let file = SelectedFile::new("/tmp/notices/summons.pdf", "application/pdf", 10);
        assert_eq!(file.name, "summons.pdf");
    }
}
