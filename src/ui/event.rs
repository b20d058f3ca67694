use crate::controller::Action;

/// What a paint pass asks the app to do once the frame is laid out.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Controller(Action),
    /// Open the native file dialog.
    PickFile,
    CopyDraft(String),
    DismissNotice,
}

impl From<Action> for UiEvent {
    fn from(action: Action) -> Self {
        Self::Controller(action)
    }
}
