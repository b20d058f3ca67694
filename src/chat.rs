//! Chat transcript and split-view toggle.

use crate::error::AnalysisError;
use crate::event::Ticket;
use crate::session::Mode;
use tracing::debug;

pub const THINKING_PLACEHOLDER: &str = "Thinking...";
pub const FAILURE_REPLY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    /// Placeholder shown while the reply for `ticket` is outstanding.
    Pending { ticket: Ticket },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub body: MessageBody,
}

impl ChatMessage {
    pub fn text(&self) -> &str {
        match &self.body {
            MessageBody::Text(text) => text,
            MessageBody::Pending { .. } => THINKING_PLACEHOLDER,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.body, MessageBody::Pending { .. })
    }
}

pub fn welcome_message(mode: Mode) -> &'static str {
    match mode {
        Mode::Legal => {
            "I am your AI Legal Advisor. Upload a document or ask me a general legal question."
        }
        Mode::Sustainability => {
            "I am your Sustainability Expert. Upload a receipt/habit description or ask me how to live eco-friendly."
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPanel {
    transcript: Vec<ChatMessage>,
    open: bool,
}

impl ChatPanel {
    pub fn new(mode: Mode) -> Self {
        let mut panel = Self {
            transcript: Vec::new(),
            open: false,
        };
        panel.restart(mode);
        panel
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Clear history down to the mode's welcome message and close the panel.
    pub fn restart(&mut self, mode: Mode) {
        self.transcript.clear();
        self.append_message(welcome_message(mode), false);
        self.open = false;
    }

    pub fn append_message(&mut self, text: impl Into<String>, from_user: bool) {
        let role = if from_user { Role::User } else { Role::Assistant };
        self.transcript.push(ChatMessage {
            role,
            body: MessageBody::Text(text.into()),
        });
    }

    pub fn begin_pending(&mut self, ticket: Ticket) {
        self.transcript.push(ChatMessage {
            role: Role::Assistant,
            body: MessageBody::Pending { ticket },
        });
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        self.transcript.iter().any(ChatMessage::is_pending)
    }

    /// Replace the placeholder for `ticket` with the reply or the failure text.
    ///
    /// Returns `false` when no placeholder for `ticket` exists, which happens
    /// when the transcript was restarted while the request was in flight.
    pub fn resolve_pending(&mut self, ticket: Ticket, outcome: Result<String, AnalysisError>) -> bool {
        let Some(index) = self
            .transcript
            .iter()
            .position(|message| message.body == MessageBody::Pending { ticket })
        else {
            debug!(ticket, "no pending chat placeholder; dropping reply");
            return false;
        };

        self.transcript.remove(index);
        let reply = match outcome {
            Ok(answer) => answer,
            Err(_) => FAILURE_REPLY.to_string(),
        };
        self.append_message(reply, false);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(panel: &ChatPanel) -> Vec<(Role, &str)> {
        panel
            .transcript()
            .iter()
            .map(|message| (message.role, message.text()))
            .collect()
    }

    #[test]
    fn starts_closed_with_welcome() {
        let panel = ChatPanel::new(Mode::Sustainability);
        assert!(!panel.is_open());
        assert_eq!(
            texts(&panel),
            vec![(Role::Assistant, welcome_message(Mode::Sustainability))]
        );
    }

    #[test]
    fn placeholder_is_replaced_on_success() {
        let mut panel = ChatPanel::new(Mode::Legal);
        panel.append_message("What should I do?", true);
        panel.begin_pending(1);
        assert!(panel.has_pending());
        assert_eq!(panel.transcript().last().map(ChatMessage::text), Some(THINKING_PLACEHOLDER));

        assert!(panel.resolve_pending(1, Ok("Reply within **15 days**.".to_string())));
        assert!(!panel.has_pending());
        assert_eq!(
            texts(&panel)[1..].to_vec(),
            vec![
                (Role::User, "What should I do?"),
                (Role::Assistant, "Reply within **15 days**."),
            ]
        );
    }

    #[test]
    fn placeholder_is_removed_on_failure() {
        let mut panel = ChatPanel::new(Mode::Legal);
        panel.begin_pending(4);
        assert!(panel.resolve_pending(4, Err(AnalysisError::transport())));
        assert!(!panel.has_pending());
        assert_eq!(panel.transcript().last().map(ChatMessage::text), Some(FAILURE_REPLY));
    }

    #[test]
    fn unknown_ticket_leaves_transcript_alone() {
        let mut panel = ChatPanel::new(Mode::Legal);
        panel.begin_pending(2);
        panel.restart(Mode::Legal);
        let before = panel.clone();
        assert!(!panel.resolve_pending(2, Ok("late".to_string())));
        assert_eq!(panel, before);
    }

    #[test]
    fn toggling_keeps_history() {
        let mut panel = ChatPanel::new(Mode::Legal);
        panel.append_message("hello", true);
        panel.set_open(true);
        panel.set_open(false);
        assert_eq!(panel.transcript().len(), 2);
    }
}
