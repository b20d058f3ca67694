//! Error taxonomy for the client.
//!
//! Validation failures are caught before any request leaves the process,
//! analysis failures come back from the backend or the transport, and
//! controller failures describe transitions the current view state refuses.

use std::path::PathBuf;
use thiserror::Error;

/// Rejected input, surfaced to the user before a request is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a PDF or image file (PNG, JPG, WEBP)")]
    UnsupportedType { mime: String },

    #[error("File size must be under 16MB")]
    TooLarge { size: u64 },

    #[error("Please either upload a receipt OR describe your habits to analyze.")]
    MissingInput,

    #[error("Please select a document to analyze.")]
    NoFileSelected,

    #[error("Could not read {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
}

/// Backend or transport failure for one request.
///
/// The message is shown to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AnalysisError {
    pub message: String,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Unreachable host, broken connection or an unparseable body.
    pub fn transport() -> Self {
        Self::new("transport")
    }

    pub fn is_transport(&self) -> bool {
        self.message == "transport"
    }
}

/// Transition refused by the view-state controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Session input missing. Please upload a document or enter habits again.")]
    StaleSession,

    #[error("An analysis is already in progress")]
    Busy,

    #[error("`{action}` is not allowed while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
