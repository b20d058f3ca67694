use crate::analysis::AnalysisResult;
use crate::api::HealthStatus;
use crate::error::AnalysisError;

/// Correlates a finished request with the controller state that issued it.
pub type Ticket = u64;

/// Messages from request tasks back to the UI thread.
#[derive(Debug, Clone)]
pub enum AppEvent {
    AnalysisFinished {
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisError>,
    },
    ChatFinished {
        ticket: Ticket,
        outcome: Result<String, AnalysisError>,
    },
    HealthChecked(Result<HealthStatus, AnalysisError>),
}
