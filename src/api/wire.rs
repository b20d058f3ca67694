//! Backend response shapes and their classification into outcomes.

use crate::analysis::AnalysisResult;
use crate::error::AnalysisError;
use crate::session::Mode;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const ANALYSIS_FAILED: &str = "Analysis failed";
pub const CHAT_FAILED: &str = "Chat failed";

#[derive(Debug, Clone, Serialize)]
pub struct ChatBody<'a> {
    pub question: &'a str,
    pub context: Option<Value>,
    pub mode: Mode,
    pub language: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub groq_configured: bool,
    #[serde(default)]
    pub vision_model: Option<String>,
    #[serde(default)]
    pub text_model: Option<String>,
}

/// Map an `/analyze/*` response to a result.
///
/// An `error` field wins over the status code; a non-2xx status without one
/// gets the generic failure message; an unparseable body is a transport
/// failure.
pub fn classify_analysis(
    mode: Mode,
    status: StatusCode,
    body: &[u8],
) -> Result<AnalysisResult, AnalysisError> {
    let payload = parse_body(body)?;
    reject_failure(&payload, status, ANALYSIS_FAILED)?;

    let analysis = match payload {
        Value::Object(mut envelope) if envelope.contains_key("analysis") => {
            if let Some(tag) = envelope.get("mode").and_then(Value::as_str) {
                if tag != mode.as_str() {
                    warn!(expected = %mode, received = tag, "analysis mode mismatch in response");
                }
            }
            envelope.remove("analysis").unwrap_or(Value::Null)
        }
        other => other,
    };

    if !analysis.is_object() {
        warn!(%mode, "analysis payload is not an object");
        return Err(AnalysisError::transport());
    }

    AnalysisResult::from_value(mode, analysis).map_err(|err| {
        warn!(%mode, error = %err, "failed to decode analysis payload");
        AnalysisError::transport()
    })
}

/// Map a `/chat` response to the assistant's answer.
pub fn classify_chat(status: StatusCode, body: &[u8]) -> Result<String, AnalysisError> {
    let payload = parse_body(body)?;
    reject_failure(&payload, status, CHAT_FAILED)?;

    match payload.get("answer") {
        Some(Value::String(answer)) => Ok(answer.clone()),
        _ => {
            warn!("chat response carries no answer");
            Err(AnalysisError::transport())
        }
    }
}

fn parse_body(body: &[u8]) -> Result<Value, AnalysisError> {
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "response body is not JSON");
        AnalysisError::transport()
    })
}

fn reject_failure(payload: &Value, status: StatusCode, fallback: &str) -> Result<(), AnalysisError> {
    match payload.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) => return Err(AnalysisError::new(message.as_str())),
        Some(other) => return Err(AnalysisError::new(other.to_string())),
    }

    if !status.is_success() {
        return Err(AnalysisError::new(fallback));
    }
    Ok(())
}
