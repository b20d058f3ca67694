//! Structured analysis results returned by the backend.
//!
//! Every field the backend may omit is optional here; fallbacks are applied
//! by the view model, not during decoding. Unknown fields are kept in
//! `extra` so the whole object can be sent back verbatim as chat context.

use crate::session::Mode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Legal(LegalResult),
    Sustainability(SustainabilityResult),
}

impl AnalysisResult {
    /// Decode an analysis object for the given mode.
    ///
    /// The tag comes from the request, not the payload, since both layouts
    /// are all-optional and would otherwise be indistinguishable.
    pub fn from_value(mode: Mode, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match mode {
            Mode::Legal => Self::Legal(serde_json::from_value(value)?),
            Mode::Sustainability => Self::Sustainability(serde_json::from_value(value)?),
        })
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Legal(_) => Mode::Legal,
            Self::Sustainability(_) => Mode::Sustainability,
        }
    }

    pub fn to_context(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegalResult {
    #[serde(default, deserialize_with = "lenient::text")]
    pub document_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub simple_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::texts")]
    pub key_points: Vec<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub risks_and_deadlines: Vec<Risk>,
    #[serde(default, deserialize_with = "lenient::texts")]
    pub recommended_actions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub draft_reply: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub disclaimer: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default, deserialize_with = "lenient::text")]
    pub severity: Option<String>,
    #[serde(rename = "risk", default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub deadline: Option<String>,
}

impl Risk {
    pub fn severity_level(&self) -> Option<Severity> {
        self.severity.as_deref().and_then(Severity::parse)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SustainabilityResult {
    #[serde(default, deserialize_with = "lenient::text")]
    pub item_or_habit: Option<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub harmful_items: Vec<HarmfulItem>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub good_items: Vec<GoodItem>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub impact_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub environmental_impact: Option<String>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub beneficial_alternatives: Vec<Alternative>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub beneficial_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub harmful_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fun_fact: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarmfulItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub impact: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub detailed_info: HarmDetail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarmDetail {
    #[serde(default, deserialize_with = "lenient::text")]
    pub explanation: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub breakdown: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub yearly_impact: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub comparison: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoodItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub praise: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub savings: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub benefit: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient::record")]
    pub detailed_info: ActionPlan,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    #[serde(default, deserialize_with = "lenient::text")]
    pub steps: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cost: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub payback: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub long_term: Option<String>,
}

/// Decoders that never fail on a wrongly-typed field.
///
/// Model output is not schema-checked by the backend, so a number where a
/// string was expected (or an object where a list was) degrades to a
/// fallback instead of failing the whole result.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(value_to_text(Value::deserialize(deserializer)?))
    }

    pub fn texts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().filter_map(value_to_text).collect(),
            other => value_to_text(other).into_iter().collect(),
        })
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|score| score.is_finite()))
    }

    pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter(Value::is_object)
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    pub fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    fn value_to_text(value: Value) -> Option<String> {
        match value {
            Value::String(text) => Some(text),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }
}
