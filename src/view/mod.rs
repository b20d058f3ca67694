//! Result view model.
//!
//! [`render`] turns an [`AnalysisResult`] into a [`ResultView`] with every
//! fallback already substituted, so the paint step never has to decide what
//! to show for a missing field.

use crate::analysis::{
    Alternative, AnalysisResult, GoodItem, HarmfulItem, LegalResult, Risk, Severity,
    SustainabilityResult,
};

pub mod markup;

pub const NO_SUMMARY: &str = "No summary available";
pub const DEFAULT_DISCLAIMER: &str =
    "Disclaimer: AI-generated information. Always verify with a qualified professional.";
pub const DEFAULT_HARMFUL_SUMMARY: &str =
    "Based on your upload, we found some items that have a negative environmental impact.";
pub const DEFAULT_BENEFICIAL_SUMMARY: &str =
    "Here are sustainable alternatives we recommend to reduce your environmental impact.";
pub const DEFAULT_IMPACT_SCORE: f64 = 5.0;

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";

/// Color family of a card or badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Amber,
    Red,
    Green,
}

impl Tone {
    /// Low is neutral, high is red, anything else reads as medium.
    pub fn for_severity(severity: Option<Severity>) -> Self {
        match severity {
            Some(Severity::Low) => Self::Neutral,
            Some(Severity::High) => Self::Red,
            Some(Severity::Medium) | None => Self::Amber,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardFace {
    #[default]
    Front,
    Back,
}

impl CardFace {
    pub fn flipped(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub badge: String,
    pub title: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Legal(LegalView),
    Sustainability(SustainabilityView),
}

impl ResultView {
    pub fn header(&self) -> &Header {
        match self {
            Self::Legal(view) => &view.header,
            Self::Sustainability(view) => &view.header,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegalView {
    pub header: Header,
    pub summary: String,
    pub key_points: Vec<String>,
    pub risks: Vec<RiskCard>,
    pub actions: Vec<String>,
    /// `None` hides the draft block.
    pub draft_reply: Option<String>,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskCard {
    pub severity: String,
    pub tone: Tone,
    pub description: String,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SustainabilityView {
    pub header: Header,
    pub meter: ImpactMeter,
    pub harmful_summary: String,
    pub harmful: Vec<FlipCard>,
    pub good_choices: Vec<Badge>,
    pub beneficial_summary: String,
    pub alternatives: Vec<FlipCard>,
    pub fun_fact: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImpactMeter {
    /// Fill width, 0 to 100.
    pub percent: u8,
    pub description: String,
}

impl ImpactMeter {
    pub fn from_score(score: Option<f64>, description: Option<&str>) -> Self {
        let score = score.unwrap_or(DEFAULT_IMPACT_SCORE).clamp(0.0, 10.0);
        Self {
            percent: (score * 10.0).round() as u8,
            description: or_default(description, "Analysis complete"),
        }
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: Option<&str>, fallback: &str) -> Self {
        Self {
            label,
            value: or_default(value, fallback),
        }
    }
}

/// Two-faced card for a harmful item or an alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct FlipCard {
    pub tone: Tone,
    pub category: Option<String>,
    pub icon: String,
    pub title: String,
    /// Short lines under the title; blank values are dropped.
    pub front: Vec<String>,
    pub back_heading: &'static str,
    pub back: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub icon: String,
    pub title: String,
    pub praise: String,
}

pub fn render(result: &AnalysisResult) -> ResultView {
    match result {
        AnalysisResult::Legal(legal) => ResultView::Legal(render_legal(legal)),
        AnalysisResult::Sustainability(report) => {
            ResultView::Sustainability(render_sustainability(report))
        }
    }
}

/// Non-empty text, kept exactly as received.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

fn or_default(value: Option<&str>, fallback: &str) -> String {
    present(value).unwrap_or(fallback).to_string()
}

fn render_legal(legal: &LegalResult) -> LegalView {
    let draft_reply = legal
        .draft_reply
        .as_deref()
        .filter(|draft| !draft.is_empty() && *draft != "null")
        .map(str::to_string);

    LegalView {
        header: Header {
            badge: or_default(legal.document_type.as_deref(), "Document"),
            title: "Analysis Result",
        },
        summary: or_default(legal.simple_summary.as_deref(), NO_SUMMARY),
        key_points: legal.key_points.clone(),
        risks: legal.risks_and_deadlines.iter().map(risk_card).collect(),
        actions: legal.recommended_actions.clone(),
        draft_reply,
        disclaimer: or_default(legal.disclaimer.as_deref(), DEFAULT_DISCLAIMER),
    }
}

fn risk_card(risk: &Risk) -> RiskCard {
    RiskCard {
        severity: or_default(risk.severity.as_deref(), UNKNOWN),
        tone: Tone::for_severity(risk.severity_level()),
        description: or_default(risk.description.as_deref(), "Unknown risk"),
        deadline: present(risk.deadline.as_deref()).map(|d| format!("Deadline: {d}")),
    }
}

fn render_sustainability(report: &SustainabilityResult) -> SustainabilityView {
    SustainabilityView {
        header: Header {
            badge: or_default(report.item_or_habit.as_deref(), "Habit Analysis"),
            title: "Impact Analysis Complete",
        },
        meter: ImpactMeter::from_score(report.impact_score, report.environmental_impact.as_deref()),
        harmful_summary: or_default(report.harmful_summary.as_deref(), DEFAULT_HARMFUL_SUMMARY),
        harmful: report.harmful_items.iter().map(harmful_card).collect(),
        good_choices: report.good_items.iter().map(badge).collect(),
        beneficial_summary: or_default(
            report.beneficial_summary.as_deref(),
            DEFAULT_BENEFICIAL_SUMMARY,
        ),
        alternatives: report
            .beneficial_alternatives
            .iter()
            .map(alternative_card)
            .collect(),
        fun_fact: present(report.fun_fact.as_deref()).map(str::to_string),
    }
}

fn front_lines(values: &[Option<&str>]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| present(*value))
        .map(str::to_string)
        .collect()
}

fn harmful_card(item: &HarmfulItem) -> FlipCard {
    let detail = &item.detailed_info;
    FlipCard {
        tone: Tone::for_severity(item.severity.as_deref().and_then(Severity::parse)),
        category: present(item.category.as_deref()).map(str::to_string),
        icon: or_default(item.icon.as_deref(), "⚠️"),
        title: or_default(item.title.as_deref(), UNKNOWN),
        front: front_lines(&[item.value.as_deref(), item.impact.as_deref()]),
        back_heading: "📊 Detailed Analysis",
        back: vec![
            Field::new("Why harmful", detail.explanation.as_deref(), "No details available"),
            Field::new("Breakdown", detail.breakdown.as_deref(), NOT_AVAILABLE),
            Field::new("Yearly Impact", detail.yearly_impact.as_deref(), NOT_AVAILABLE),
            Field::new("Comparison", detail.comparison.as_deref(), NOT_AVAILABLE),
        ],
    }
}

fn alternative_card(alternative: &Alternative) -> FlipCard {
    let plan = &alternative.detailed_info;
    let difficulty = or_default(alternative.difficulty.as_deref(), "Easy");
    let mut front = front_lines(&[alternative.savings.as_deref(), alternative.benefit.as_deref()]);
    front.push(difficulty);

    FlipCard {
        tone: Tone::Green,
        category: present(alternative.category.as_deref()).map(str::to_string),
        icon: or_default(alternative.icon.as_deref(), "🌿"),
        title: or_default(alternative.title.as_deref(), UNKNOWN),
        front,
        back_heading: "🎯 Action Plan",
        back: vec![
            Field::new("Steps", plan.steps.as_deref(), "No steps available"),
            Field::new("Cost", plan.cost.as_deref(), NOT_AVAILABLE),
            Field::new("Payback", plan.payback.as_deref(), NOT_AVAILABLE),
            Field::new("Long-term", plan.long_term.as_deref(), NOT_AVAILABLE),
        ],
    }
}

fn badge(item: &GoodItem) -> Badge {
    Badge {
        icon: or_default(item.icon.as_deref(), "✅"),
        title: or_default(item.title.as_deref(), ""),
        praise: or_default(item.praise.as_deref(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Mode;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn legal(value: Value) -> LegalView {
        match render(&AnalysisResult::from_value(Mode::Legal, value).expect("fixture should decode")) {
            ResultView::Legal(view) => view,
            other => panic!("expected legal view, got {other:?}"),
        }
    }

    fn sustainability(value: Value) -> SustainabilityView {
        let result =
            AnalysisResult::from_value(Mode::Sustainability, value).expect("fixture should decode");
        match render(&result) {
            ResultView::Sustainability(view) => view,
            other => panic!("expected sustainability view, got {other:?}"),
        }
    }

    #[test]
    fn empty_legal_result_uses_defaults() {
        let view = legal(json!({}));
        assert_eq!(
            view,
            LegalView {
                header: Header {
                    badge: "Document".to_string(),
                    title: "Analysis Result",
                },
                summary: NO_SUMMARY.to_string(),
                key_points: Vec::new(),
                risks: Vec::new(),
                actions: Vec::new(),
                draft_reply: None,
                disclaimer: DEFAULT_DISCLAIMER.to_string(),
            }
        );
    }

    #[test]
    fn draft_reply_sentinel_is_hidden() {
        assert_eq!(legal(json!({"draft_reply": "null"})).draft_reply, None);
        assert_eq!(legal(json!({"draft_reply": null})).draft_reply, None);
        assert_eq!(legal(json!({"draft_reply": ""})).draft_reply, None);
        assert_eq!(
            legal(json!({"draft_reply": "   "})).draft_reply,
            Some("   ".to_string())
        );
        assert_eq!(
            legal(json!({"draft_reply": "Dear Sir,\nI acknowledge receipt."})).draft_reply,
            Some("Dear Sir,\nI acknowledge receipt.".to_string())
        );
    }

    #[test]
    fn text_fields_are_shown_verbatim() {
        let view = legal(json!({
            "simple_summary": "  You owe rent.\n",
            "disclaimer": "   ",
            "document_type": ""
        }));
        assert_eq!(view.summary, "  You owe rent.\n");
        assert_eq!(view.disclaimer, "   ");
        assert_eq!(view.header.badge, "Document");
    }

    #[test]
    fn risks_are_toned_by_severity() {
        let view = legal(json!({
            "risks_and_deadlines": [
                {"severity": "Low", "risk": "Late fee"},
                {"severity": "MEDIUM", "risk": "Court summons", "deadline": "15 March 2025"},
                {"severity": "high", "risk": "Eviction"},
                {"risk": "Unclear clause"},
                {}
            ]
        }));

        let tones: Vec<Tone> = view.risks.iter().map(|risk| risk.tone).collect();
        assert_eq!(
            tones,
            vec![Tone::Neutral, Tone::Amber, Tone::Red, Tone::Amber, Tone::Amber]
        );
        assert_eq!(view.risks[1].deadline.as_deref(), Some("Deadline: 15 March 2025"));
        assert_eq!(view.risks[0].deadline, None);
        assert_eq!(view.risks[3].severity, "Unknown");
        assert_eq!(view.risks[4].description, "Unknown risk");
    }

    #[test]
    fn meter_follows_score() {
        assert_eq!(sustainability(json!({"impact_score": 7})).meter.percent, 70);
        assert_eq!(sustainability(json!({})).meter.percent, 50);
        assert_eq!(sustainability(json!({"impact_score": 0})).meter.percent, 0);
        assert_eq!(sustainability(json!({"impact_score": 14})).meter.percent, 100);
        assert_eq!(sustainability(json!({"impact_score": -2})).meter.percent, 0);
        assert_eq!(sustainability(json!({"impact_score": "6.5"})).meter.percent, 65);
    }

    #[test]
    fn harmful_card_faces() {
        let view = sustainability(json!({
            "harmful_items": [{
                "category": "Packaging",
                "title": "Plastic bottles",
                "value": "6 bottles",
                "impact": "0.5 kg CO2",
                "severity": "HIGH",
                "detailed_info": {"explanation": "Single-use PET", "yearly_impact": "26 kg"}
            }]
        }));

        assert_eq!(
            view.harmful,
            vec![FlipCard {
                tone: Tone::Red,
                category: Some("Packaging".to_string()),
                icon: "⚠️".to_string(),
                title: "Plastic bottles".to_string(),
                front: vec!["6 bottles".to_string(), "0.5 kg CO2".to_string()],
                back_heading: "📊 Detailed Analysis",
                back: vec![
                    Field { label: "Why harmful", value: "Single-use PET".to_string() },
                    Field { label: "Breakdown", value: "N/A".to_string() },
                    Field { label: "Yearly Impact", value: "26 kg".to_string() },
                    Field { label: "Comparison", value: "N/A".to_string() },
                ],
            }]
        );
        assert_eq!(view.harmful_summary, DEFAULT_HARMFUL_SUMMARY);
    }

    #[test]
    fn alternative_card_defaults() {
        let view = sustainability(json!({
            "beneficial_alternatives": [{"savings": "Save 20 kg CO2/yr"}],
            "beneficial_summary": "Switch these three things."
        }));
        let card = &view.alternatives[0];
        assert_eq!(card.icon, "🌿");
        assert_eq!(card.title, "Unknown");
        assert_eq!(card.tone, Tone::Green);
        assert_eq!(card.front, vec!["Save 20 kg CO2/yr".to_string(), "Easy".to_string()]);
        assert_eq!(card.back[0].value, "No steps available");
        assert_eq!(view.beneficial_summary, "Switch these three things.");
    }

    #[test]
    fn optional_sections() {
        let bare = sustainability(json!({}));
        assert!(bare.good_choices.is_empty());
        assert_eq!(bare.fun_fact, None);
        assert_eq!(bare.meter.description, "Analysis complete");
        assert_eq!(bare.header.badge, "Habit Analysis");

        let full = sustainability(json!({
            "item_or_habit": "Daily commute",
            "good_items": [{"title": "Reusable bag", "praise": "Nice!"}],
            "fun_fact": "Trees absorb about 22 kg of CO2 a year."
        }));
        assert_eq!(
            full.good_choices,
            vec![Badge {
                icon: "✅".to_string(),
                title: "Reusable bag".to_string(),
                praise: "Nice!".to_string(),
            }]
        );
        assert_eq!(full.fun_fact.as_deref(), Some("Trees absorb about 22 kg of CO2 a year."));
        assert_eq!(full.header.title, "Impact Analysis Complete");
    }

    #[test]
    fn card_face_toggles() {
        let face = CardFace::default();
        assert_eq!(face, CardFace::Front);
        assert_eq!(face.flipped(), CardFace::Back);
        assert_eq!(face.flipped().flipped(), CardFace::Front);
    }
}
