//! Schema contract layer: the two record types a pipeline must produce when
//! it claims a structured result, plus the validation that admits them.
//!
//! Validation is pure data-shape enforcement with no service dependency.
//! A candidate either deserializes into the typed record or yields a
//! [`ValidationFailure`] naming the offending field; callers branch on the
//! explicit outcome rather than on a thrown error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Patient-reported pain level. Closed set; other tokens are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PainLevel {
    None,
    Mild,
    Moderate,
    Severe,
}

impl PainLevel {
    pub const ALL: [PainLevel; 4] = [
        PainLevel::None,
        PainLevel::Mild,
        PainLevel::Moderate,
        PainLevel::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PainLevel::None => "none",
            PainLevel::Mild => "mild",
            PainLevel::Moderate => "moderate",
            PainLevel::Severe => "severe",
        }
    }

    fn from_wire(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == token)
    }
}

/// Triage urgency classification. Closed set; no other value is
/// representable, so extending it is a breaking schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Immediate,
    Urgent,
    Routine,
    NonUrgent,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 4] = [
        UrgencyLevel::Immediate,
        UrgencyLevel::Urgent,
        UrgencyLevel::Routine,
        UrgencyLevel::NonUrgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Immediate => "immediate",
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Routine => "routine",
            UrgencyLevel::NonUrgent => "non_urgent",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == token)
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured output of stage 1 in the contract pipeline.
///
/// Only what these fields can represent crosses into stage 2; anxious or
/// hedged narrative language has no field here and is structurally excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomAssessment {
    pub observed_symptoms: Vec<String>,
    pub severity_score: u8,
    pub vitals_abnormal: bool,
    pub pain_level: PainLevel,
    pub onset: String,
    pub relevant_history: Vec<String>,
}

/// Structured output of stage 2 in both pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageDecision {
    pub urgency_level: UrgencyLevel,
    pub reasoning: String,
    pub recommended_action: String,
}

/// A candidate value that does not conform to its schema: missing field,
/// wrong type, out-of-range number, or a token outside a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': {reason}")]
pub struct ValidationFailure {
    pub field: String,
    pub reason: String,
}

impl ValidationFailure {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// JSON Schema sent to the inference service for stage-1 structured calls.
/// Mirrors the validation rules below, bounds included.
pub fn symptom_assessment_schema() -> Arc<Map<String, Value>> {
    let schema = json!({
        "type": "object",
        "properties": {
            "observed_symptoms": {"type": "array", "items": {"type": "string"}},
            "severity_score": {"type": "integer", "minimum": 1, "maximum": 10},
            "vitals_abnormal": {"type": "boolean"},
            "pain_level": {"type": "string", "enum": ["none", "mild", "moderate", "severe"]},
            "onset": {"type": "string"},
            "relevant_history": {"type": "array", "items": {"type": "string"}}
        },
        "required": [
            "observed_symptoms", "severity_score", "vitals_abnormal",
            "pain_level", "onset", "relevant_history"
        ]
    });
    Arc::new(schema.as_object().cloned().unwrap_or_else(Map::new))
}

/// JSON Schema for stage-2 structured calls in both pipelines.
pub fn triage_decision_schema() -> Arc<Map<String, Value>> {
    let schema = json!({
        "type": "object",
        "properties": {
            "urgency_level": {"type": "string", "enum": ["immediate", "urgent", "routine", "non_urgent"]},
            "reasoning": {"type": "string"},
            "recommended_action": {"type": "string"}
        },
        "required": ["urgency_level", "reasoning", "recommended_action"]
    });
    Arc::new(schema.as_object().cloned().unwrap_or_else(Map::new))
}

fn require<'a>(
    candidate: &'a Map<String, Value>,
    field: &'static str,
) -> std::result::Result<&'a Value, ValidationFailure> {
    candidate
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ValidationFailure::new(field, "missing"))
}

fn require_str_list(
    candidate: &Map<String, Value>,
    field: &'static str,
) -> std::result::Result<Vec<String>, ValidationFailure> {
    let items = require(candidate, field)?
        .as_array()
        .ok_or_else(|| ValidationFailure::new(field, "expected an array of strings"))?;
    items
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| ValidationFailure::new(field, "expected an array of strings"))
        })
        .collect()
}

fn require_str(
    candidate: &Map<String, Value>,
    field: &'static str,
) -> std::result::Result<String, ValidationFailure> {
    require(candidate, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ValidationFailure::new(field, "expected a string"))
}

/// Validate a candidate stage-1 result against the assessment contract.
pub fn validate_assessment(
    candidate: &Value,
) -> std::result::Result<SymptomAssessment, ValidationFailure> {
    let obj = candidate
        .as_object()
        .ok_or_else(|| ValidationFailure::new("assessment", "candidate is not a JSON object"))?;

    let observed_symptoms = require_str_list(obj, "observed_symptoms")?;

    let severity = require(obj, "severity_score")?
        .as_i64()
        .ok_or_else(|| ValidationFailure::new("severity_score", "expected an integer"))?;
    if !(1..=10).contains(&severity) {
        return Err(ValidationFailure::new(
            "severity_score",
            format!("{severity} outside range 1..=10"),
        ));
    }

    let vitals_abnormal = require(obj, "vitals_abnormal")?
        .as_bool()
        .ok_or_else(|| ValidationFailure::new("vitals_abnormal", "expected a boolean"))?;

    let pain_token = require_str(obj, "pain_level")?;
    let pain_level = PainLevel::from_wire(&pain_token).ok_or_else(|| {
        ValidationFailure::new(
            "pain_level",
            format!("'{pain_token}' is not one of none|mild|moderate|severe"),
        )
    })?;

    let onset = require_str(obj, "onset")?;
    let relevant_history = require_str_list(obj, "relevant_history")?;

    Ok(SymptomAssessment {
        observed_symptoms,
        severity_score: severity as u8,
        vitals_abnormal,
        pain_level,
        onset,
        relevant_history,
    })
}

/// Validate a candidate stage-2 result against the decision contract.
pub fn validate_decision(
    candidate: &Value,
) -> std::result::Result<TriageDecision, ValidationFailure> {
    let obj = candidate
        .as_object()
        .ok_or_else(|| ValidationFailure::new("decision", "candidate is not a JSON object"))?;

    let urgency_token = require_str(obj, "urgency_level")?;
    let urgency_level = UrgencyLevel::from_wire(&urgency_token).ok_or_else(|| {
        ValidationFailure::new(
            "urgency_level",
            format!("'{urgency_token}' is not one of immediate|urgent|routine|non_urgent"),
        )
    })?;

    let reasoning = require_str(obj, "reasoning")?;
    let recommended_action = require_str(obj, "recommended_action")?;

    Ok(TriageDecision {
        urgency_level,
        reasoning,
        recommended_action,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessment_json(severity: i64) -> Value {
        json!({
            "observed_symptoms": ["throbbing headache", "mild light sensitivity"],
            "severity_score": severity,
            "vitals_abnormal": false,
            "pain_level": "moderate",
            "onset": "this morning",
            "relevant_history": ["occasional tension headaches"]
        })
    }

    #[test]
    fn severity_boundaries_accepted() {
        assert_eq!(
            validate_assessment(&assessment_json(1)).unwrap().severity_score,
            1
        );
        assert_eq!(
            validate_assessment(&assessment_json(10)).unwrap().severity_score,
            10
        );
    }

    #[test]
    fn severity_out_of_range_rejected() {
        for severity in [0, 11, 15, -3] {
            let err = validate_assessment(&assessment_json(severity)).unwrap_err();
            assert_eq!(err.field, "severity_score", "severity {severity}");
        }
    }

    #[test]
    fn missing_field_rejected() {
        let mut candidate = assessment_json(4);
        candidate.as_object_mut().unwrap().remove("onset");
        let err = validate_assessment(&candidate).unwrap_err();
        assert_eq!(err.field, "onset");
        assert_eq!(err.reason, "missing");
    }

    #[test]
    fn null_field_counts_as_missing() {
        let mut candidate = assessment_json(4);
        candidate["vitals_abnormal"] = Value::Null;
        let err = validate_assessment(&candidate).unwrap_err();
        assert_eq!(err.field, "vitals_abnormal");
    }

    #[test]
    fn wrong_type_rejected() {
        let mut candidate = assessment_json(4);
        candidate["observed_symptoms"] = json!("headache");
        let err = validate_assessment(&candidate).unwrap_err();
        assert_eq!(err.field, "observed_symptoms");
    }

    #[test]
    fn pain_level_outside_enum_rejected() {
        let mut candidate = assessment_json(4);
        candidate["pain_level"] = json!("excruciating");
        let err = validate_assessment(&candidate).unwrap_err();
        assert_eq!(err.field, "pain_level");
    }

    #[test]
    fn urgency_closed_set() {
        for token in ["immediate", "urgent", "routine", "non_urgent"] {
            let candidate = json!({
                "urgency_level": token,
                "reasoning": "r",
                "recommended_action": "a"
            });
            assert_eq!(
                validate_decision(&candidate).unwrap().urgency_level.as_str(),
                token
            );
        }
        for token in ["critical", "ROUTINE", "nonurgent", ""] {
            let candidate = json!({
                "urgency_level": token,
                "reasoning": "r",
                "recommended_action": "a"
            });
            let err = validate_decision(&candidate).unwrap_err();
            assert_eq!(err.field, "urgency_level", "token {token:?}");
        }
    }

    #[test]
    fn decision_roundtrips_through_serde() {
        let decision = TriageDecision {
            urgency_level: UrgencyLevel::NonUrgent,
            reasoning: "stable".to_string(),
            recommended_action: "self-care".to_string(),
        };
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["urgency_level"], "non_urgent");
        assert_eq!(validate_decision(&value).unwrap(), decision);
    }

    #[test]
    fn schema_bounds_match_validation() {
        let schema = symptom_assessment_schema();
        assert_eq!(schema["properties"]["severity_score"]["minimum"], 1);
        assert_eq!(schema["properties"]["severity_score"]["maximum"], 10);
        assert_eq!(schema["required"].as_array().unwrap().len(), 6);

        let schema = triage_decision_schema();
        let members = schema["properties"]["urgency_level"]["enum"]
            .as_array()
            .unwrap();
        assert_eq!(members.len(), 4);
    }
}
