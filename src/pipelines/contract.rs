//! Structured pipeline: two context-isolated inference calls connected only
//! through a validated contract object.
//!
//! Stage 2 is built from the serialized `SymptomAssessment` and nothing
//! else. No raw narrative and no stage-1 rationale is ever attached, so
//! information without a field in the contract cannot reach the classifier.

use crate::contracts::{self, SymptomAssessment, TriageDecision, UrgencyLevel};
use crate::error::{HarnessError, Result, Stage};
use crate::prompts;
use crate::scenario::Scenario;
use crate::service::{Conversation, InferenceService};

/// Successful contract-pipeline run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ContractRun {
    pub assessment: SymptomAssessment,
    pub decision: TriageDecision,
    pub urgency_level: UrgencyLevel,
}

pub async fn run(service: &dyn InferenceService, scenario: &Scenario) -> Result<ContractRun> {
    // Stage 1: fresh, context-isolated call constrained to the assessment
    // schema. Aborts before stage 2 on any service or validation failure.
    let stage1 = Conversation::from_prompt(prompts::extract_assessment(&scenario.narrative));
    let candidate = service
        .complete_structured(&stage1, contracts::symptom_assessment_schema())
        .await
        .map_err(|cause| HarnessError::Service {
            stage: Stage::SymptomAnalysis,
            cause,
        })?;
    let assessment = contracts::validate_assessment(&candidate).map_err(|failure| {
        HarnessError::Validation {
            stage: Stage::SymptomAnalysis,
            failure,
        }
    })?;
    tracing::debug!(case_id = %scenario.case_id, severity = assessment.severity_score, "assessment validated");

    // Stage 2: a new conversation whose prompt embeds the serialized
    // assessment only. Shares no history with stage 1.
    let payload = serde_json::to_string(&assessment)?;
    let stage2 = Conversation::from_prompt(prompts::classify_from_assessment(&payload));
    let candidate = service
        .complete_structured(&stage2, contracts::triage_decision_schema())
        .await
        .map_err(|cause| HarnessError::Service {
            stage: Stage::TriageClassification,
            cause,
        })?;
    let decision = contracts::validate_decision(&candidate).map_err(|failure| {
        HarnessError::Validation {
            stage: Stage::TriageClassification,
            failure,
        }
    })?;
    tracing::debug!(case_id = %scenario.case_id, urgency = %decision.urgency_level, "contract pipeline classified");

    Ok(ContractRun {
        urgency_level: decision.urgency_level,
        assessment,
        decision,
    })
}
