//! Unstructured pipeline: one conversational session whose accumulated
//! history is passed wholesale into the second call.
//!
//! The pipeline owns the only copy of the history; turns are appended by
//! value. Stage-1 output is unconstrained text and cannot fail validation,
//! so the single validation surface is stage 2.

use crate::contracts::{self, TriageDecision, UrgencyLevel};
use crate::error::{HarnessError, Result, Stage};
use crate::prompts;
use crate::scenario::Scenario;
use crate::service::{Conversation, InferenceService, Role};

/// Successful vibe-pipeline run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VibeRun {
    pub analysis: String,
    pub decision: TriageDecision,
    pub urgency_level: UrgencyLevel,
}

pub async fn run(service: &dyn InferenceService, scenario: &Scenario) -> Result<VibeRun> {
    // Stage 1: open-ended analysis, speculation invited.
    let history = Conversation::from_prompt(prompts::open_analysis(&scenario.narrative));
    let analysis = service
        .complete_free(&history)
        .await
        .map_err(|cause| HarnessError::Service {
            stage: Stage::SymptomAnalysis,
            cause,
        })?;
    tracing::debug!(case_id = %scenario.case_id, chars = analysis.len(), "free analysis received");

    // Stage 2: the entire accumulated history, stage-1 text included, plus
    // the classification instruction. Constrained output keeps the result
    // comparable to the contract pipeline.
    let history = history
        .with_turn(Role::Model, &analysis)
        .with_turn(Role::User, prompts::classify_from_history());
    let candidate = service
        .complete_structured(&history, contracts::triage_decision_schema())
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
    tracing::debug!(case_id = %scenario.case_id, urgency = %decision.urgency_level, "vibe pipeline classified");

    Ok(VibeRun {
        urgency_level: decision.urgency_level,
        analysis,
        decision,
    })
}
