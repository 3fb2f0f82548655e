//! Comparison harness: runs both pipelines on one scenario and reports
//! agreement and correctness.
//!
//! A pipeline failure is captured in its report slot; the comparison itself
//! never aborts because one side failed. Interpretation of the report is a
//! rendering concern, not a pass/fail signal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::contracts::UrgencyLevel;
use crate::error::Result;
use crate::pipelines;
use crate::scenario::Scenario;
use crate::service::InferenceService;

/// Terminal state of one pipeline within a comparison run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    Classified {
        urgency_level: UrgencyLevel,
        correct: bool,
    },
    Failed {
        error: String,
    },
}

impl PipelineOutcome {
    pub fn urgency(&self) -> Option<UrgencyLevel> {
        match self {
            PipelineOutcome::Classified { urgency_level, .. } => Some(*urgency_level),
            PipelineOutcome::Failed { .. } => None,
        }
    }

    fn capture(result: Result<UrgencyLevel>, expected: UrgencyLevel, pipeline: &str) -> Self {
        match result {
            Ok(urgency_level) => PipelineOutcome::Classified {
                urgency_level,
                correct: urgency_level == expected,
            },
            Err(err) => {
                tracing::warn!(pipeline, error = %err, "pipeline run failed");
                PipelineOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub run_id: Uuid,
    pub case_id: String,
    pub description: String,
    pub expected_label: UrgencyLevel,
    pub contract: PipelineOutcome,
    pub vibe: PipelineOutcome,
    /// `None` when either pipeline failed to classify.
    pub agreement: Option<bool>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Run both pipelines on `scenario` and interpret their outputs.
///
/// The pipelines share no state and no conversation; order of execution is
/// not significant.
pub async fn compare(service: &dyn InferenceService, scenario: &Scenario) -> ComparisonReport {
    let started_at = Utc::now();
    tracing::info!(case_id = %scenario.case_id, "running comparison");

    let contract = pipelines::contract::run(service, scenario)
        .await
        .map(|run| run.urgency_level);
    let vibe = pipelines::vibe::run(service, scenario)
        .await
        .map(|run| run.urgency_level);

    let contract = PipelineOutcome::capture(contract, scenario.expected_label, "contract");
    let vibe = PipelineOutcome::capture(vibe, scenario.expected_label, "vibe");

    let agreement = match (contract.urgency(), vibe.urgency()) {
        (Some(a), Some(b)) => Some(a == b),
        _ => None,
    };

    ComparisonReport {
        run_id: Uuid::new_v4(),
        case_id: scenario.case_id.clone(),
        description: scenario.description.clone(),
        expected_label: scenario.expected_label,
        contract,
        vibe,
        agreement,
        started_at,
        finished_at: Utc::now(),
    }
}

fn outcome_line(f: &mut fmt::Formatter<'_>, label: &str, outcome: &PipelineOutcome) -> fmt::Result {
    match outcome {
        PipelineOutcome::Classified {
            urgency_level,
            correct,
        } => {
            let verdict = if *correct { "CORRECT" } else { "INCORRECT" };
            writeln!(f, "  {label:<28}{urgency_level:<12}{verdict}")
        }
        PipelineOutcome::Failed { error } => writeln!(f, "  {label:<28}failed: {error}"),
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "SEMANTIC DRIFT COMPARISON - {}", self.case_id)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Scenario: {}", self.description)?;
        writeln!(f, "Expected classification: {}", self.expected_label)?;
        writeln!(f)?;
        outcome_line(f, "Contract (structured):", &self.contract)?;
        outcome_line(f, "Vibe (unstructured):", &self.vibe)?;
        writeln!(f)?;
        let conclusion = match self.agreement {
            Some(false) => "Different classifications: semantic drift between the pipelines.",
            Some(true) => "Same classification. Check stage outputs for reasoning differences.",
            None => "Comparison incomplete: at least one pipeline failed.",
        };
        writeln!(f, "{conclusion}")?;
        write!(f, "{rule}")
    }
}
