//! Domain-specific error types for drift-harness

use serde::Serialize;
use thiserror::Error;

use crate::contracts::ValidationFailure;
use crate::service::ServiceError;

/// Which of the two inference calls raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SymptomAnalysis,
    TriageClassification,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::SymptomAnalysis => write!(f, "stage 1 (symptom analysis)"),
            Stage::TriageClassification => write!(f, "stage 2 (triage classification)"),
        }
    }
}

/// Main error type for the drift harness.
///
/// Failures are terminal for the pipeline run that raised them; the
/// comparison harness captures them per pipeline and never propagates.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error in {stage}: {failure}")]
    Validation {
        stage: Stage,
        failure: ValidationFailure,
    },

    #[error("Service error in {stage}: {cause}")]
    Service {
        stage: Stage,
        #[source]
        cause: ServiceError,
    },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for HarnessError {
    fn from(err: anyhow::Error) -> Self {
        HarnessError::Config {
            message: err.to_string(),
        }
    }
}

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
