//! Deterministic scripted inference service.
//!
//! Replays canned replies in FIFO order and records every outgoing request
//! (full conversation plus schema, when one was attached). Used by the test
//! suite and by `--offline` demo runs; an exhausted script is an explicit
//! service failure, never a silent default.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::service::traits::{Conversation, InferenceService, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Free,
    Structured,
}

/// One outgoing request as the service saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub kind: RequestKind,
    pub history: Conversation,
    pub schema: Option<Arc<Map<String, Value>>>,
}

impl RecordedRequest {
    /// All turn text concatenated, for substring assertions.
    pub fn full_text(&self) -> String {
        self.history
            .turns()
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Default)]
pub struct StubService {
    free_replies: Mutex<VecDeque<String>>,
    structured_replies: Mutex<VecDeque<Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next `complete_free` call.
    pub fn with_free(self, text: impl Into<String>) -> Self {
        self.free_replies
            .lock()
            .expect("stub lock poisoned")
            .push_back(text.into());
        self
    }

    /// Queue a reply for the next `complete_structured` call.
    pub fn with_structured(self, value: Value) -> Self {
        self.structured_replies
            .lock()
            .expect("stub lock poisoned")
            .push_back(value);
        self
    }

    /// Everything the service was asked, in call order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("stub lock poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("stub lock poisoned").len()
    }

    fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .expect("stub lock poisoned")
            .push(request);
    }
}

#[async_trait]
impl InferenceService for StubService {
    async fn complete_free(&self, history: &Conversation) -> Result<String, ServiceError> {
        self.record(RecordedRequest {
            kind: RequestKind::Free,
            history: history.clone(),
            schema: None,
        });
        self.free_replies
            .lock()
            .expect("stub lock poisoned")
            .pop_front()
            .ok_or_else(|| ServiceError::Empty("scripted free replies exhausted".to_string()))
    }

    async fn complete_structured(
        &self,
        history: &Conversation,
        schema: Arc<Map<String, Value>>,
    ) -> Result<Value, ServiceError> {
        self.record(RecordedRequest {
            kind: RequestKind::Structured,
            history: history.clone(),
            schema: Some(schema),
        });
        self.structured_replies
            .lock()
            .expect("stub lock poisoned")
            .pop_front()
            .ok_or_else(|| ServiceError::Empty("scripted structured replies exhausted".to_string()))
    }
}

/// Script a full comparison run for a built-in scenario, so the binary can
/// demonstrate the report format without credentials. Reply order matches
/// the harness (contract pipeline first, then vibe).
pub fn demo_script(scenario: &crate::scenario::Scenario) -> StubService {
    match scenario.case_id.as_str() {
        "crushing_chest_pain" => chest_pain_script(),
        _ => headache_script(),
    }
}

/// The drift demonstration: the contract pipeline sees a facts-only
/// assessment and stays at routine, while the vibe pipeline's speculative
/// stage-1 text drags its classification upward.
fn headache_script() -> StubService {
    StubService::new()
        .with_structured(serde_json::json!({
            "observed_symptoms": [
                "throbbing headache, 4/10",
                "mild sensitivity to light",
                "no nausea",
                "no vision changes"
            ],
            "severity_score": 4,
            "vitals_abnormal": false,
            "pain_level": "moderate",
            "onset": "this morning",
            "relevant_history": ["occasional tension headaches", "no migraines"]
        }))
        .with_structured(serde_json::json!({
            "urgency_level": "routine",
            "reasoning": "Moderate headache with normal vital signs and an unremarkable history.",
            "recommended_action": "Schedule a routine appointment; advise rest and hydration."
        }))
        .with_free(
            "The throbbing quality with photophobia could suggest an evolving migraine, \
             and while the vitals are reassuring we can't fully exclude something more \
             serious like an early intracranial process. The patient herself is worried \
             it might be something serious. Worth treating cautiously.",
        )
        .with_structured(serde_json::json!({
            "urgency_level": "urgent",
            "reasoning": "Analysis raised possible migraine or a more serious intracranial cause.",
            "recommended_action": "Arrange assessment within 24 hours."
        }))
}

/// A clear-cut presentation where both pipelines agree on immediate.
fn chest_pain_script() -> StubService {
    StubService::new()
        .with_structured(serde_json::json!({
            "observed_symptoms": [
                "crushing substernal chest pain radiating to left arm, 9/10",
                "diaphoresis",
                "shortness of breath"
            ],
            "severity_score": 9,
            "vitals_abnormal": true,
            "pain_level": "severe",
            "onset": "40 minutes ago",
            "relevant_history": ["hypertension", "smoker", "family history of MI"]
        }))
        .with_structured(serde_json::json!({
            "urgency_level": "immediate",
            "reasoning": "High-severity chest pain with abnormal vital signs and cardiac risk factors.",
            "recommended_action": "Send to emergency department immediately."
        }))
        .with_free(
            "Crushing chest pain with radiation, diaphoresis, hypotension and tachycardia \
             in a patient with cardiac risk factors is an acute coronary syndrome until \
             proven otherwise. This needs emergency evaluation now.",
        )
        .with_structured(serde_json::json!({
            "urgency_level": "immediate",
            "reasoning": "Presentation is consistent with acute coronary syndrome.",
            "recommended_action": "Send to emergency department immediately."
        }))
}
