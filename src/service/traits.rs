use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Speaker of a conversation turn, in the wire vocabulary of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// An ordered conversation history. Appending produces a new value; an
/// existing `Conversation` is never mutated, so a pipeline can hand a stage
/// its history without sharing mutable state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-turn conversation: the degenerate case used for
    /// context-isolated calls.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn {
                role: Role::User,
                text: prompt.into(),
            }],
        }
    }

    pub fn with_turn(&self, role: Role, text: impl Into<String>) -> Self {
        let mut turns = self.turns.clone();
        turns.push(Turn {
            role,
            text: text.into(),
        });
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("http error: {0}")]
    Http(String),
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("empty response: {0}")]
    Empty(String),
}

/// The consumed inference capability. Implementations are injected into each
/// pipeline call so tests can substitute a deterministic stub.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Unconstrained natural-language completion over a conversation.
    async fn complete_free(&self, history: &Conversation) -> Result<String, ServiceError>;

    /// Completion constrained to `schema`. Returns the parsed JSON object,
    /// or fails explicitly when the service cannot conform.
    async fn complete_structured(
        &self,
        history: &Conversation,
        schema: Arc<Map<String, Value>>,
    ) -> Result<Value, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_turn_leaves_original_untouched() {
        let base = Conversation::from_prompt("first");
        let extended = base.with_turn(Role::Model, "second");
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.turns()[1].role, Role::Model);
    }
}
