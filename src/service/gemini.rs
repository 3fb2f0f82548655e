//! Gemini `generateContent` client over HTTP.
//!
//! Structured calls set `responseMimeType: application/json` plus a
//! `responseSchema` in the generation config, so the service either returns
//! a schema-conformant object or the call fails explicitly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value, json};

use crate::config::Config;
use crate::service::traits::{Conversation, InferenceService, ServiceError};

#[derive(Debug, Clone)]
pub struct GeminiService {
    endpoint: String,
    model: String,
    api_key: String,
    timeout_ms: u64,
    max_output_tokens: u32,
    temperature: f32,
    client: Client,
}

impl GeminiService {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config
            .runtime
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("GEMINI_API_KEY is not set"))?;

        let timeout_ms = config.system.request_timeout_ms;
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self {
            endpoint: config.system.endpoint.trim_end_matches('/').to_string(),
            model: config.system.model.clone(),
            api_key,
            timeout_ms,
            max_output_tokens: config.system.max_output_tokens,
            temperature: config.system.temperature,
            client,
        })
    }

    fn contents(history: &Conversation) -> Vec<Value> {
        history
            .turns()
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role.as_wire(),
                    "parts": [{"text": turn.text}]
                })
            })
            .collect()
    }

    async fn generate(
        &self,
        history: &Conversation,
        generation_config: Value,
    ) -> Result<String, ServiceError> {
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = json!({
            "contents": Self::contents(history),
            "generationConfig": generation_config,
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: truncate_snippet(message.trim(), 500),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;

        let text = extract_text(&payload);
        if text.trim().is_empty() {
            return Err(ServiceError::Empty(format!(
                "no candidate text in response: {}",
                truncate_snippet(&payload.to_string(), 200)
            )));
        }

        tracing::debug!(model = %self.model, turns = history.len(), "generateContent ok");
        Ok(text)
    }

    fn map_transport_err(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            ServiceError::Http(err.to_string())
        }
    }
}

#[async_trait]
impl InferenceService for GeminiService {
    async fn complete_free(&self, history: &Conversation) -> Result<String, ServiceError> {
        let generation_config = json!({
            "temperature": self.temperature,
            "maxOutputTokens": self.max_output_tokens,
        });
        self.generate(history, generation_config).await
    }

    async fn complete_structured(
        &self,
        history: &Conversation,
        schema: Arc<Map<String, Value>>,
    ) -> Result<Value, ServiceError> {
        let generation_config = json!({
            "temperature": self.temperature,
            "maxOutputTokens": self.max_output_tokens,
            "responseMimeType": "application/json",
            "responseSchema": Value::Object((*schema).clone()),
        });
        let text = self.generate(history, generation_config).await?;
        serde_json::from_str(&text).map_err(|e| {
            ServiceError::Parse(format!(
                "structured response is not valid JSON: {e}: {}",
                truncate_snippet(text.trim(), 200)
            ))
        })
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(payload: &Value) -> String {
    let Some(parts) = payload["candidates"][0]["content"]["parts"].as_array() else {
        return String::new();
    };
    parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect::<Vec<_>>()
        .join("")
}

fn truncate_snippet(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    let cut: String = input.chars().take(max).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_joins_parts() {
        let payload = json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\":"}, {"text": " 1}"}]}
            }]
        });
        assert_eq!(extract_text(&payload), "{\"a\": 1}");
    }

    #[test]
    fn extract_text_handles_missing_candidates() {
        assert_eq!(extract_text(&json!({"promptFeedback": {}})), "");
    }
}
