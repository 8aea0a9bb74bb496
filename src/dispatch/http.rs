use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolBackend, ToolCall};
use crate::models::{ConversationTurn, ParamMap, StudentProfile, ToolKind};
use crate::tools::schema::{
    integral, DEPTHS, DIFFICULTIES, MAX_FLASHCARDS, MIN_FLASHCARDS, NOTE_STYLES,
};
use crate::StudyflowError;

/// A real tool service reached over HTTP.
pub struct HttpToolBackend {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpToolBackend {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, StudyflowError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StudyflowError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout_secs,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ToolBackend for HttpToolBackend {
    fn name(&self) -> String {
        "http".to_string()
    }

    async fn invoke(&self, call: &ToolCall<'_>) -> Result<Value, StudyflowError> {
        let body = format_request(call);
        let tool = call.tool.as_str();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StudyflowError::dispatch(tool, format!("Request timed out after {}s", self.timeout_secs))
                } else {
                    StudyflowError::dispatch(tool, format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StudyflowError::dispatch(tool, format!("HTTP {}", status)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StudyflowError::dispatch(tool, format!("Invalid response body: {}", e)))
    }
}

/// Probe `{endpoint}/health`. Any error or non-2xx status is unhealthy.
pub async fn probe_health(client: &reqwest::Client, endpoint: &str) -> bool {
    let url = format!("{}/health", endpoint.trim_end_matches('/'));
    match client.get(&url).send().await {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            tracing::warn!("Health probe {} failed: {}", url, e);
            false
        }
    }
}

fn user_info(profile: &StudentProfile) -> Value {
    json!({
        "user_id": profile.id,
        "name": profile.name,
        "grade_level": profile.grade,
        "learning_style_summary": profile.learning_style,
        "emotional_state_summary": profile.emotional_state,
        "mastery_level_summary": profile.mastery_level,
    })
}

fn chat_history(history: &[ConversationTurn]) -> Value {
    history
        .iter()
        .map(|turn| json!({"role": turn.role.as_str(), "content": turn.text}))
        .collect()
}

fn text_or(params: &ParamMap, key: &str, default: &str) -> String {
    params
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(default)
        .to_string()
}

fn one_of(params: &ParamMap, key: &str, allowed: &[&str], default: &str) -> String {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|v| allowed.contains(v))
        .unwrap_or(default)
        .to_string()
}

fn flag_or(params: &ParamMap, key: &str, default: bool) -> bool {
    params.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Wire request for a tool service.
///
/// Out-of-range values are replaced with defaults and the count is clamped.
/// Only the fields each service accepts are sent.
pub fn format_request(call: &ToolCall<'_>) -> Value {
    let p = call.params;
    match call.tool {
        ToolKind::NoteMaker => json!({
            "user_info": user_info(call.profile),
            "chat_history": chat_history(call.history),
            "topic": text_or(p, "topic", "General Study"),
            "subject": text_or(p, "subject", "General"),
            "note_taking_style": one_of(p, "note_taking_style", NOTE_STYLES, "outline"),
            "include_examples": flag_or(p, "include_examples", true),
            "include_analogies": flag_or(p, "include_analogies", false),
        }),
        ToolKind::FlashcardGenerator => json!({
            "user_info": user_info(call.profile),
            "topic": text_or(p, "topic", "General Study"),
            "count": p
                .get("count")
                .and_then(integral)
                .unwrap_or(5)
                .clamp(MIN_FLASHCARDS, MAX_FLASHCARDS),
            "difficulty": one_of(p, "difficulty", DIFFICULTIES, "medium"),
            "subject": text_or(p, "subject", "General"),
            "include_examples": flag_or(p, "include_examples", true),
        }),
        ToolKind::ConceptExplainer => json!({
            "user_info": user_info(call.profile),
            "chat_history": chat_history(call.history),
            "concept_to_explain": text_or(p, "concept_to_explain", "basic concepts"),
            "current_topic": text_or(p, "current_topic", "General"),
            "desired_depth": one_of(p, "desired_depth", DEPTHS, "intermediate"),
        }),
    }
}
