//! Language-model completion collaborator.
//!
//! The orchestrator only needs "prompt in, free text out". [`CompletionClient`]
//! is that contract; [`HttpCompletionClient`] speaks the OpenAI-compatible
//! chat-completions API and [`NoopCompletionClient`] is the disabled stand-in
//! used when no API key is configured.

mod http;
pub mod json;

pub use http::HttpCompletionClient;
pub use json::extract_json_object;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Completion errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("Language model is not configured")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Language model returned an empty response")]
    EmptyResponse,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

/// A two-part chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPrompt {
    pub system: String,
    pub user: String,
}

/// Description of the configured model, safe to show to users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key_set: bool,
}

impl ModelInfo {
    pub fn none() -> Self {
        Self {
            provider: "None".to_string(),
            model: "None".to_string(),
            base_url: "None".to_string(),
            api_key_set: false,
        }
    }
}

/// Text-completion capability: fallible and possibly slow.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the prompt and return the model's free-text reply.
    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, LlmError>;

    fn model_info(&self) -> ModelInfo;

    /// Whether calls can succeed at all (false for the noop client).
    fn is_available(&self) -> bool;
}

/// Disabled completion client. Every call fails with [`LlmError::Disabled`].
pub struct NoopCompletionClient;

impl Default for NoopCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NoopCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CompletionClient for NoopCompletionClient {
    async fn complete(&self, _prompt: &CompletionPrompt) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::none()
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Build the completion client for a config: HTTP when a key is present,
/// noop otherwise.
pub fn create_completion_client(config: &LlmConfig) -> Arc<dyn CompletionClient> {
    if !config.is_enabled() {
        tracing::warn!("No language-model API key configured; extraction will use heuristics only");
        return Arc::new(NoopCompletionClient::new());
    }

    match HttpCompletionClient::new(config.clone()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::warn!(
                "Failed to build completion client: {}. Extraction will use heuristics only.",
                e
            );
            Arc::new(NoopCompletionClient::new())
        }
    }
}

/// Result of a round-trip connection test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionReport {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub model_info: ModelInfo,
}

/// Send a trivial prompt and report whether the model answered.
pub async fn test_connection(client: &dyn CompletionClient) -> ConnectionReport {
    let prompt = CompletionPrompt {
        system: "You are a connectivity probe.".to_string(),
        user: "Hello! Please respond with 'Connection successful'".to_string(),
    };
    match client.complete(&prompt).await {
        Ok(response) => ConnectionReport {
            status: "success".to_string(),
            response: Some(response),
            error: None,
            model_info: client.model_info(),
        },
        Err(e) => ConnectionReport {
            status: "error".to_string(),
            response: None,
            error: Some(e.to_string()),
            model_info: client.model_info(),
        },
    }
}
