use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{CompletionClient, CompletionPrompt, LlmError, ModelInfo};
use crate::config::LlmConfig;

/// OpenAI-compatible chat-completions client (OpenRouter or OpenAI).
pub struct HttpCompletionClient {
    config: LlmConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.config.timeout_secs)
        } else {
            LlmError::Http(format!("Request failed: {}", e))
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::Disabled)?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user},
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        tracing::debug!(model = %self.config.model, "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::Http(format!(
                "HTTP {} from {}",
                response.status(),
                self.config.provider.display_name()
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("Failed to parse response: {}", e)))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        tracing::debug!(reply_len = text.len(), "Completion received");
        Ok(text)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: self.config.provider.display_name().to_string(),
            model: self.config.model.clone(),
            base_url: self.config.base_url.clone(),
            api_key_set: self.config.is_enabled(),
        }
    }

    fn is_available(&self) -> bool {
        self.config.is_enabled()
    }
}
