use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolBackend, ToolCall};
use crate::StudyflowError;

/// Try `primary`; on failure substitute `secondary`.
///
/// When both fail the error names both attempts.
pub struct FallbackBackend {
    primary: Arc<dyn ToolBackend>,
    secondary: Arc<dyn ToolBackend>,
}

impl FallbackBackend {
    pub fn new(primary: Arc<dyn ToolBackend>, secondary: Arc<dyn ToolBackend>) -> Self {
        Self { primary, secondary }
    }
}

fn message(err: &StudyflowError) -> String {
    match err {
        StudyflowError::Dispatch { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl ToolBackend for FallbackBackend {
    fn name(&self) -> String {
        format!("{}+{}", self.primary.name(), self.secondary.name())
    }

    async fn invoke(&self, call: &ToolCall<'_>) -> Result<Value, StudyflowError> {
        let first = match self.primary.invoke(call).await {
            Ok(data) => return Ok(data),
            Err(e) => e,
        };
        tracing::warn!(
            tool = call.tool.as_str(),
            "{} failed, using {}: {}",
            self.primary.name(),
            self.secondary.name(),
            first
        );

        self.secondary.invoke(call).await.map_err(|second| {
            StudyflowError::dispatch(
                call.tool.as_str(),
                format!(
                    "{} failed: {}; {} failed: {}",
                    self.primary.name(),
                    message(&first),
                    self.secondary.name(),
                    message(&second)
                ),
            )
        })
    }
}
