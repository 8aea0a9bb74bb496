//! Intent and parameter extraction.
//!
//! Two strategies share the [`ExtractionStrategy`] contract: the language-model
//! strategy and the keyword heuristic. [`TieredExtractor`] runs the first and
//! falls back to the second on any failure, so callers only ever see an
//! error when the fallback itself fails.

pub mod heuristic;
pub mod llm;
pub mod prompt;

pub use heuristic::HeuristicStrategy;
pub use llm::LanguageModelStrategy;

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::CompletionClient;
use crate::models::{
    ConversationTurn, IntentAnalysis, OrchestrationRequest, StudentProfile, ToolParameterSet,
};
use crate::StudyflowError;

/// Everything a strategy may look at.
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    pub history: Vec<ConversationTurn>,
    pub message: String,
    pub profile: StudentProfile,
    /// Summary of the student's past usage, included in model prompts.
    pub personalization: Option<String>,
}

impl ExtractionContext {
    pub fn new(profile: StudentProfile, message: impl Into<String>) -> Self {
        Self {
            history: Vec::new(),
            message: message.into(),
            profile,
            personalization: None,
        }
    }

    pub fn from_request(request: &OrchestrationRequest) -> Self {
        Self {
            history: request.history.clone(),
            message: request.message.clone(),
            profile: request.profile.clone(),
            personalization: None,
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_personalization(mut self, personalization: Option<String>) -> Self {
        self.personalization = personalization;
        self
    }
}

/// A way of turning a conversation into tool choices and parameters.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Classify the current message.
    async fn analyze_intent(&self, ctx: &ExtractionContext) -> Result<IntentAnalysis, StudyflowError>;

    /// Parameters for exactly the tools in `tools_needed`, in that order.
    async fn extract_parameters(
        &self,
        tools_needed: &[String],
        ctx: &ExtractionContext,
    ) -> Result<ToolParameterSet, StudyflowError>;
}

/// Primary strategy with a fallback.
pub struct TieredExtractor {
    primary: Option<Arc<dyn ExtractionStrategy>>,
    fallback: Arc<dyn ExtractionStrategy>,
}

impl TieredExtractor {
    pub fn new(primary: Arc<dyn ExtractionStrategy>, fallback: Arc<dyn ExtractionStrategy>) -> Self {
        Self {
            primary: Some(primary),
            fallback,
        }
    }

    /// Heuristic only; used when no completion client is available.
    pub fn heuristic_only() -> Self {
        Self {
            primary: None,
            fallback: Arc::new(HeuristicStrategy::new()),
        }
    }

    /// Language model first when the client can answer, heuristic otherwise.
    pub fn for_client(client: Arc<dyn CompletionClient>) -> Self {
        if client.is_available() {
            Self::new(
                Arc::new(LanguageModelStrategy::new(client)),
                Arc::new(HeuristicStrategy::new()),
            )
        } else {
            Self::heuristic_only()
        }
    }
}

#[async_trait]
impl ExtractionStrategy for TieredExtractor {
    fn name(&self) -> &'static str {
        match &self.primary {
            Some(primary) => primary.name(),
            None => self.fallback.name(),
        }
    }

    async fn analyze_intent(&self, ctx: &ExtractionContext) -> Result<IntentAnalysis, StudyflowError> {
        if let Some(primary) = &self.primary {
            match primary.analyze_intent(ctx).await {
                Ok(analysis) => return Ok(analysis),
                Err(e) => tracing::warn!(
                    strategy = primary.name(),
                    "Intent analysis failed, using {}: {}",
                    self.fallback.name(),
                    e
                ),
            }
        }
        self.fallback.analyze_intent(ctx).await
    }

    async fn extract_parameters(
        &self,
        tools_needed: &[String],
        ctx: &ExtractionContext,
    ) -> Result<ToolParameterSet, StudyflowError> {
        if let Some(primary) = &self.primary {
            match primary.extract_parameters(tools_needed, ctx).await {
                Ok(params) => return Ok(params),
                Err(e) => tracing::warn!(
                    strategy = primary.name(),
                    "Parameter extraction failed, using {}: {}",
                    self.fallback.name(),
                    e
                ),
            }
        }
        self.fallback.extract_parameters(tools_needed, ctx).await
    }
}
