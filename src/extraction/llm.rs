use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::prompt::{intent_prompt, parameter_prompt};
use super::{ExtractionContext, ExtractionStrategy};
use crate::llm::{extract_json_object, CompletionClient, LlmError};
use crate::models::{IntentAnalysis, IntentSource, ToolParameterSet};
use crate::StudyflowError;

/// Confidence assumed when the model omits its own score.
const DEFAULT_MODEL_CONFIDENCE: f64 = 0.8;

/// Extraction through a language-model completion.
///
/// Fails rather than guessing: any malformed or incomplete reply is an
/// error, which the tiered extractor turns into a heuristic fallback.
pub struct LanguageModelStrategy {
    client: Arc<dyn CompletionClient>,
}

impl LanguageModelStrategy {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    async fn complete_json(
        &self,
        prompt: &crate::llm::CompletionPrompt,
    ) -> Result<Map<String, Value>, StudyflowError> {
        tracing::debug!(prompt = %prompt.user, "Requesting completion");
        let reply = self.client.complete(prompt).await?;
        tracing::debug!(reply = %reply, "Raw completion reply");
        extract_json_object(&reply)
            .ok_or_else(|| LlmError::InvalidJson("No JSON object in reply".to_string()).into())
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn string_field(map: &Map<String, Value>, keys: &[&str], default: &str) -> String {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Turn a decoded intent reply into an analysis. Errors when no tools are named.
pub fn parse_intent(map: &Map<String, Value>) -> Result<IntentAnalysis, StudyflowError> {
    let tools_needed = string_list(map.get("tools_needed"));
    if tools_needed.is_empty() {
        return Err(StudyflowError::Extraction(
            "Model reply named no tools".to_string(),
        ));
    }

    let confidence = ["confidence_score", "confidence"]
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_f64))
        .unwrap_or(DEFAULT_MODEL_CONFIDENCE);

    Ok(IntentAnalysis {
        tools_needed,
        primary_intent: string_field(map, &["intent", "primary_intent"], "learning"),
        topics: string_list(map.get("topics")),
        subject: string_field(map, &["subject"], "general"),
        difficulty_indicators: string_list(map.get("difficulty_indicators")),
        confidence,
        source: IntentSource::LanguageModel,
    }
    .normalized())
}

/// Pick exactly the requested tools out of a decoded parameter reply.
/// Errors when any requested tool is missing or not an object.
pub fn parse_parameters(
    tools_needed: &[String],
    mut map: Map<String, Value>,
) -> Result<ToolParameterSet, StudyflowError> {
    tools_needed
        .iter()
        .map(|tool| match map.remove(tool) {
            Some(Value::Object(params)) => Ok((tool.clone(), params)),
            _ => Err(StudyflowError::Extraction(format!(
                "Model reply has no parameters for {}",
                tool
            ))),
        })
        .collect()
}

#[async_trait]
impl ExtractionStrategy for LanguageModelStrategy {
    fn name(&self) -> &'static str {
        "language_model"
    }

    async fn analyze_intent(&self, ctx: &ExtractionContext) -> Result<IntentAnalysis, StudyflowError> {
        let map = self.complete_json(&intent_prompt(ctx)).await?;
        parse_intent(&map)
    }

    async fn extract_parameters(
        &self,
        tools_needed: &[String],
        ctx: &ExtractionContext,
    ) -> Result<ToolParameterSet, StudyflowError> {
        let map = self
            .complete_json(&parameter_prompt(tools_needed, ctx))
            .await?;
        parse_parameters(tools_needed, map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionPrompt, ModelInfo};
    use crate::models::StudentProfile;
    use serde_json::json;

    struct CannedClient(Result<String, LlmError>);

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, _prompt: &CompletionPrompt) -> Result<String, LlmError> {
            self.0.clone()
        }

        fn model_info(&self) -> ModelInfo {
            ModelInfo::none()
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn strategy(reply: Result<&str, LlmError>) -> LanguageModelStrategy {
        LanguageModelStrategy::new(Arc::new(CannedClient(reply.map(str::to_string))))
    }

    fn ctx() -> ExtractionContext {
        ExtractionContext::new(
            StudentProfile {
                id: "s1".into(),
                name: "Ayaan".into(),
                grade: "10".into(),
                learning_style: String::new(),
                emotional_state: String::new(),
                mastery_level: String::new(),
            },
            "Explain derivatives",
        )
    }

    #[tokio::test]
    async fn test_intent_from_wrapped_json() {
        let s = strategy(Ok(
            "Analysis:\n```json\n{\"tools_needed\": [\"concept_explainer\", \"concept_explainer\"], \"intent\": \"explaining\", \"topics\": [\"derivatives\"], \"subject\": \"mathematics\", \"confidence_score\": 0.92}\n```",
        ));
        let analysis = s.analyze_intent(&ctx()).await.expect("analysis");
        assert_eq!(analysis.tools_needed, vec!["concept_explainer"]);
        assert_eq!(analysis.primary_intent, "explaining");
        assert_eq!(analysis.subject, "mathematics");
        assert_eq!(analysis.confidence, 0.92);
        assert_eq!(analysis.source, IntentSource::LanguageModel);
    }

    #[tokio::test]
    async fn test_intent_without_tools_is_error() {
        let s = strategy(Ok(r#"{"tools_needed": [], "intent": "chat"}"#));
        assert!(matches!(
            s.analyze_intent(&ctx()).await,
            Err(StudyflowError::Extraction(_))
        ));
    }

    #[tokio::test]
    async fn test_prose_reply_is_error() {
        let s = strategy(Ok("I think they want notes."));
        assert!(matches!(
            s.analyze_intent(&ctx()).await,
            Err(StudyflowError::Completion(LlmError::InvalidJson(_)))
        ));
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        let s = strategy(Err(LlmError::Timeout(30)));
        assert!(matches!(
            s.extract_parameters(&["note_maker".into()], &ctx()).await,
            Err(StudyflowError::Completion(LlmError::Timeout(30)))
        ));
    }

    #[tokio::test]
    async fn test_parameters_drop_unrequested_tools() {
        let s = strategy(Ok(r#"{
            "concept_explainer": {"concept_to_explain": "derivatives", "current_topic": "calculus", "desired_depth": "basic"},
            "note_maker": {"topic": "x"}
        }"#));
        let params = s
            .extract_parameters(&["concept_explainer".into()], &ctx())
            .await
            .expect("params");
        assert_eq!(params.len(), 1);
        assert_eq!(params["concept_explainer"]["desired_depth"], "basic");
    }

    #[test]
    fn test_parameters_missing_tool_is_error() {
        let map = json!({"note_maker": {"topic": "x"}, "flashcard_generator": "oops"});
        let map = map.as_object().cloned().unwrap();
        let err = parse_parameters(&["note_maker".into(), "flashcard_generator".into()], map);
        assert!(err.is_err());
    }

    #[test]
    fn test_intent_defaults_for_missing_fields() {
        let map = json!({"tools_needed": ["note_maker"], "confidence": 4.0});
        let analysis = parse_intent(map.as_object().unwrap()).expect("analysis");
        assert_eq!(analysis.primary_intent, "learning");
        assert_eq!(analysis.subject, "general");
        assert!(analysis.topics.is_empty());
        assert_eq!(analysis.confidence, 1.0);
    }
}
