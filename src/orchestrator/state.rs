use indexmap::IndexMap;

use crate::extraction::ExtractionContext;
use crate::models::{
    IntentAnalysis, OrchestrationRequest, OrchestrationResponse, TeachingStyle, ToolParameterSet,
    ToolResult, ValidationVerdict,
};

/// Pipeline stages, in the order a successful run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AnalyzeContext,
    ExtractParameters,
    ValidateParameters,
    ExecuteTools,
    GenerateResponse,
    HandleError,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::AnalyzeContext => "analyze_context",
            Stage::ExtractParameters => "extract_parameters",
            Stage::ValidateParameters => "validate_parameters",
            Stage::ExecuteTools => "execute_tools",
            Stage::GenerateResponse => "generate_response",
            Stage::HandleError => "handle_error",
            Stage::Done => "done",
        }
    }
}

/// Everything one run accumulates as it moves through the stages.
#[derive(Debug, Clone)]
pub struct OrchestrationState {
    pub context: ExtractionContext,
    pub teaching_style: TeachingStyle,
    pub intent: Option<IntentAnalysis>,
    pub parameters: ToolParameterSet,
    pub validation: IndexMap<String, ValidationVerdict>,
    pub tool_responses: Vec<ToolResult>,
    pub reasoning: String,
    pub error: Option<String>,
    pub success: bool,
}

impl OrchestrationState {
    pub fn new(request: &OrchestrationRequest, context: ExtractionContext) -> Self {
        Self {
            context,
            teaching_style: request.teaching_style,
            intent: None,
            parameters: ToolParameterSet::new(),
            validation: IndexMap::new(),
            tool_responses: Vec::new(),
            reasoning: String::new(),
            error: None,
            success: false,
        }
    }

    pub fn tools_needed(&self) -> &[String] {
        self.intent
            .as_ref()
            .map(|i| i.tools_needed.as_slice())
            .unwrap_or_default()
    }

    /// Parameters of the tools that passed validation, in extraction order.
    pub fn eligible(&self) -> ToolParameterSet {
        self.parameters
            .iter()
            .filter(|(tool, _)| self.validation.get(*tool).is_some_and(|v| v.is_valid))
            .map(|(tool, params)| (tool.clone(), params.clone()))
            .collect()
    }

    /// Record an error unless an earlier stage already did.
    pub fn fail(&mut self, error: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(error.into());
        }
    }

    pub fn into_response(self) -> OrchestrationResponse {
        OrchestrationResponse {
            success: self.success,
            selected_tools: self.parameters.keys().cloned().collect(),
            extracted_parameters: self.parameters,
            validation: self.validation,
            tool_responses: self.tool_responses,
            reasoning: self.reasoning,
            error_message: self.error,
            context_analysis: self.intent,
        }
    }
}

/// The stage that follows `stage`, given what the run has produced so far.
pub fn step(stage: Stage, state: &OrchestrationState) -> Stage {
    match stage {
        Stage::AnalyzeContext => Stage::ExtractParameters,
        Stage::ExtractParameters if state.parameters.is_empty() => Stage::HandleError,
        Stage::ExtractParameters => Stage::ValidateParameters,
        Stage::ValidateParameters if state.validation.values().any(|v| v.is_valid) => {
            Stage::ExecuteTools
        }
        Stage::ValidateParameters => Stage::HandleError,
        Stage::ExecuteTools => Stage::GenerateResponse,
        Stage::GenerateResponse | Stage::HandleError | Stage::Done => Stage::Done,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentProfile;

    fn state() -> OrchestrationState {
        let profile = StudentProfile {
            id: "s1".into(),
            name: "Ana".into(),
            grade: "9".into(),
            learning_style: String::new(),
            emotional_state: String::new(),
            mastery_level: String::new(),
        };
        let request = OrchestrationRequest::new(profile, "hi");
        let context = ExtractionContext::from_request(&request);
        OrchestrationState::new(&request, context)
    }

    #[test]
    fn test_empty_extraction_routes_to_error() {
        let state = state();
        assert_eq!(step(Stage::AnalyzeContext, &state), Stage::ExtractParameters);
        assert_eq!(step(Stage::ExtractParameters, &state), Stage::HandleError);
        assert_eq!(step(Stage::HandleError, &state), Stage::Done);
    }

    #[test]
    fn test_any_valid_tool_routes_to_execution() {
        let mut state = state();
        state.parameters.insert("note_maker".into(), Default::default());
        state.parameters.insert("concept_explainer".into(), Default::default());
        assert_eq!(step(Stage::ExtractParameters, &state), Stage::ValidateParameters);

        state
            .validation
            .insert("note_maker".into(), ValidationVerdict::invalid("Missing required parameter: topic"));
        state
            .validation
            .insert("concept_explainer".into(), ValidationVerdict::invalid("bad depth"));
        assert_eq!(step(Stage::ValidateParameters, &state), Stage::HandleError);

        state
            .validation
            .insert("concept_explainer".into(), ValidationVerdict::valid());
        assert_eq!(step(Stage::ValidateParameters, &state), Stage::ExecuteTools);
        assert_eq!(
            state.eligible().keys().collect::<Vec<_>>(),
            vec!["concept_explainer"]
        );
        assert_eq!(step(Stage::ExecuteTools, &state), Stage::GenerateResponse);
        assert_eq!(step(Stage::GenerateResponse, &state), Stage::Done);
    }

    #[test]
    fn test_first_error_is_kept() {
        let mut state = state();
        state.fail("Context analysis failed: boom");
        state.fail("No tools identified from context analysis");
        let response = state.into_response();
        assert!(!response.success);
        assert_eq!(response.error_message.as_deref(), Some("Context analysis failed: boom"));
    }
}
