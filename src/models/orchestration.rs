use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{ConversationTurn, IntentAnalysis, StudentProfile, TeachingStyle, ToolParameterSet};
use super::{ToolResult, ValidationVerdict};

/// One orchestration call: who is asking, what was said, and how to teach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationRequest {
    #[serde(alias = "user_info")]
    pub profile: StudentProfile,
    #[serde(alias = "chat_history", default)]
    pub history: Vec<ConversationTurn>,
    #[serde(alias = "current_message")]
    pub message: String,
    #[serde(default)]
    pub teaching_style: TeachingStyle,
}

impl OrchestrationRequest {
    pub fn new(profile: StudentProfile, message: impl Into<String>) -> Self {
        Self {
            profile,
            history: Vec::new(),
            message: message.into(),
            teaching_style: TeachingStyle::default(),
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_style(mut self, style: TeachingStyle) -> Self {
        self.teaching_style = style;
        self
    }
}

/// The public result of an orchestration run. Always well-formed, even when
/// every stage failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestrationResponse {
    pub success: bool,
    pub selected_tools: Vec<String>,
    pub extracted_parameters: ToolParameterSet,
    pub validation: IndexMap<String, ValidationVerdict>,
    pub tool_responses: Vec<ToolResult>,
    pub reasoning: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_analysis: Option<IntentAnalysis>,
}

impl OrchestrationResponse {
    /// A failed response carrying nothing but the error.
    pub fn failure(reasoning: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            selected_tools: Vec::new(),
            extracted_parameters: ToolParameterSet::new(),
            validation: IndexMap::new(),
            tool_responses: Vec::new(),
            reasoning: reasoning.into(),
            error_message: Some(error.into()),
            context_analysis: None,
        }
    }
}
