//! Tool identities, parameter sets, verdicts, and results.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for a single tool, keyed by parameter name.
pub type ParamMap = serde_json::Map<String, Value>;

/// Tool name → parameters, in `tools_needed` order.
pub type ToolParameterSet = IndexMap<String, ParamMap>;

/// The educational tools the orchestrator knows how to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    NoteMaker,
    FlashcardGenerator,
    ConceptExplainer,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [
        ToolKind::NoteMaker,
        ToolKind::FlashcardGenerator,
        ToolKind::ConceptExplainer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::NoteMaker => "note_maker",
            ToolKind::FlashcardGenerator => "flashcard_generator",
            ToolKind::ConceptExplainer => "concept_explainer",
        }
    }

    /// Resolve a tool name, returning `None` for names outside the registry.
    pub fn from_name(name: &str) -> Option<Self> {
        ToolKind::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::from_name(s.trim()).ok_or_else(|| format!("Unknown tool '{}'", s))
    }
}

/// Outcome of validating one tool's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationVerdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Result of one dispatched tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn ok(tool_name: impl Into<String>, data: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            data,
            error: None,
        }
    }

    pub fn failed(tool_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            data: Value::Object(ParamMap::new()),
            error: Some(error.into()),
        }
    }
}
