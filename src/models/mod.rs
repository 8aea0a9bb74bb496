pub mod intent;
pub mod orchestration;
pub mod profile;
pub mod tool;

pub use intent::{IntentAnalysis, IntentSource};
pub use orchestration::{OrchestrationRequest, OrchestrationResponse};
pub use profile::{ConversationTurn, Role, StudentProfile, TeachingStyle};
pub use tool::{ParamMap, ToolKind, ToolParameterSet, ToolResult, ValidationVerdict};
