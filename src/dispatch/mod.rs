//! Tool dispatch.
//!
//! Each tool call goes through a [`ToolBackend`]. The simulator is always
//! available; an HTTP backend is added per tool when an endpoint is
//! configured, wrapped with the simulator in a [`FallbackBackend`].

pub mod dispatcher;
pub mod fallback;
pub mod http;
pub mod simulator;
pub mod templates;

pub use dispatcher::ToolDispatcher;
pub use fallback::FallbackBackend;
pub use http::HttpToolBackend;
pub use simulator::SimulatorBackend;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{ConversationTurn, ParamMap, StudentProfile, ToolKind};
use crate::StudyflowError;

/// One tool invocation.
#[derive(Debug, Clone, Copy)]
pub struct ToolCall<'a> {
    pub tool: ToolKind,
    pub params: &'a ParamMap,
    pub profile: &'a StudentProfile,
    pub history: &'a [ConversationTurn],
}

/// Something that can produce a tool's payload.
#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Short label used in logs and combined error text.
    fn name(&self) -> String;

    async fn invoke(&self, call: &ToolCall<'_>) -> Result<Value, StudyflowError>;
}
