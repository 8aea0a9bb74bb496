use std::sync::Arc;

use super::Orchestrator;
use crate::models::{ConversationTurn, OrchestrationRequest, OrchestrationResponse};
use crate::session::SessionTracker;

/// Orchestration with per-user memory.
///
/// Records both sides of the exchange and every tool call, and feeds the
/// user's usage summary back into extraction.
#[derive(Clone)]
pub struct TutorSession {
    orchestrator: Arc<Orchestrator>,
    tracker: SessionTracker,
}

impl TutorSession {
    pub fn new(orchestrator: Arc<Orchestrator>, tracker: SessionTracker) -> Self {
        Self {
            orchestrator,
            tracker,
        }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub async fn handle(&self, request: &OrchestrationRequest) -> OrchestrationResponse {
        let user_id = request.profile.id.as_str();
        self.tracker
            .record_message(user_id, ConversationTurn::user(request.message.clone()))
            .await;

        let personalization = self.personalization(request).await;
        let response = self
            .orchestrator
            .orchestrate_personalized(request, personalization)
            .await;

        for result in &response.tool_responses {
            let parameters = response
                .extracted_parameters
                .get(&result.tool_name)
                .cloned()
                .unwrap_or_default();
            self.tracker
                .record_tool_usage(user_id, &result.tool_name, result.success, parameters)
                .await;
        }

        let reply = format!(
            "Executed {} educational tools: {}",
            response.tool_responses.len(),
            response.selected_tools.join(", ")
        );
        self.tracker
            .record_message(user_id, ConversationTurn::assistant(reply))
            .await;

        response
    }

    /// Dry run with the user's usage summary. Records nothing.
    pub async fn analyze(&self, request: &OrchestrationRequest) -> OrchestrationResponse {
        let personalization = self.personalization(request).await;
        self.orchestrator
            .analyze_personalized(request, personalization)
            .await
    }

    async fn personalization(&self, request: &OrchestrationRequest) -> Option<String> {
        self.tracker
            .personalization_context(&request.profile)
            .await
            .summary()
    }
}
