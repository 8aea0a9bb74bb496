use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::Instrument;

use super::state::{step, OrchestrationState, Stage};
use crate::dispatch::ToolDispatcher;
use crate::extraction::{ExtractionContext, ExtractionStrategy};
use crate::models::{OrchestrationRequest, OrchestrationResponse};
use crate::tools::{adapt, validate_all};

/// Drives a request through analysis, extraction, validation and dispatch.
///
/// [`orchestrate`](Self::orchestrate) never fails: every problem ends up in
/// the response's `error_message`.
pub struct Orchestrator {
    extractor: Arc<dyn ExtractionStrategy>,
    dispatcher: Arc<ToolDispatcher>,
}

impl Orchestrator {
    pub fn new(extractor: Arc<dyn ExtractionStrategy>, dispatcher: Arc<ToolDispatcher>) -> Self {
        Self {
            extractor,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    pub async fn orchestrate(&self, request: &OrchestrationRequest) -> OrchestrationResponse {
        self.orchestrate_personalized(request, None).await
    }

    /// Like [`orchestrate`](Self::orchestrate), with a usage summary passed
    /// to the extractor.
    pub async fn orchestrate_personalized(
        &self,
        request: &OrchestrationRequest,
        personalization: Option<String>,
    ) -> OrchestrationResponse {
        let context = ExtractionContext::from_request(request).with_personalization(personalization);
        self.guarded(request, context, false).await
    }

    /// Analysis, extraction, adaptation and validation without dispatching.
    pub async fn analyze_only(&self, request: &OrchestrationRequest) -> OrchestrationResponse {
        self.analyze_personalized(request, None).await
    }

    /// Dry run seeing the same usage summary a full run would.
    pub async fn analyze_personalized(
        &self,
        request: &OrchestrationRequest,
        personalization: Option<String>,
    ) -> OrchestrationResponse {
        let context = ExtractionContext::from_request(request).with_personalization(personalization);
        self.guarded(request, context, true).await
    }

    async fn guarded(
        &self,
        request: &OrchestrationRequest,
        context: ExtractionContext,
        dry_run: bool,
    ) -> OrchestrationResponse {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("orchestrate", %run_id, user = %request.profile.id);
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.run(request, context, dry_run))
            .catch_unwind()
            .instrument(span.clone())
            .await;

        span.in_scope(|| match outcome {
            Ok(response) => {
                tracing::info!(
                    success = response.success,
                    tools = ?response.selected_tools,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Orchestration finished"
                );
                response
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!("Orchestration panicked: {}", message);
                OrchestrationResponse::failure("Workflow execution failed", message)
            }
        })
    }

    async fn run(
        &self,
        request: &OrchestrationRequest,
        context: ExtractionContext,
        dry_run: bool,
    ) -> OrchestrationResponse {
        let mut state = OrchestrationState::new(request, context);
        let mut stage = Stage::AnalyzeContext;

        while stage != Stage::Done {
            self.run_stage(stage, &mut state).await;
            let next = step(stage, &state);
            tracing::debug!(from = stage.as_str(), to = next.as_str(), "Stage transition");

            if dry_run && next == Stage::ExecuteTools {
                state.success = true;
                state.reasoning.push_str("Dry run: tool execution skipped.");
                break;
            }
            stage = next;
        }

        state.into_response()
    }

    async fn run_stage(&self, stage: Stage, state: &mut OrchestrationState) {
        match stage {
            Stage::AnalyzeContext => self.analyze_context(state).await,
            Stage::ExtractParameters => self.extract_parameters(state).await,
            Stage::ValidateParameters => validate_parameters(state),
            Stage::ExecuteTools => self.execute_tools(state).await,
            Stage::GenerateResponse => generate_response(state),
            Stage::HandleError => handle_error(state),
            Stage::Done => {}
        }
    }

    async fn analyze_context(&self, state: &mut OrchestrationState) {
        match self.extractor.analyze_intent(&state.context).await {
            Ok(intent) => {
                state.reasoning.push_str(&format!(
                    "Intent Analysis: Identified {} tools needed. ",
                    intent.tools_needed.len()
                ));
                tracing::info!(
                    tools = ?intent.tools_needed,
                    source = ?intent.source,
                    confidence = intent.confidence,
                    "Intent analyzed"
                );
                state.intent = Some(intent);
            }
            Err(e) => {
                tracing::warn!("Context analysis failed: {}", e);
                state.fail(format!("Context analysis failed: {}", e));
            }
        }
    }

    async fn extract_parameters(&self, state: &mut OrchestrationState) {
        let tools_needed = state.tools_needed().to_vec();
        if tools_needed.is_empty() {
            state.fail("No tools identified from context analysis");
            return;
        }

        match self
            .extractor
            .extract_parameters(&tools_needed, &state.context)
            .await
        {
            Ok(params) => {
                let adapted = adapt(&params, state.teaching_style, &state.context.profile);
                state.reasoning.push_str(&format!(
                    "Parameter Extraction: Extracted parameters for {} tools. ",
                    adapted.len()
                ));
                state.parameters = adapted;
            }
            Err(e) => {
                tracing::warn!("Parameter extraction failed: {}", e);
                state.fail(format!("Parameter extraction failed: {}", e));
            }
        }
    }

    async fn execute_tools(&self, state: &mut OrchestrationState) {
        let eligible = state.eligible();
        let responses = self
            .dispatcher
            .execute(&eligible, &state.context.profile, &state.context.history)
            .await;

        let succeeded = responses.iter().filter(|r| r.success).count();
        if succeeded > 0 {
            state.success = true;
            state.reasoning.push_str(&format!(
                "Tool Execution: Successfully executed {} tools. ",
                succeeded
            ));
        } else {
            state.fail("All tool executions failed");
        }
        state.tool_responses = responses;
    }
}

fn validate_parameters(state: &mut OrchestrationState) {
    state.validation = validate_all(&state.parameters);

    let rejected: Vec<String> = state
        .validation
        .iter()
        .filter_map(|(tool, verdict)| {
            (!verdict.is_valid).then(|| {
                format!("{}: {}", tool, verdict.reason.as_deref().unwrap_or("invalid"))
            })
        })
        .collect();

    if rejected.is_empty() {
        state
            .reasoning
            .push_str("Parameter Validation: All parameters validated successfully. ");
    } else if rejected.len() == state.validation.len() {
        state.fail(format!("Parameter validation failed for: {}", rejected.join(", ")));
    } else {
        tracing::warn!(rejected = ?rejected, "Dispatching the tools that passed validation");
        state.reasoning.push_str(&format!(
            "Parameter Validation: Skipping tools with invalid parameters: {}. ",
            rejected.join(", ")
        ));
    }
}

fn generate_response(state: &mut OrchestrationState) {
    if state.success {
        let tools: Vec<&str> = state
            .tool_responses
            .iter()
            .filter(|r| r.success)
            .map(|r| r.tool_name.as_str())
            .collect();
        state.reasoning.push_str(&format!(
            "Orchestration completed successfully with tools: {}.",
            tools.join(", ")
        ));
    }
}

fn handle_error(state: &mut OrchestrationState) {
    if state.reasoning.is_empty() {
        state
            .reasoning
            .push_str("Orchestration failed due to validation or execution errors.");
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
