use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use indexmap::IndexMap;

use super::http::probe_health;
use super::{FallbackBackend, HttpToolBackend, SimulatorBackend, ToolBackend, ToolCall};
use crate::config::{DispatchPolicy, ToolsConfig};
use crate::models::{ConversationTurn, StudentProfile, ToolKind, ToolParameterSet, ToolResult};
use crate::StudyflowError;

/// Fans tool calls out to their backends and collects one result per tool.
pub struct ToolDispatcher {
    backends: HashMap<ToolKind, Arc<dyn ToolBackend>>,
    endpoints: Vec<(ToolKind, String)>,
    health_timeout: Duration,
}

impl ToolDispatcher {
    /// Simulator for every tool, no real endpoints.
    pub fn simulated() -> Self {
        let simulator: Arc<dyn ToolBackend> = Arc::new(SimulatorBackend::new());
        Self {
            backends: ToolKind::ALL
                .into_iter()
                .map(|tool| (tool, simulator.clone()))
                .collect(),
            endpoints: Vec::new(),
            health_timeout: Duration::from_secs(5),
        }
    }

    /// Backends per tool from config and dispatch policy.
    ///
    /// A tool without an endpoint uses the simulator alone. With an endpoint,
    /// the policy decides which side goes first.
    pub fn from_config(config: &ToolsConfig) -> Result<Self, StudyflowError> {
        let simulator: Arc<dyn ToolBackend> = Arc::new(SimulatorBackend::with_delay(
            Duration::from_millis(config.simulator_delay_ms),
        ));

        let mut backends: HashMap<ToolKind, Arc<dyn ToolBackend>> = HashMap::new();
        let mut endpoints = Vec::new();
        for tool in ToolKind::ALL {
            let backend: Arc<dyn ToolBackend> = match config.endpoints.get(tool) {
                None => simulator.clone(),
                Some(url) => {
                    endpoints.push((tool, url.to_string()));
                    let http: Arc<dyn ToolBackend> =
                        Arc::new(HttpToolBackend::new(url, config.request_timeout_secs)?);
                    match config.dispatch_policy {
                        DispatchPolicy::SimulatorFirst => {
                            Arc::new(FallbackBackend::new(simulator.clone(), http))
                        }
                        DispatchPolicy::BackendFirst => {
                            Arc::new(FallbackBackend::new(http, simulator.clone()))
                        }
                    }
                }
            };
            tracing::debug!(tool = tool.as_str(), backend = %backend.name(), "Tool backend configured");
            backends.insert(tool, backend);
        }

        Ok(Self {
            backends,
            endpoints,
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        })
    }

    /// Replace one tool's backend.
    pub fn with_backend(mut self, tool: ToolKind, backend: Arc<dyn ToolBackend>) -> Self {
        self.backends.insert(tool, backend);
        self
    }

    /// Set the endpoints probed by [`health_check`](Self::health_check).
    pub fn with_health_endpoints(mut self, endpoints: Vec<(ToolKind, String)>) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn backend_name(&self, tool: ToolKind) -> Option<String> {
        self.backends.get(&tool).map(|b| b.name())
    }

    /// Run every tool concurrently. Results come back in input order and one
    /// failure never cancels the others.
    pub async fn execute(
        &self,
        params: &ToolParameterSet,
        profile: &StudentProfile,
        history: &[ConversationTurn],
    ) -> Vec<ToolResult> {
        let calls = params.iter().map(|(name, tool_params)| async move {
            let Some(tool) = ToolKind::from_name(name) else {
                return ToolResult::failed(name.clone(), format!("Unknown tool: {}", name));
            };
            let Some(backend) = self.backends.get(&tool) else {
                return ToolResult::failed(name.clone(), format!("No backend for {}", name));
            };
            let call = ToolCall {
                tool,
                params: tool_params,
                profile,
                history,
            };
            match backend.invoke(&call).await {
                Ok(data) => ToolResult::ok(name.clone(), data),
                Err(StudyflowError::Dispatch { message, .. }) => ToolResult::failed(name.clone(), message),
                Err(e) => ToolResult::failed(name.clone(), e.to_string()),
            }
        });

        let results = join_all(calls).await;
        let succeeded = results.iter().filter(|r| r.success).count();
        tracing::info!(
            requested = results.len(),
            succeeded,
            "Tool dispatch finished"
        );
        results
    }

    /// Probe each configured endpoint's `/health` concurrently.
    pub async fn health_check(&self) -> IndexMap<String, bool> {
        let client = match reqwest::Client::builder()
            .timeout(self.health_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Failed to create health-check client: {}", e);
                return self
                    .endpoints
                    .iter()
                    .map(|(tool, _)| (tool.as_str().to_string(), false))
                    .collect();
            }
        };

        let probes = self.endpoints.iter().map(|(tool, url)| {
            let client = &client;
            async move { (tool.as_str().to_string(), probe_health(client, url).await) }
        });
        join_all(probes).await.into_iter().collect()
    }
}
