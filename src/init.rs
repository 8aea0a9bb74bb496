//! Shared initialization for the CLI and library callers.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{load_config, resolve_data_path, StudyflowConfig};
use crate::dispatch::ToolDispatcher;
use crate::extraction::{ExtractionStrategy, TieredExtractor};
use crate::llm::{create_completion_client, CompletionClient};
use crate::orchestrator::{Orchestrator, TutorSession};
use crate::session::SessionTracker;

/// Application context holding every long-lived component.
///
/// Built once per process and passed by reference.
pub struct AppContext {
    pub data_path: PathBuf,
    pub config: StudyflowConfig,
    pub completion: Arc<dyn CompletionClient>,
    pub extractor: Arc<dyn ExtractionStrategy>,
    pub dispatcher: Arc<ToolDispatcher>,
    pub tracker: SessionTracker,
    pub orchestrator: Arc<Orchestrator>,
    pub tutor: TutorSession,
}

impl AppContext {
    /// Resolve the data path, load config, and wire the components.
    ///
    /// Data path priority: explicit path > STUDYFLOW_DATA_PATH env > ./.studyflow (if exists) > ~/.studyflow
    pub fn new(explicit_path: Option<PathBuf>) -> Result<Self> {
        let data_path = resolve_data_path(explicit_path);
        tracing::info!("Using data path: {}", data_path.display());

        let config = load_config(&data_path);
        let mut ctx = Self::from_config(config)?;
        ctx.data_path = data_path;
        Ok(ctx)
    }

    /// Wire the components from an already-loaded config.
    pub fn from_config(config: StudyflowConfig) -> Result<Self> {
        let completion = create_completion_client(&config.llm);
        let extractor: Arc<dyn ExtractionStrategy> =
            Arc::new(TieredExtractor::for_client(completion.clone()));
        tracing::info!(
            model = %completion.model_info().model,
            available = completion.is_available(),
            "Completion client ready"
        );

        let dispatcher = Arc::new(ToolDispatcher::from_config(&config.tools)?);
        let configured = config.tools.endpoints.configured().len();
        tracing::info!(
            endpoints = configured,
            policy = ?config.tools.dispatch_policy,
            "Tool dispatcher ready"
        );

        let tracker = SessionTracker::new(&config.session);
        let orchestrator = Arc::new(Orchestrator::new(extractor.clone(), dispatcher.clone()));
        let tutor = TutorSession::new(orchestrator.clone(), tracker.clone());

        Ok(Self {
            data_path: PathBuf::new(),
            config,
            completion,
            extractor,
            dispatcher,
            tracker,
            orchestrator,
            tutor,
        })
    }
}
