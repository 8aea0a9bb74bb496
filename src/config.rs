//! Configuration loading.
//!
//! Loaded from `{data_path}/studyflow.toml`, then overridden by environment
//! variables. Every field has a default so a missing or partial file is fine.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::ToolKind;
use crate::StudyflowError;

const CONFIG_FILE: &str = "studyflow.toml";

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENROUTER_MODEL: &str = "deepseek/deepseek-chat";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_MODEL: &str = "gpt-4-turbo-preview";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyflowConfig {
    pub llm: LlmConfig,
    pub tools: ToolsConfig,
    pub session: SessionConfig,
}

/// Which OpenAI-compatible service the completion client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    OpenRouter,
    OpenAi,
}

impl LlmProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::OpenRouter => "OpenRouter",
            LlmProvider::OpenAi => "OpenAI",
        }
    }
}

/// Language-model completion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub base_url: String,
    pub model: String,
    /// Without a key the completion client is disabled and extraction is
    /// purely heuristic.
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenRouter,
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: OPENROUTER_MODEL.to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 2000,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Order in which the simulator and a configured real backend are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPolicy {
    /// Simulator answers; the real backend only covers simulator failures.
    #[default]
    SimulatorFirst,
    /// Real backend answers; the simulator covers backend failures.
    BackendFirst,
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchPolicy::SimulatorFirst => f.write_str("simulator_first"),
            DispatchPolicy::BackendFirst => f.write_str("backend_first"),
        }
    }
}

impl FromStr for DispatchPolicy {
    type Err = StudyflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "simulator_first" => Ok(DispatchPolicy::SimulatorFirst),
            "backend_first" => Ok(DispatchPolicy::BackendFirst),
            other => Err(StudyflowError::Config(format!(
                "Unknown dispatch policy '{}'. Supported: simulator_first, backend_first",
                other
            ))),
        }
    }
}

/// Real tool backend URLs. `None` means the simulator is the only backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolEndpoints {
    pub note_maker: Option<String>,
    pub flashcard_generator: Option<String>,
    pub concept_explainer: Option<String>,
}

impl ToolEndpoints {
    pub fn get(&self, tool: ToolKind) -> Option<&str> {
        match tool {
            ToolKind::NoteMaker => self.note_maker.as_deref(),
            ToolKind::FlashcardGenerator => self.flashcard_generator.as_deref(),
            ToolKind::ConceptExplainer => self.concept_explainer.as_deref(),
        }
    }

    pub fn set(&mut self, tool: ToolKind, url: Option<String>) {
        let slot = match tool {
            ToolKind::NoteMaker => &mut self.note_maker,
            ToolKind::FlashcardGenerator => &mut self.flashcard_generator,
            ToolKind::ConceptExplainer => &mut self.concept_explainer,
        };
        *slot = url;
    }

    /// Configured endpoints in registry order.
    pub fn configured(&self) -> Vec<(ToolKind, &str)> {
        ToolKind::ALL
            .into_iter()
            .filter_map(|tool| self.get(tool).map(|url| (tool, url)))
            .collect()
    }
}

/// Tool dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub endpoints: ToolEndpoints,
    pub dispatch_policy: DispatchPolicy,
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
    /// Artificial latency for the simulator, useful for demos.
    pub simulator_delay_ms: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            endpoints: ToolEndpoints::default(),
            dispatch_policy: DispatchPolicy::default(),
            request_timeout_secs: 30,
            health_timeout_secs: 5,
            simulator_delay_ms: 0,
        }
    }
}

/// Session tracker limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub timeout_minutes: i64,
    pub history_window: usize,
    pub usage_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_minutes: 120,
            history_window: 20,
            usage_window: 50,
        }
    }
}

/// Resolve the data directory.
///
/// Priority: explicit path > STUDYFLOW_DATA_PATH env > ./.studyflow (if exists) > ~/.studyflow
pub fn resolve_data_path(explicit_path: Option<PathBuf>) -> PathBuf {
    explicit_path
        .or_else(|| std::env::var("STUDYFLOW_DATA_PATH").ok().map(PathBuf::from))
        .or_else(|| {
            let local_path = Path::new(".studyflow");
            if local_path.exists() && local_path.is_dir() {
                Some(local_path.to_path_buf())
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".studyflow"))
                .unwrap_or_else(|| PathBuf::from(".studyflow"))
        })
}

/// Load config with priority:
/// 1. `{data_path}/studyflow.toml` file (defaults when absent or unparsable)
/// 2. Environment variable overrides
pub fn load_config(data_path: &Path) -> StudyflowConfig {
    let mut config = load_config_file(data_path);
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Read `{data_path}/studyflow.toml`, falling back to defaults.
pub fn load_config_file(data_path: &Path) -> StudyflowConfig {
    let config_path = data_path.join(CONFIG_FILE);
    if !config_path.exists() {
        return StudyflowConfig::default();
    }

    match read_config_file(&config_path) {
        Ok(config) => {
            tracing::info!("Loaded config from {}", config_path.display());
            config
        }
        Err(e) => {
            tracing::warn!("{}: {}. Using default.", config_path.display(), e);
            StudyflowConfig::default()
        }
    }
}

/// Parse one config file.
pub fn read_config_file(path: &Path) -> Result<StudyflowConfig, StudyflowError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

/// Endpoint and model from the file survive unless the provider changes.
fn switch_provider(llm: &mut LlmConfig, provider: LlmProvider) {
    if llm.provider == provider {
        return;
    }
    let (base_url, model) = match provider {
        LlmProvider::OpenRouter => (OPENROUTER_BASE_URL, OPENROUTER_MODEL),
        LlmProvider::OpenAi => (OPENAI_BASE_URL, OPENAI_MODEL),
    };
    llm.provider = provider;
    llm.base_url = base_url.to_string();
    llm.model = model.to_string();
}

/// Apply environment overrides through `lookup` so tests never touch the
/// process environment.
///
/// OpenRouter wins over OpenAI when both keys are present.
pub fn apply_env_overrides<F>(config: &mut StudyflowConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty("OPENROUTER_API_KEY") {
        switch_provider(&mut config.llm, LlmProvider::OpenRouter);
        config.llm.api_key = Some(key);
        if let Some(url) = non_empty("OPENROUTER_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Some(model) = non_empty("MODEL_NAME") {
            config.llm.model = model;
        }
        tracing::info!("Using OpenRouter with {}", config.llm.model);
    } else if let Some(key) = non_empty("OPENAI_API_KEY") {
        switch_provider(&mut config.llm, LlmProvider::OpenAi);
        config.llm.api_key = Some(key);
        tracing::info!("Using OpenAI with {}", config.llm.model);
    }

    let endpoint_vars = [
        (ToolKind::NoteMaker, "NOTE_MAKER_API_URL"),
        (ToolKind::FlashcardGenerator, "FLASHCARD_API_URL"),
        (ToolKind::ConceptExplainer, "CONCEPT_EXPLAINER_API_URL"),
    ];
    for (tool, var) in endpoint_vars {
        if let Some(url) = non_empty(var) {
            config.tools.endpoints.set(tool, Some(url));
        }
    }

    if let Some(policy) = non_empty("STUDYFLOW_DISPATCH_POLICY") {
        match policy.parse::<DispatchPolicy>() {
            Ok(p) => config.tools.dispatch_policy = p,
            Err(e) => tracing::warn!("Ignoring STUDYFLOW_DISPATCH_POLICY: {}", e),
        }
    }
}
