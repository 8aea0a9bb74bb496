//! Test harness: scripted completion clients and fake HTTP services.
//!
//! Fake services bind to an ephemeral port and live until the test's runtime
//! shuts down.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use studyflow::llm::{CompletionClient, CompletionPrompt, LlmError, ModelInfo};

/// Completion client that replays canned replies and records prompts.
///
/// Once the script runs out every call fails with `EmptyResponse`.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<CompletionPrompt>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Every reply succeeds with the given text.
    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<CompletionPrompt> {
        self.prompts.lock().expect("prompt lock").clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &CompletionPrompt) -> Result<String, LlmError> {
        self.prompts.lock().expect("prompt lock").push(prompt.clone());
        self.replies
            .lock()
            .expect("reply lock")
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyResponse))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "Scripted".to_string(),
            model: "scripted-model".to_string(),
            base_url: "memory://".to_string(),
            api_key_set: true,
        }
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// A fake tool service reachable at `endpoint`.
pub struct FakeBackend {
    pub endpoint: String,
    pub hits: Arc<AtomicUsize>,
    pub last_request: Arc<Mutex<Option<Value>>>,
}

impl FakeBackend {
    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<Value> {
        self.last_request.lock().expect("request lock").clone()
    }
}

#[derive(Clone)]
struct BackendState {
    status: StatusCode,
    body: Value,
    healthy: bool,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<Value>>>,
}

async fn tool_handler(
    State(state): State<BackendState>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_request.lock().expect("request lock") = Some(request);
    (state.status, Json(state.body.clone()))
}

async fn health_handler(State(state): State<BackendState>) -> StatusCode {
    if state.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Serve `body` with `status` on `POST /api/tool`, plus `GET /api/tool/health`.
/// Health mirrors whether `status` is a success.
pub async fn spawn_tool_backend(status: StatusCode, body: Value) -> FakeBackend {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(None));
    let state = BackendState {
        status,
        body,
        healthy: status.is_success(),
        hits: hits.clone(),
        last_request: last_request.clone(),
    };
    let app = Router::new()
        .route("/api/tool", post(tool_handler))
        .route("/api/tool/health", get(health_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
    let addr = listener.local_addr().expect("fake backend address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend");
    });

    FakeBackend {
        endpoint: format!("http://{addr}/api/tool"),
        hits,
        last_request,
    }
}

#[derive(Clone)]
struct CompletionState {
    replies: Arc<Mutex<VecDeque<String>>>,
}

async fn completion_handler(
    State(state): State<CompletionState>,
    Json(_request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    match state.replies.lock().expect("reply lock").pop_front() {
        Some(content) => (
            StatusCode::OK,
            Json(json!({"choices": [{"message": {"role": "assistant", "content": content}}]})),
        ),
        None => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": "script exhausted"})),
        ),
    }
}

/// Fake OpenAI-compatible service. Returns its base URL (ending in `/v1`).
pub async fn spawn_completion_server(replies: Vec<String>) -> String {
    let state = CompletionState {
        replies: Arc::new(Mutex::new(replies.into())),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(completion_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake model");
    let addr = listener.local_addr().expect("fake model address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake model");
    });

    format!("http://{addr}/v1")
}
