use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::clock::{Clock, SystemClock};
use super::patterns::LearningPatterns;
use crate::config::SessionConfig;
use crate::models::{ConversationTurn, ParamMap, StudentProfile};

/// Turns included in a personalization context.
const CONTEXT_HISTORY_TURNS: usize = 5;

/// One tool invocation, as remembered for pattern analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub tool_name: String,
    pub success: bool,
    pub parameters: ParamMap,
    pub timestamp: DateTime<Utc>,
}

/// A user's live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    /// Oldest first, bounded by the usage window.
    pub tool_usage: Vec<UsageRecord>,
}

impl Session {
    fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            created_at: now,
            last_activity: now,
            tool_usage: Vec::new(),
        }
    }
}

/// Everything the tracker knows about a user, bundled for prompt building.
#[derive(Debug, Clone, Serialize)]
pub struct PersonalizationContext {
    pub profile: StudentProfile,
    pub session: Option<Session>,
    pub preferences: ParamMap,
    pub patterns: LearningPatterns,
    pub recent_history: Vec<ConversationTurn>,
}

impl PersonalizationContext {
    /// Text handed to the extractor, if there is anything worth saying.
    pub fn summary(&self) -> Option<String> {
        self.patterns.summary()
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    sessions: HashMap<String, Session>,
    history: HashMap<String, Vec<ConversationTurn>>,
    preferences: HashMap<String, ParamMap>,
}

impl TrackerState {
    /// Drop the session and transcript if the user has been idle too long.
    fn expire_if_idle(&mut self, user_id: &str, now: DateTime<Utc>, timeout: Duration) -> bool {
        let idle = self
            .sessions
            .get(user_id)
            .is_some_and(|s| now - s.last_activity > timeout);
        if idle {
            tracing::info!(user = user_id, "Session expired");
            self.sessions.remove(user_id);
            self.history.remove(user_id);
        }
        idle
    }

    fn touch(&mut self, user_id: &str, now: DateTime<Utc>) -> &mut Session {
        let session = self
            .sessions
            .entry(user_id.to_string())
            .or_insert_with(|| Session::new(user_id, now));
        session.last_activity = now;
        session
    }
}

/// In-memory per-user sessions, transcripts, and preferences.
///
/// Expiry is lazy: an idle session is only removed the next time anything
/// touches that user. Each call holds the lock for its own update only, so
/// concurrent requests for one user interleave call by call.
#[derive(Clone)]
pub struct SessionTracker {
    state: Arc<RwLock<TrackerState>>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    history_window: usize,
    usage_window: usize,
}

impl SessionTracker {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Arc::new(RwLock::new(TrackerState::default())),
            clock,
            timeout: Duration::minutes(config.timeout_minutes),
            history_window: config.history_window,
            usage_window: config.usage_window,
        }
    }

    /// Append a turn to the user's transcript, keeping the newest
    /// `history_window` turns.
    pub async fn record_message(&self, user_id: &str, turn: ConversationTurn) {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        state.expire_if_idle(user_id, now, self.timeout);
        state.touch(user_id, now);

        let history = state.history.entry(user_id.to_string()).or_default();
        history.push(turn);
        if history.len() > self.history_window {
            let excess = history.len() - self.history_window;
            history.drain(..excess);
        }
    }

    pub async fn record_tool_usage(
        &self,
        user_id: &str,
        tool_name: &str,
        success: bool,
        parameters: ParamMap,
    ) {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        state.expire_if_idle(user_id, now, self.timeout);

        let window = self.usage_window;
        let session = state.touch(user_id, now);
        session.tool_usage.push(UsageRecord {
            tool_name: tool_name.to_string(),
            success,
            parameters,
            timestamp: now,
        });
        if session.tool_usage.len() > window {
            let excess = session.tool_usage.len() - window;
            session.tool_usage.drain(..excess);
        }
        tracing::debug!(user = user_id, tool = tool_name, success, "Tool usage recorded");
    }

    /// The live session, or `None` if there is none or it just expired.
    pub async fn get_session(&self, user_id: &str) -> Option<Session> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        if state.expire_if_idle(user_id, now, self.timeout) {
            return None;
        }
        state.sessions.get(user_id).cloned()
    }

    pub async fn get_preferences(&self, user_id: &str) -> ParamMap {
        let state = self.state.read().await;
        state.preferences.get(user_id).cloned().unwrap_or_default()
    }

    /// Merge `updates` into the stored preferences; later keys overwrite.
    pub async fn update_preferences(&self, user_id: &str, updates: ParamMap) {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        state.expire_if_idle(user_id, now, self.timeout);
        state.touch(user_id, now);
        state
            .preferences
            .entry(user_id.to_string())
            .or_default()
            .extend(updates);
    }

    /// The newest `limit` turns, oldest first. A limit of zero returns all.
    pub async fn get_history(&self, user_id: &str, limit: usize) -> Vec<ConversationTurn> {
        let now = self.clock.now();
        let mut state = self.state.write().await;
        state.expire_if_idle(user_id, now, self.timeout);
        let Some(history) = state.history.get(user_id) else {
            return Vec::new();
        };
        let skip = if limit == 0 {
            0
        } else {
            history.len().saturating_sub(limit)
        };
        history[skip..].to_vec()
    }

    /// Forget the session and transcript. Preferences are kept.
    pub async fn clear_session(&self, user_id: &str) {
        let mut state = self.state.write().await;
        state.sessions.remove(user_id);
        state.history.remove(user_id);
    }

    pub async fn get_patterns(&self, user_id: &str) -> LearningPatterns {
        match self.get_session(user_id).await {
            Some(session) => LearningPatterns::from_usage(&session.tool_usage),
            None => LearningPatterns::default(),
        }
    }

    pub async fn personalization_context(&self, profile: &StudentProfile) -> PersonalizationContext {
        let session = self.get_session(&profile.id).await;
        let patterns = session
            .as_ref()
            .map(|s| LearningPatterns::from_usage(&s.tool_usage))
            .unwrap_or_default();
        PersonalizationContext {
            profile: profile.clone(),
            preferences: self.get_preferences(&profile.id).await,
            recent_history: self.get_history(&profile.id, CONTEXT_HISTORY_TURNS).await,
            session,
            patterns,
        }
    }
}
