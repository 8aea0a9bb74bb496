use serde::{Deserialize, Serialize};

/// Which extraction strategy produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentSource {
    LanguageModel,
    Heuristic,
}

/// Classification of the current message. Produced once per orchestration
/// call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    /// Ordered, deduplicated tool names.
    pub tools_needed: Vec<String>,
    pub primary_intent: String,
    /// At most three topics.
    pub topics: Vec<String>,
    pub subject: String,
    pub difficulty_indicators: Vec<String>,
    /// Clamped to [0, 1].
    pub confidence: f64,
    pub source: IntentSource,
}

impl IntentAnalysis {
    pub const MAX_TOPICS: usize = 3;

    /// Enforce the shape invariants on an analysis from any source.
    pub fn normalized(mut self) -> Self {
        let mut seen = std::collections::HashSet::new();
        self.tools_needed
            .retain(|t| !t.trim().is_empty() && seen.insert(t.clone()));
        self.topics.truncate(Self::MAX_TOPICS);
        self.confidence = if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}
