//! Usage statistics derived from a session's tool log.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tracker::UsageRecord;

const DIFFICULTY_LEVELS: [&str; 3] = ["easy", "medium", "hard"];
const DEFAULT_DIFFICULTY: &str = "medium";
const MAX_TOPIC_INTERESTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningFrequency {
    pub avg_sessions_per_day: f64,
    pub total_learning_days: usize,
    pub most_active_day: Option<NaiveDate>,
}

/// Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPatterns {
    /// Tool → uses, highest first.
    pub most_used_tools: IndexMap<String, usize>,
    pub success_rates: IndexMap<String, f64>,
    pub preferred_difficulty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_frequency: Option<LearningFrequency>,
    /// Lowercased topic → uses, top ten.
    pub topic_interests: IndexMap<String, usize>,
}

impl Default for LearningPatterns {
    fn default() -> Self {
        Self {
            most_used_tools: IndexMap::new(),
            success_rates: IndexMap::new(),
            preferred_difficulty: DEFAULT_DIFFICULTY.to_string(),
            learning_frequency: None,
            topic_interests: IndexMap::new(),
        }
    }
}

/// Stable sort by count, highest first; ties keep first-seen order.
fn by_count_desc(counts: &mut IndexMap<String, usize>) {
    counts.sort_by(|_, a, _, b| b.cmp(a));
}

impl LearningPatterns {
    pub fn from_usage(usage: &[UsageRecord]) -> Self {
        if usage.is_empty() {
            return Self::default();
        }

        let mut most_used_tools: IndexMap<String, usize> = IndexMap::new();
        let mut successes: IndexMap<String, (usize, usize)> = IndexMap::new();
        let mut difficulty_counts = [0usize; 3];
        let mut daily: IndexMap<NaiveDate, usize> = IndexMap::new();
        let mut topic_interests: IndexMap<String, usize> = IndexMap::new();

        for record in usage {
            *most_used_tools.entry(record.tool_name.clone()).or_default() += 1;

            let stats = successes.entry(record.tool_name.clone()).or_default();
            stats.0 += 1;
            if record.success {
                stats.1 += 1;
            }

            if let Some(level) = record.parameters.get("difficulty").and_then(Value::as_str) {
                if let Some(i) = DIFFICULTY_LEVELS.iter().position(|d| *d == level) {
                    difficulty_counts[i] += 1;
                }
            }

            *daily.entry(record.timestamp.date_naive()).or_default() += 1;

            let topic = ["topic", "concept_to_explain"]
                .iter()
                .find_map(|k| record.parameters.get(*k).and_then(Value::as_str))
                .filter(|t| !t.trim().is_empty());
            if let Some(topic) = topic {
                *topic_interests.entry(topic.to_lowercase()).or_default() += 1;
            }
        }

        by_count_desc(&mut most_used_tools);
        by_count_desc(&mut topic_interests);
        topic_interests.truncate(MAX_TOPIC_INTERESTS);

        let success_rates = successes
            .into_iter()
            .map(|(tool, (total, ok))| (tool, ok as f64 / total as f64))
            .collect();

        // First level with the highest count; ties keep easy < medium < hard order.
        let mut preferred = None;
        for (i, &count) in difficulty_counts.iter().enumerate() {
            if count > 0 && preferred.is_none_or(|(_, best)| count > best) {
                preferred = Some((i, count));
            }
        }
        let preferred_difficulty = preferred
            .map(|(i, _)| DIFFICULTY_LEVELS[i])
            .unwrap_or(DEFAULT_DIFFICULTY)
            .to_string();

        let mut most_active_day: Option<(NaiveDate, usize)> = None;
        for (&day, &count) in &daily {
            if most_active_day.is_none_or(|(_, best)| count > best) {
                most_active_day = Some((day, count));
            }
        }

        Self {
            most_used_tools,
            success_rates,
            preferred_difficulty,
            learning_frequency: Some(LearningFrequency {
                avg_sessions_per_day: usage.len() as f64 / daily.len() as f64,
                total_learning_days: daily.len(),
                most_active_day: most_active_day.map(|(day, _)| day),
            }),
            topic_interests,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.most_used_tools.is_empty()
    }

    /// One-line description for model prompts; `None` with no history.
    pub fn summary(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let tools = self
            .most_used_tools
            .iter()
            .map(|(tool, n)| format!("{} ({})", tool, n))
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!(
            "Most used tools: {}. Preferred flashcard difficulty: {}.",
            tools, self.preferred_difficulty
        );
        if !self.topic_interests.is_empty() {
            let topics: Vec<&str> = self.topic_interests.keys().take(3).map(String::as_str).collect();
            out.push_str(&format!(" Recent interests: {}.", topics.join(", ")));
        }
        Some(out)
    }
}
