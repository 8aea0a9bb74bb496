//! Student-facing inputs: profile, transcript turns, teaching style.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::StudyflowError;

/// Who spoke a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single message in the running chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    #[serde(alias = "content")]
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Student profile supplied by the caller on every request.
///
/// The three summaries are free text written by the surrounding product;
/// extraction and adaptation only ever match substrings in them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(alias = "user_id")]
    pub id: String,
    pub name: String,
    #[serde(alias = "grade_level")]
    pub grade: String,
    #[serde(alias = "learning_style_summary", default)]
    pub learning_style: String,
    #[serde(alias = "emotional_state_summary", default)]
    pub emotional_state: String,
    #[serde(alias = "mastery_level_summary", default)]
    pub mastery_level: String,
}

impl StudentProfile {
    /// Case-insensitive substring test against the emotional-state summary.
    pub fn emotion_mentions(&self, marker: &str) -> bool {
        self.emotional_state
            .to_lowercase()
            .contains(&marker.to_lowercase())
    }

    /// Case-insensitive substring test against the learning-style summary.
    pub fn learning_style_mentions(&self, marker: &str) -> bool {
        self.learning_style
            .to_lowercase()
            .contains(&marker.to_lowercase())
    }
}

/// Teaching style requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeachingStyle {
    #[default]
    Direct,
    Socratic,
    Visual,
    FlippedClassroom,
}

impl TeachingStyle {
    pub const ALL: [TeachingStyle; 4] = [
        TeachingStyle::Direct,
        TeachingStyle::Socratic,
        TeachingStyle::Visual,
        TeachingStyle::FlippedClassroom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeachingStyle::Direct => "direct",
            TeachingStyle::Socratic => "socratic",
            TeachingStyle::Visual => "visual",
            TeachingStyle::FlippedClassroom => "flipped_classroom",
        }
    }
}

impl fmt::Display for TeachingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeachingStyle {
    type Err = StudyflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        TeachingStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| {
                StudyflowError::Validation(format!(
                    "Unknown teaching style '{}'. Supported: direct, socratic, visual, flipped_classroom",
                    s
                ))
            })
    }
}
