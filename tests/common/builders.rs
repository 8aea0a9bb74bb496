//! Test data builders for profiles and requests.
//!
//! Provides fluent API for creating test inputs with sensible defaults.

use studyflow::models::{ConversationTurn, OrchestrationRequest, StudentProfile, TeachingStyle};

/// Builder for creating test student profiles.
pub struct ProfileBuilder {
    id: String,
    name: String,
    grade: String,
    learning_style: String,
    emotional_state: String,
    mastery_level: String,
}

impl ProfileBuilder {
    /// Create a new profile builder for the given user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "Ayaan".to_string(),
            grade: "10".to_string(),
            learning_style: "Visual learner".to_string(),
            emotional_state: "Calm".to_string(),
            mastery_level: "Level 4".to_string(),
        }
    }

    pub fn learning_style(mut self, summary: impl Into<String>) -> Self {
        self.learning_style = summary.into();
        self
    }

    pub fn emotional_state(mut self, summary: impl Into<String>) -> Self {
        self.emotional_state = summary.into();
        self
    }

    pub fn mastery(mut self, summary: impl Into<String>) -> Self {
        self.mastery_level = summary.into();
        self
    }

    /// Build the StudentProfile struct.
    pub fn build(self) -> StudentProfile {
        StudentProfile {
            id: self.id,
            name: self.name,
            grade: self.grade,
            learning_style: self.learning_style,
            emotional_state: self.emotional_state,
            mastery_level: self.mastery_level,
        }
    }

    /// Wrap the profile in a request for `message`.
    pub fn request(self, message: &str) -> OrchestrationRequest {
        OrchestrationRequest::new(self.build(), message)
    }
}

/// A request with a short prior exchange and the given style.
pub fn request_with_history(
    profile: StudentProfile,
    message: &str,
    style: TeachingStyle,
) -> OrchestrationRequest {
    OrchestrationRequest::new(profile, message)
        .with_history(vec![
            ConversationTurn::user("Hi, I have a test next week"),
            ConversationTurn::assistant("Happy to help you prepare."),
        ])
        .with_style(style)
}
