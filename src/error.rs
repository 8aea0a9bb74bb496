use thiserror::Error;

use crate::llm::LlmError;

/// Custom error type for studyflow operations.
#[derive(Debug, Error)]
pub enum StudyflowError {
    /// Language-model completion failed or was unavailable.
    #[error("Completion error: {0}")]
    Completion(#[from] LlmError),

    /// A strategy could not produce an intent analysis or parameter set.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Parameters violated a tool schema.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A tool backend call failed.
    #[error("Dispatch error for {tool}: {message}")]
    Dispatch { tool: String, message: String },

    /// Configuration could not be loaded or was inconsistent.
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON/YAML/TOML (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StudyflowError {
    /// Shorthand for a dispatch failure on a named tool.
    pub fn dispatch(tool: impl Into<String>, message: impl Into<String>) -> Self {
        StudyflowError::Dispatch {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for StudyflowError {
    fn from(err: serde_json::Error) -> Self {
        StudyflowError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml_ng::Error> for StudyflowError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        StudyflowError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for StudyflowError {
    fn from(err: toml::de::Error) -> Self {
        StudyflowError::Config(format!("TOML parse error: {}", err))
    }
}

impl From<std::io::Error> for StudyflowError {
    fn from(err: std::io::Error) -> Self {
        StudyflowError::Io(err.to_string())
    }
}
