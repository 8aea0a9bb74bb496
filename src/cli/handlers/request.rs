//! `orchestrate` and `analyze` handlers.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

use crate::cli::output::{
    output_json, print_failure, print_header, print_hint, print_kv, print_section, print_success,
    print_table, yes_no, OutputMode,
};
use crate::cli::RequestArgs;
use crate::init::AppContext;
use crate::models::{
    ConversationTurn, OrchestrationRequest, OrchestrationResponse, StudentProfile, TeachingStyle,
};
use crate::StudyflowError;

pub async fn handle_orchestrate(ctx: &AppContext, args: &RequestArgs, mode: OutputMode) -> Result<()> {
    let request = build_request(args)?;
    let response = ctx.tutor.handle(&request).await;
    render(&response, mode);
    Ok(())
}

pub async fn handle_analyze(ctx: &AppContext, args: &RequestArgs, mode: OutputMode) -> Result<()> {
    let request = build_request(args)?;
    let response = ctx.tutor.analyze(&request).await;
    render(&response, mode);
    Ok(())
}

/// Request from CLI arguments. Without a profile file a blank student is used.
pub fn build_request(args: &RequestArgs) -> Result<OrchestrationRequest> {
    let style: TeachingStyle = args.style.parse()?;
    let profile = match &args.profile {
        Some(path) => read_structured::<StudentProfile>(path)
            .with_context(|| format!("Failed to load profile {}", path.display()))?,
        None => default_profile(),
    };
    let history = match &args.history {
        Some(path) => read_structured::<Vec<ConversationTurn>>(path)
            .with_context(|| format!("Failed to load history {}", path.display()))?,
        None => Vec::new(),
    };

    Ok(OrchestrationRequest::new(profile, args.message.clone())
        .with_history(history)
        .with_style(style))
}

fn default_profile() -> StudentProfile {
    StudentProfile {
        id: "cli-user".to_string(),
        name: "Student".to_string(),
        grade: "10".to_string(),
        learning_style: String::new(),
        emotional_state: String::new(),
        mastery_level: String::new(),
    }
}

/// Parse a `.json` file as JSON and anything else as YAML.
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, StudyflowError> {
    let text = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_yaml_ng::from_str(&text)?)
    }
}

fn render(response: &OrchestrationResponse, mode: OutputMode) {
    if mode == OutputMode::Json {
        output_json(response);
        return;
    }

    if response.success {
        print_success(&format!("Selected tools: {}", response.selected_tools.join(", ")));
    } else {
        print_failure(response.error_message.as_deref().unwrap_or("Orchestration failed"));
    }

    if let Some(analysis) = &response.context_analysis {
        print_header("Intent");
        print_kv("Intent", &analysis.primary_intent);
        print_kv("Subject", &analysis.subject);
        print_kv("Topics", &analysis.topics.join(", "));
        print_kv("Confidence", &format!("{:.2}", analysis.confidence));
        if !analysis.difficulty_indicators.is_empty() {
            print_kv("Difficulty cues", &analysis.difficulty_indicators.join(", "));
        }
    }

    if !response.extracted_parameters.is_empty() {
        print_header("Parameters");
        let rows = response
            .extracted_parameters
            .iter()
            .map(|(tool, params)| {
                let verdict = response.validation.get(tool);
                vec![
                    tool.clone(),
                    params
                        .iter()
                        .map(|(k, v)| format!("{}={}", k, compact(v)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    verdict.map(|v| yes_no(v.is_valid)).unwrap_or_default(),
                    verdict.and_then(|v| v.reason.clone()).unwrap_or_default(),
                ]
            })
            .collect();
        print_table(&["Tool", "Parameters", "Valid", "Reason"], rows);
    }

    if !response.tool_responses.is_empty() {
        print_header("Results");
        for result in &response.tool_responses {
            if result.success {
                let body = serde_json::to_string_pretty(&result.data).unwrap_or_default();
                print_section(&result.tool_name, &body);
            } else {
                print_failure(&format!(
                    "{}: {}",
                    result.tool_name,
                    result.error.as_deref().unwrap_or("unknown error")
                ));
            }
        }
    }

    println!();
    print_hint(&response.reasoning);
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(style: &str) -> RequestArgs {
        RequestArgs {
            message: "Explain derivatives".into(),
            style: style.into(),
            profile: None,
            history: None,
        }
    }

    #[test]
    fn test_build_request_defaults() {
        let request = build_request(&args("visual")).unwrap();
        assert_eq!(request.teaching_style, TeachingStyle::Visual);
        assert_eq!(request.profile.id, "cli-user");
        assert!(request.history.is_empty());
    }

    #[test]
    fn test_build_request_rejects_unknown_style() {
        assert!(build_request(&args("lecture")).is_err());
    }

    #[test]
    fn test_reads_yaml_profile_and_json_history() {
        let dir = tempfile::tempdir().unwrap();

        let profile_path = dir.path().join("profile.yaml");
        let mut f = std::fs::File::create(&profile_path).unwrap();
        writeln!(
            f,
            "user_id: s42\nname: Lina\ngrade_level: \"8\"\nemotional_state_summary: Anxious about tests"
        )
        .unwrap();

        let history_path = dir.path().join("history.json");
        std::fs::write(
            &history_path,
            r#"[{"role": "user", "content": "hi"}, {"role": "assistant", "content": "hello"}]"#,
        )
        .unwrap();

        let request = build_request(&RequestArgs {
            profile: Some(profile_path),
            history: Some(history_path),
            ..args("direct")
        })
        .unwrap();
        assert_eq!(request.profile.id, "s42");
        assert!(request.profile.emotion_mentions("anxious"));
        assert_eq!(request.history.len(), 2);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_structured::<StudentProfile>(Path::new("/nonexistent/profile.yaml"));
        assert!(matches!(err, Err(StudyflowError::Io(_))));
    }

    #[test]
    fn test_malformed_files_are_serialization_errors() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("history.json");
        std::fs::write(&json_path, "[{").unwrap();
        let err = read_structured::<Vec<ConversationTurn>>(&json_path).unwrap_err();
        assert!(matches!(err, StudyflowError::Serialization(ref m) if m.starts_with("JSON error")));

        let yaml_path = dir.path().join("profile.yaml");
        std::fs::write(&yaml_path, "user_id: [unclosed").unwrap();
        let err = read_structured::<StudentProfile>(&yaml_path).unwrap_err();
        assert!(matches!(err, StudyflowError::Serialization(ref m) if m.starts_with("YAML error")));
    }
}
