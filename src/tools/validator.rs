//! Parameter validation against the schema registry.

use indexmap::IndexMap;
use serde_json::Value;

use super::schema::{integral, lookup, ParamRule, ParamSpec};
use crate::models::{ParamMap, ToolParameterSet, ValidationVerdict};

/// Validate one tool's parameters.
///
/// Checks required keys in schema order, then each value against its rule.
/// Optional parameters are checked only when present. Only the first
/// violation is reported. Keys the schema does not name are ignored, so adding
/// them never changes the verdict.
pub fn validate(tool_name: &str, params: &ParamMap) -> ValidationVerdict {
    let Some(schema) = lookup(tool_name) else {
        return ValidationVerdict::invalid(format!(
            "Unknown tool '{}': not in the tool registry",
            tool_name
        ));
    };

    if let Some(missing) = schema.required().find(|spec| !params.contains_key(spec.name)) {
        return ValidationVerdict::invalid(format!("Missing required field: {}", missing.name));
    }

    for spec in schema.params {
        let Some(value) = params.get(spec.name) else {
            continue;
        };
        if let Some(reason) = check_rule(spec, value) {
            return ValidationVerdict::invalid(reason);
        }
    }

    ValidationVerdict::valid()
}

/// Validate every tool in a parameter set, preserving order.
pub fn validate_all(params: &ToolParameterSet) -> IndexMap<String, ValidationVerdict> {
    params
        .iter()
        .map(|(tool, p)| (tool.clone(), validate(tool, p)))
        .collect()
}

fn check_rule(spec: &ParamSpec, value: &Value) -> Option<String> {
    match spec.rule {
        ParamRule::Text => match value.as_str() {
            Some(s) if !s.trim().is_empty() => None,
            _ => Some(format!("{} must be a non-empty string", spec.name)),
        },
        ParamRule::Flag => match value {
            Value::Bool(_) => None,
            _ => Some(format!("{} must be true or false", spec.name)),
        },
        ParamRule::OneOf { values } => match value.as_str() {
            Some(s) if values.contains(&s) => None,
            _ => Some(format!(
                "Invalid {}: expected one of {}",
                spec.name,
                values.join(", ")
            )),
        },
        ParamRule::IntRange { min, max } => match integral(value) {
            Some(n) if (min..=max).contains(&n) => None,
            Some(_) => Some(format!("{} must be between {} and {}", spec.name, min, max)),
            None => Some(format!("{} must be an integer", spec.name)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> ParamMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    fn valid_flashcards() -> ParamMap {
        params(json!({
            "topic": "spanish vocabulary",
            "count": 7,
            "difficulty": "medium",
            "subject": "spanish",
            "include_examples": true
        }))
    }

    #[test]
    fn test_valid_sets_pass() {
        assert!(validate("flashcard_generator", &valid_flashcards()).is_valid);
        assert!(
            validate(
                "note_maker",
                &params(json!({"topic": "cells", "subject": "biology", "note_taking_style": "narrative"}))
            )
            .is_valid
        );
        assert!(
            validate(
                "concept_explainer",
                &params(json!({"concept_to_explain": "atoms", "current_topic": "chemistry", "desired_depth": "comprehensive"}))
            )
            .is_valid
        );
    }

    #[test]
    fn test_unknown_tool_is_invalid_not_panic() {
        let verdict = validate("essay_grader", &ParamMap::new());
        assert!(!verdict.is_valid);
        assert!(verdict.reason.unwrap().contains("essay_grader"));
    }

    #[test]
    fn test_reports_first_missing_field_only() {
        let verdict = validate("note_maker", &params(json!({"subject": "biology"})));
        assert_eq!(verdict.reason.as_deref(), Some("Missing required field: topic"));
    }

    #[test]
    fn test_count_range() {
        let mut p = valid_flashcards();
        p.insert("count".into(), json!(21));
        assert_eq!(
            validate("flashcard_generator", &p).reason.as_deref(),
            Some("count must be between 1 and 20")
        );
        p.insert("count".into(), json!(0));
        assert!(!validate("flashcard_generator", &p).is_valid);
        p.insert("count".into(), json!("five"));
        assert_eq!(
            validate("flashcard_generator", &p).reason.as_deref(),
            Some("count must be an integer")
        );
        p.insert("count".into(), json!(20));
        assert!(validate("flashcard_generator", &p).is_valid);
    }

    #[test]
    fn test_whole_float_count_is_an_integer() {
        let mut p = valid_flashcards();
        p.insert("count".into(), json!(7.0));
        assert!(validate("flashcard_generator", &p).is_valid);
        p.insert("count".into(), json!(7.5));
        assert_eq!(
            validate("flashcard_generator", &p).reason.as_deref(),
            Some("count must be an integer")
        );
        p.insert("count".into(), json!(25.0));
        assert_eq!(
            validate("flashcard_generator", &p).reason.as_deref(),
            Some("count must be between 1 and 20")
        );
    }

    #[test]
    fn test_optional_flags_checked_when_present() {
        let mut notes = params(json!({"topic": "t", "subject": "s", "note_taking_style": "outline"}));
        assert!(validate("note_maker", &notes).is_valid);

        notes.insert("include_analogies".into(), json!("yes"));
        assert_eq!(
            validate("note_maker", &notes).reason.as_deref(),
            Some("include_analogies must be true or false")
        );

        let mut cards = valid_flashcards();
        cards.insert("include_examples".into(), json!(1));
        assert!(!validate("flashcard_generator", &cards).is_valid);
    }

    #[test]
    fn test_enumerations() {
        let mut p = valid_flashcards();
        p.insert("difficulty".into(), json!("extreme"));
        assert!(validate("flashcard_generator", &p)
            .reason
            .unwrap()
            .starts_with("Invalid difficulty"));

        let notes = params(json!({"topic": "t", "subject": "s", "note_taking_style": "mindmap"}));
        assert!(!validate("note_maker", &notes).is_valid);

        let explain = params(json!({"concept_to_explain": "c", "current_topic": "t", "desired_depth": "deep"}));
        assert!(!validate("concept_explainer", &explain).is_valid);
    }

    #[test]
    fn test_validate_all_preserves_order() {
        let mut set = ToolParameterSet::new();
        set.insert("flashcard_generator".into(), valid_flashcards());
        set.insert("note_maker".into(), ParamMap::new());
        let verdicts = validate_all(&set);
        let names: Vec<_> = verdicts.keys().cloned().collect();
        assert_eq!(names, vec!["flashcard_generator", "note_maker"]);
        assert!(verdicts["flashcard_generator"].is_valid);
        assert!(!verdicts["note_maker"].is_valid);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_extra_keys_never_invalidate(
                key in "[a-z_]{1,12}",
                value in prop_oneof![
                    Just(json!(null)),
                    any::<i64>().prop_map(|n| json!(n)),
                    "[a-z ]{0,10}".prop_map(|s| json!(s)),
                ],
            ) {
                let mut p = valid_flashcards();
                prop_assume!(!p.contains_key(&key));
                p.insert(key, value);
                prop_assert!(validate("flashcard_generator", &p).is_valid);
            }

            #[test]
            fn prop_count_verdict_matches_range(count in -50i64..50) {
                let mut p = valid_flashcards();
                p.insert("count".into(), json!(count));
                prop_assert_eq!(
                    validate("flashcard_generator", &p).is_valid,
                    (1..=20).contains(&count)
                );
            }
        }
    }
}
