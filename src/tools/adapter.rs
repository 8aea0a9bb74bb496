//! Teaching-style and emotional-state adaptation of extracted parameters.
//!
//! Style rules run first, emotional-state rules last so they can override.
//! Every rule that fires is recorded in the tool's `adaptations` list; the
//! focused count boost is the only non-idempotent rule and is skipped when
//! already recorded, so adapting twice equals adapting once.

use serde_json::{json, Value};

use super::schema::{integral, MAX_FLASHCARDS, MIN_FLASHCARDS};
use super::{markers, ADAPTATIONS_KEY};
use crate::models::{ParamMap, StudentProfile, TeachingStyle, ToolKind, ToolParameterSet};

/// Count assumed when a flashcard set arrives without one.
const DEFAULT_COUNT: i64 = 5;
const ANXIOUS_MAX_COUNT: i64 = 3;
const FOCUSED_BONUS: i64 = 2;

const RULE_VISUAL: &str = "visual_enrichment";
const RULE_SOCRATIC: &str = "socratic_raise";
const RULE_DIRECT: &str = "direct_outline";
const RULE_ANXIOUS: &str = "anxious_ease";
const RULE_FOCUSED: &str = "focused_boost";

/// Adapt a parameter set for a teaching style and student state.
///
/// Works on a copy; the input is left untouched.
pub fn adapt(
    params: &ToolParameterSet,
    style: TeachingStyle,
    profile: &StudentProfile,
) -> ToolParameterSet {
    let anxious = profile.emotion_mentions(markers::ANXIOUS);
    let focused = profile.emotion_mentions(markers::FOCUSED);

    let mut adapted = params.clone();
    for (tool_name, tool_params) in adapted.iter_mut() {
        let Some(tool) = ToolKind::from_name(tool_name) else {
            continue;
        };
        apply_style(tool, style, tool_params);
        if anxious {
            apply_anxious(tool, tool_params);
        } else if focused {
            apply_focused(tool, tool_params);
        }
        if tool == ToolKind::FlashcardGenerator {
            clamp_count(tool_params);
        }
    }
    adapted
}

fn apply_style(tool: ToolKind, style: TeachingStyle, params: &mut ParamMap) {
    match (style, tool) {
        (TeachingStyle::Visual, ToolKind::NoteMaker) => {
            params.insert("include_analogies".into(), json!(true));
            params.insert("include_examples".into(), json!(true));
            record(params, RULE_VISUAL);
        }
        (TeachingStyle::Socratic, ToolKind::FlashcardGenerator) => {
            if params.get("difficulty").and_then(Value::as_str) == Some("easy") {
                params.insert("difficulty".into(), json!("medium"));
                record(params, RULE_SOCRATIC);
            }
        }
        (TeachingStyle::Direct, ToolKind::NoteMaker) => {
            params.insert("note_taking_style".into(), json!("outline"));
            params.insert("include_analogies".into(), json!(false));
            record(params, RULE_DIRECT);
        }
        // Flipped classroom has no parameter rule.
        _ => {}
    }
}

fn apply_anxious(tool: ToolKind, params: &mut ParamMap) {
    match tool {
        ToolKind::FlashcardGenerator => {
            params.insert("difficulty".into(), json!("easy"));
            if let Some(count) = count_or_default(params) {
                params.insert("count".into(), json!(count.min(ANXIOUS_MAX_COUNT)));
            }
            record(params, RULE_ANXIOUS);
        }
        ToolKind::ConceptExplainer => {
            params.insert("desired_depth".into(), json!("basic"));
            record(params, RULE_ANXIOUS);
        }
        ToolKind::NoteMaker => {}
    }
}

fn apply_focused(tool: ToolKind, params: &mut ParamMap) {
    if tool != ToolKind::FlashcardGenerator || has_rule(params, RULE_FOCUSED) {
        return;
    }
    if let Some(count) = count_or_default(params) {
        params.insert(
            "count".into(),
            json!((count + FOCUSED_BONUS).min(MAX_FLASHCARDS)),
        );
        record(params, RULE_FOCUSED);
    }
}

/// Integer count, or the default when absent. `None` for a non-integer
/// value, which is left for the validator to reject.
fn count_or_default(params: &ParamMap) -> Option<i64> {
    match params.get("count") {
        None | Some(Value::Null) => Some(DEFAULT_COUNT),
        Some(v) => integral(v),
    }
}

fn clamp_count(params: &mut ParamMap) {
    if let Some(count) = params.get("count").and_then(integral) {
        params.insert(
            "count".into(),
            json!(count.clamp(MIN_FLASHCARDS, MAX_FLASHCARDS)),
        );
    }
}

fn has_rule(params: &ParamMap, rule: &str) -> bool {
    params
        .get(ADAPTATIONS_KEY)
        .and_then(Value::as_array)
        .is_some_and(|rules| rules.iter().any(|r| r.as_str() == Some(rule)))
}

fn record(params: &mut ParamMap, rule: &str) {
    if has_rule(params, rule) {
        return;
    }
    match params.get_mut(ADAPTATIONS_KEY) {
        Some(Value::Array(rules)) => rules.push(json!(rule)),
        _ => {
            params.insert(ADAPTATIONS_KEY.into(), json!([rule]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile(emotion: &str) -> StudentProfile {
        StudentProfile {
            id: "s1".into(),
            name: "Sam".into(),
            grade: "10".into(),
            learning_style: "Visual learner".into(),
            emotional_state: emotion.into(),
            mastery_level: "Level 5".into(),
        }
    }

    fn all_tools() -> ToolParameterSet {
        let mut set = ToolParameterSet::new();
        set.insert(
            "note_maker".into(),
            json!({"topic": "cells", "subject": "biology", "note_taking_style": "narrative",
                   "include_examples": false, "include_analogies": false})
            .as_object()
            .cloned()
            .unwrap(),
        );
        set.insert(
            "flashcard_generator".into(),
            json!({"topic": "cells", "count": 7, "difficulty": "easy", "subject": "biology"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        set.insert(
            "concept_explainer".into(),
            json!({"concept_to_explain": "mitosis", "current_topic": "biology",
                   "desired_depth": "advanced"})
            .as_object()
            .cloned()
            .unwrap(),
        );
        set
    }

    #[test]
    fn test_visual_enriches_notes() {
        let out = adapt(&all_tools(), TeachingStyle::Visual, &profile("calm"));
        assert_eq!(out["note_maker"]["include_analogies"], json!(true));
        assert_eq!(out["note_maker"]["include_examples"], json!(true));
        assert_eq!(out["note_maker"]["note_taking_style"], json!("narrative"));
    }

    #[test]
    fn test_socratic_raises_easy_flashcards_only() {
        let out = adapt(&all_tools(), TeachingStyle::Socratic, &profile("calm"));
        assert_eq!(out["flashcard_generator"]["difficulty"], json!("medium"));

        let mut hard = all_tools();
        hard["flashcard_generator"].insert("difficulty".into(), json!("hard"));
        let out = adapt(&hard, TeachingStyle::Socratic, &profile("calm"));
        assert_eq!(out["flashcard_generator"]["difficulty"], json!("hard"));
    }

    #[test]
    fn test_direct_forces_outline_without_analogies() {
        let mut set = all_tools();
        set["note_maker"].insert("include_analogies".into(), json!(true));
        let out = adapt(&set, TeachingStyle::Direct, &profile("calm"));
        assert_eq!(out["note_maker"]["note_taking_style"], json!("outline"));
        assert_eq!(out["note_maker"]["include_analogies"], json!(false));
    }

    #[test]
    fn test_flipped_classroom_only_passes_through() {
        let set = all_tools();
        let out = adapt(&set, TeachingStyle::FlippedClassroom, &profile("calm"));
        assert_eq!(out, set);
    }

    #[test]
    fn test_anxious_overrides_socratic() {
        let out = adapt(&all_tools(), TeachingStyle::Socratic, &profile("Anxious about exams"));
        assert_eq!(out["flashcard_generator"]["difficulty"], json!("easy"));
        assert_eq!(out["flashcard_generator"]["count"], json!(3));
        assert_eq!(out["concept_explainer"]["desired_depth"], json!("basic"));
    }

    #[test]
    fn test_focused_adds_two_capped_at_twenty() {
        let out = adapt(&all_tools(), TeachingStyle::Direct, &profile("Focused and motivated"));
        assert_eq!(out["flashcard_generator"]["count"], json!(9));

        let mut big = all_tools();
        big["flashcard_generator"].insert("count".into(), json!(19));
        let out = adapt(&big, TeachingStyle::Direct, &profile("focused"));
        assert_eq!(out["flashcard_generator"]["count"], json!(20));
    }

    #[test]
    fn test_anxious_wins_over_focused() {
        let out = adapt(&all_tools(), TeachingStyle::Direct, &profile("anxious but focused"));
        assert_eq!(out["flashcard_generator"]["count"], json!(3));
    }

    #[test]
    fn test_missing_count_uses_default() {
        let mut set = all_tools();
        set["flashcard_generator"].remove("count");
        let out = adapt(&set, TeachingStyle::Direct, &profile("focused"));
        assert_eq!(out["flashcard_generator"]["count"], json!(7));
    }

    #[test]
    fn test_out_of_range_count_is_clamped() {
        let mut set = all_tools();
        set["flashcard_generator"].insert("count".into(), json!(45));
        let out = adapt(&set, TeachingStyle::Direct, &profile("calm"));
        assert_eq!(out["flashcard_generator"]["count"], json!(20));
    }

    #[test]
    fn test_whole_float_count_is_adapted_and_normalized() {
        let mut set = all_tools();
        set["flashcard_generator"].insert("count".into(), json!(7.0));
        let out = adapt(&set, TeachingStyle::Direct, &profile("anxious"));
        assert_eq!(out["flashcard_generator"]["count"], json!(3));

        let out = adapt(&set, TeachingStyle::Direct, &profile("focused"));
        assert_eq!(out["flashcard_generator"]["count"], json!(9));

        set["flashcard_generator"].insert("count".into(), json!(40.0));
        let out = adapt(&set, TeachingStyle::Direct, &profile("calm"));
        assert_eq!(out["flashcard_generator"]["count"], json!(20));
        assert!(out["flashcard_generator"]["count"].is_i64());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let set = all_tools();
        let before = set.clone();
        let _ = adapt(&set, TeachingStyle::Visual, &profile("anxious"));
        assert_eq!(set, before);
    }

    #[test]
    fn test_unknown_tools_are_left_alone() {
        let mut set = ToolParameterSet::new();
        set.insert("essay_grader".into(), ParamMap::new());
        let out = adapt(&set, TeachingStyle::Visual, &profile("anxious"));
        assert_eq!(out, set);
    }

    #[test]
    fn test_focused_twice_is_idempotent() {
        let p = profile("focused");
        let once = adapt(&all_tools(), TeachingStyle::Socratic, &p);
        let twice = adapt(&once, TeachingStyle::Socratic, &p);
        assert_eq!(once, twice);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_style() -> impl Strategy<Value = TeachingStyle> {
            prop::sample::select(TeachingStyle::ALL.to_vec())
        }

        fn arb_emotion() -> impl Strategy<Value = &'static str> {
            prop::sample::select(vec![
                "calm",
                "Anxious",
                "Focused and motivated",
                "confused",
                "anxious and focused",
            ])
        }

        proptest! {
            #[test]
            fn prop_adapt_is_idempotent(
                style in arb_style(),
                emotion in arb_emotion(),
                count in -5i64..40,
                difficulty in prop::sample::select(vec!["easy", "medium", "hard"]),
            ) {
                let mut set = all_tools();
                set["flashcard_generator"].insert("count".into(), json!(count));
                set["flashcard_generator"].insert("difficulty".into(), json!(difficulty));
                let p = profile(emotion);
                let once = adapt(&set, style, &p);
                let twice = adapt(&once, style, &p);
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn prop_flashcard_count_in_range(
                style in arb_style(),
                emotion in arb_emotion(),
                count in -100i64..100,
            ) {
                let mut set = all_tools();
                set["flashcard_generator"].insert("count".into(), json!(count));
                let out = adapt(&set, style, &profile(emotion));
                let n = out["flashcard_generator"]["count"].as_i64().unwrap();
                prop_assert!((1..=20).contains(&n));
            }

            #[test]
            fn prop_anxious_flashcards_are_small_and_easy(
                style in arb_style(),
                count in -100i64..100,
            ) {
                let mut set = all_tools();
                set["flashcard_generator"].insert("count".into(), json!(count));
                let out = adapt(&set, style, &profile("very anxious today"));
                prop_assert!(out["flashcard_generator"]["count"].as_i64().unwrap() <= 3);
                prop_assert_eq!(&out["flashcard_generator"]["difficulty"], &json!("easy"));
            }
        }
    }
}
