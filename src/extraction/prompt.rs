//! Prompt construction for the language-model strategy.

use super::ExtractionContext;
use crate::llm::CompletionPrompt;
use crate::models::ConversationTurn;

const INTENT_SYSTEM: &str = "You are an educational intent analyzer. Analyze the conversation to determine:
1. What educational tools are needed (note_maker, flashcard_generator, concept_explainer)
2. The primary educational intent (learning, practicing, reviewing, explaining)
3. Key topics and subjects mentioned
4. Difficulty level indicators

Return only a JSON object with:
- tools_needed: list of tool names
- intent: primary educational intent
- topics: list of topics mentioned (at most 3)
- subject: academic subject
- difficulty_indicators: list of phrases indicating difficulty level
- confidence_score: 0-1 score for analysis confidence";

const PARAMETER_SYSTEM: &str = "You are a parameter extraction specialist. Extract parameters for educational tools from the conversation.

NOTE_MAKER (key \"note_maker\"):
- topic: main subject for notes
- subject: academic discipline
- note_taking_style: outline|bullet_points|narrative|structured
- include_examples: boolean
- include_analogies: boolean

FLASHCARD_GENERATOR (key \"flashcard_generator\"):
- topic: topic for flashcards
- count: number of flashcards (1-20)
- difficulty: easy|medium|hard
- subject: academic discipline
- include_examples: boolean

CONCEPT_EXPLAINER (key \"concept_explainer\"):
- concept_to_explain: specific concept
- current_topic: broader topic context
- desired_depth: basic|intermediate|advanced|comprehensive

Infer missing values from the student's mastery level, emotional state, grade, and the conversation.
Return only a JSON object keyed by tool name, one entry per requested tool.";

pub fn format_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return "(no previous messages)".to_string();
    }
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_student(ctx: &ExtractionContext) -> String {
    let p = &ctx.profile;
    let mut out = format!(
        "Name: {}\nGrade: {}\nLearning Style: {}\nEmotional State: {}\nMastery Level: {}",
        p.name, p.grade, p.learning_style, p.emotional_state, p.mastery_level
    );
    if let Some(personalization) = ctx.personalization.as_deref() {
        out.push_str("\nRecent Learning Patterns: ");
        out.push_str(personalization);
    }
    out
}

pub fn intent_prompt(ctx: &ExtractionContext) -> CompletionPrompt {
    CompletionPrompt {
        system: INTENT_SYSTEM.to_string(),
        user: format!(
            "Chat History:\n{}\n\nCurrent Message: {}\n\nStudent Info:\n{}",
            format_history(&ctx.history),
            ctx.message,
            format_student(ctx)
        ),
    }
}

pub fn parameter_prompt(tools_needed: &[String], ctx: &ExtractionContext) -> CompletionPrompt {
    CompletionPrompt {
        system: PARAMETER_SYSTEM.to_string(),
        user: format!(
            "Tools Needed: {}\n\nChat History:\n{}\n\nCurrent Message: {}\n\nStudent Info:\n{}",
            tools_needed.join(", "),
            format_history(&ctx.history),
            ctx.message,
            format_student(ctx)
        ),
    }
}
