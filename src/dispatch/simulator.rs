use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::templates::{
    CardTemplate, ConceptExtras, NoteTemplate, CONCEPT_EXTRAS, EXPLANATIONS, FLASHCARD_TEMPLATES,
    NOTE_TEMPLATES,
};
use super::{ToolBackend, ToolCall};
use crate::models::{ParamMap, StudentProfile, ToolKind};
use crate::tools::schema::integral;
use crate::StudyflowError;

/// Local stand-in for the real tool services.
///
/// Output is deterministic for a given call and shaped like the real
/// services' responses.
#[derive(Debug, Clone, Default)]
pub struct SimulatorBackend {
    delay: Duration,
}

impl SimulatorBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add artificial latency to every call.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ToolBackend for SimulatorBackend {
    fn name(&self) -> String {
        "simulator".to_string()
    }

    async fn invoke(&self, call: &ToolCall<'_>) -> Result<Value, StudyflowError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let data = match call.tool {
            ToolKind::NoteMaker => notes(call.params),
            ToolKind::FlashcardGenerator => flashcards(call.params, call.profile),
            ToolKind::ConceptExplainer => explanation(call.params),
        };
        Ok(data)
    }
}

fn text<'a>(params: &'a ParamMap, key: &str, default: &'a str) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn flag(params: &ParamMap, key: &str, default: bool) -> bool {
    params.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Capitalize the first letter of every word.
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_clause(s: &str) -> &str {
    s.split(',').next().unwrap_or_default().trim()
}

fn notes(params: &ParamMap) -> Value {
    let topic = text(params, "topic", "General Topic");
    let subject = text(params, "subject", "General");
    let style = text(params, "note_taking_style", "outline");
    let examples = flag(params, "include_examples", true);
    let analogies = flag(params, "include_analogies", false);

    let template = NOTE_TEMPLATES
        .iter()
        .find(|t| t.topic == topic.to_lowercase());

    let (title, summary, sections) = match template {
        Some(t) => (t.title.to_string(), t.summary.to_string(), template_sections(t, examples, analogies)),
        None => (
            format!("{} - Study Notes", title_case(topic)),
            format!("Comprehensive notes on {} for {} studies.", topic, subject),
            generic_sections(topic, examples, analogies),
        ),
    };

    let key_concepts: Vec<Value> = sections.iter().map(|s| s["title"].clone()).collect();

    json!({
        "topic": topic,
        "title": title,
        "summary": summary,
        "note_sections": sections,
        "key_concepts": key_concepts,
        "connections_to_prior_learning": [
            format!("Builds on previous knowledge of {}", subject),
            format!("Relates to fundamental concepts in {}", subject),
        ],
        "practice_suggestions": [
            format!("Practice problems on {}", topic),
            format!("Review related {} concepts", subject),
            "Create concept maps",
        ],
        "source_references": [
            format!("{} textbook Chapter on {}", subject, topic),
            format!("Online resources for {}", topic),
        ],
        "note_taking_style": style,
    })
}

fn template_sections(template: &NoteTemplate, examples: bool, analogies: bool) -> Vec<Value> {
    template
        .sections
        .iter()
        .map(|s| {
            json!({
                "title": s.title,
                "content": s.content,
                "key_points": s.key_points,
                "examples": gated(examples, s.examples),
                "analogies": gated(analogies, s.analogies),
            })
        })
        .collect()
}

fn gated(on: bool, items: &'static [&'static str]) -> &'static [&'static str] {
    if on {
        items
    } else {
        &[]
    }
}

fn generic_sections(topic: &str, examples: bool, analogies: bool) -> Vec<Value> {
    let maybe = |on: bool, items: Vec<String>| if on { items } else { Vec::new() };
    vec![
        json!({
            "title": "Overview",
            "content": format!("Key concepts and principles related to {}.", topic),
            "key_points": (1..=3).map(|i| format!("Important aspect {} of {}", i, topic)).collect::<Vec<_>>(),
            "examples": maybe(examples, vec![format!("Example 1 for {}", topic), format!("Example 2 for {}", topic)]),
            "analogies": maybe(analogies, vec![format!("Think of {} like...", topic)]),
        }),
        json!({
            "title": "Applications",
            "content": format!("How {} is applied in real-world scenarios.", topic),
            "key_points": ["Application 1", "Application 2", "Application 3"],
            "examples": maybe(examples, vec!["Real-world example 1".to_string(), "Real-world example 2".to_string()]),
            "analogies": maybe(analogies, vec!["Similar to everyday experience of...".to_string()]),
        }),
    ]
}

fn generic_cards(topic: &str) -> Vec<(String, String, String)> {
    vec![
        (
            format!("What is the main concept of {}?", topic),
            format!("Key principle of {}", topic),
            format!("Example related to {}", topic),
        ),
        (
            format!("How is {} applied?", topic),
            format!("Application of {}", topic),
            format!("Real-world use of {}", topic),
        ),
        (
            format!("What are the components of {}?", topic),
            format!("Parts of {}", topic),
            format!("Elements that make up {}", topic),
        ),
        (
            format!("Why is {} important?", topic),
            format!("Significance of {}", topic),
            format!("Impact of {}", topic),
        ),
        (
            format!("How does {} work?", topic),
            format!("Process of {}", topic),
            format!("Step-by-step {}", topic),
        ),
    ]
}

fn owned(cards: &[CardTemplate]) -> Vec<(String, String, String)> {
    cards
        .iter()
        .map(|c| (c.question.to_string(), c.answer.to_string(), c.example.to_string()))
        .collect()
}

fn flashcards(params: &ParamMap, profile: &StudentProfile) -> Value {
    let topic = text(params, "topic", "General Topic");
    let difficulty = text(params, "difficulty", "medium");
    let examples = flag(params, "include_examples", true);
    let count = params.get("count").and_then(integral).unwrap_or(5).max(0) as usize;

    let topic_lower = topic.to_lowercase();
    let templates = FLASHCARD_TEMPLATES
        .iter()
        .find(|(key, _)| topic_lower.contains(*key))
        .map(|(_, cards)| owned(cards))
        .unwrap_or_else(|| generic_cards(topic));

    let cards: Vec<Value> = templates
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, (question, answer, example))| {
            let question = match difficulty {
                "easy" => question.replace("What is", "What is the basic"),
                "hard" => question.replace("What is", "Analyze and explain"),
                _ => question,
            };
            json!({
                "title": format!("{} - Card {}", title_case(topic), i + 1),
                "question": question,
                "answer": answer,
                "example": if examples { example } else { String::new() },
            })
        })
        .collect();

    json!({
        "flashcards": cards,
        "topic": topic,
        "difficulty": difficulty,
        "adaptation_details": format!(
            "Adapted for {} and {}",
            first_clause(&profile.learning_style),
            first_clause(&profile.emotional_state)
        ),
    })
}

fn explanation(params: &ParamMap) -> Value {
    let concept = text(params, "concept_to_explain", "General Concept");
    let topic = text(params, "current_topic", "General");
    let depth = text(params, "desired_depth", "intermediate");
    let key = concept.trim().to_lowercase();

    let known = EXPLANATIONS
        .iter()
        .find(|(k, _)| *k == key)
        .or_else(|| {
            EXPLANATIONS
                .iter()
                .find(|(k, _)| key.contains(*k) || (!key.is_empty() && k.contains(key.as_str())))
        });

    let explanation = match known {
        Some((_, texts)) => texts.at(depth).to_string(),
        None => match depth {
            "basic" => format!(
                "{} is a fundamental concept in {}. It involves key principles that are important to understand.",
                concept, topic
            ),
            "advanced" => format!(
                "{} represents a complex system with multiple interacting components and theoretical frameworks in {}. It requires deep understanding of underlying principles.",
                concept, topic
            ),
            "comprehensive" => format!(
                "{} encompasses sophisticated theoretical and practical aspects that form the foundation of advanced {} studies. It connects to many other concepts in the field.",
                concept, topic
            ),
            _ => format!(
                "{} involves several key principles and mechanisms that are important in {}. Understanding this concept requires grasping its main components and how they work together.",
                concept, topic
            ),
        },
    };

    let (examples, related, practice) = match CONCEPT_EXTRAS.iter().find(|(k, _)| *k == key) {
        Some((_, ConceptExtras { examples, related_concepts, practice_questions })) => (
            to_strings(examples),
            to_strings(related_concepts),
            to_strings(practice_questions),
        ),
        None => (
            vec![
                format!("Practical application of {} in real-world scenarios", key),
                format!("Laboratory demonstration showing {} principles", key),
                format!("Industrial or technological use of {}", key),
            ],
            vec![
                format!("Fundamental principles underlying {}", key),
                format!("Advanced applications of {}", key),
                format!("Historical development of {}", key),
            ],
            vec![
                format!("What are the key principles of {}?", key),
                format!("How is {} applied in practice?", key),
                format!("What are the implications of {}?", key),
            ],
        ),
    };

    json!({
        "explanation": explanation,
        "desired_depth": depth,
        "examples": examples,
        "related_concepts": related,
        "visual_aids": [
            format!("Diagram showing {} process", concept),
            format!("Chart illustrating {} relationships", concept),
            format!("Graph depicting {} changes", concept),
        ],
        "practice_questions": practice,
        "source_references": [
            format!("{} textbook", topic),
            format!("Academic papers on {}", concept),
            format!("Online resources for {}", concept),
        ],
    })
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
