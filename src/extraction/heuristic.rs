//! Deterministic keyword and pattern rules.
//!
//! Every rule lives in an explicit static table so it can be tested without a
//! language model. [`HeuristicStrategy`] never fails.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::json;

use super::{ExtractionContext, ExtractionStrategy};
use crate::models::{IntentAnalysis, IntentSource, ParamMap, StudentProfile, ToolKind, ToolParameterSet};
use crate::tools::markers;
use crate::StudyflowError;

pub const HEURISTIC_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_TOOL: ToolKind = ToolKind::ConceptExplainer;
pub const GENERAL_SUBJECT: &str = "general";
pub const GENERAL_TOPIC: &str = "General Study";
pub const FALLBACK_CONCEPT: &str = "the requested concept";
pub const DEFAULT_FLASHCARD_COUNT: i64 = 7;

/// Keyword → tool. A tool is selected when any keyword is a substring of the
/// lowercased message.
pub static TOOL_KEYWORDS: &[(ToolKind, &[&str])] = &[
    (ToolKind::NoteMaker, &["notes", "note", "summary", "outline"]),
    (
        ToolKind::FlashcardGenerator,
        &["flashcard", "flash card", "memorize", "review", "quiz"],
    ),
    (
        ToolKind::ConceptExplainer,
        &["explain", "what is", "how does", "understand", "confused"],
    ),
];

/// Keyword → subject, scored by number of keyword hits. Table order breaks ties.
pub static SUBJECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("spanish", &["spanish", "español", "castellano", "hispanic", "latino"]),
    ("french", &["french", "français", "francais", "francophone"]),
    ("german", &["german", "deutsch", "germanic"]),
    ("english", &["english", "grammar", "literature", "writing", "reading"]),
    (
        "physics",
        &[
            "quantum",
            "mechanics",
            "relativity",
            "thermodynamics",
            "electromagnetism",
            "physics",
            "particle",
            "wave",
            "energy",
            "force",
        ],
    ),
    (
        "chemistry",
        &[
            "molecule", "compound", "reaction", "chemistry", "chemical", "bond", "element", "acid",
            "base", "organic",
        ],
    ),
    (
        "biology",
        &[
            "biology",
            "cell",
            "dna",
            "gene",
            "evolution",
            "organism",
            "photosynthesis",
            "respiration",
            "protein",
            "enzyme",
        ],
    ),
    (
        "mathematics",
        &[
            "math",
            "algebra",
            "calculus",
            "geometry",
            "derivative",
            "integral",
            "equation",
            "function",
            "theorem",
        ],
    ),
    (
        "history",
        &[
            "history",
            "war",
            "revolution",
            "ancient",
            "civilization",
            "empire",
            "battle",
            "treaty",
        ],
    ),
    (
        "literature",
        &[
            "literature",
            "novel",
            "poem",
            "author",
            "character",
            "plot",
            "theme",
            "metaphor",
        ],
    ),
];

const LANGUAGES: &[&str] = &["spanish", "french", "german", "english"];

const LANGUAGE_TOPICS: &[&str] = &[
    "spanish vocabulary",
    "french vocabulary",
    "german vocabulary",
    "spanish words",
    "french words",
    "german words",
    "spanish language",
    "french language",
    "german language",
];

/// Multi-word educational concepts recognized verbatim.
pub static CURATED_CONCEPTS: &[&str] = &[
    "quantum mechanics",
    "photosynthesis",
    "derivatives",
    "calculus",
    "algebra",
    "geometry",
    "evolution",
    "dna",
    "atoms",
    "molecules",
    "thermodynamics",
    "electromagnetism",
    "organic chemistry",
    "world war",
    "civil rights",
    "renaissance",
    "industrial revolution",
    "p block elements",
    "s block elements",
    "d block elements",
    "f block elements",
    "periodic table",
    "chemical bonding",
    "atomic structure",
    "electron configuration",
    "oxidation states",
    "ionic compounds",
    "covalent compounds",
    "molecular geometry",
    "spanish vocabulary",
    "french vocabulary",
    "german vocabulary",
    "english grammar",
    "math problems",
    "science concepts",
    "history facts",
    "literature analysis",
];

/// Bare subject names accepted as a topic when nothing more specific matched.
const SUBJECT_WORDS: &[&str] = &[
    "spanish",
    "french",
    "german",
    "english",
    "math",
    "science",
    "history",
    "biology",
    "chemistry",
    "physics",
];

const DISTRESS_WORDS: &[&str] = &["struggling", "confused", "difficult", "hard"];
const CHALLENGE_WORDS: &[&str] = &["challenge", "advanced", "complex"];

pub static DIFFICULTY_PHRASES: &[&str] = &[
    "struggling with",
    "confused about",
    "don't understand",
    "having trouble",
    "need help with",
    "challenging",
    "difficult",
    "easy",
    "simple",
    "basic",
];

static SUBJECT_TOPIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(spanish|french|german|english|math|science|history|biology|chemistry|physics)\s+(vocabulary|words|grammar|concepts|problems|facts)",
        r"(calculus|algebra|geometry)\s+(derivatives|problems|equations)",
        r"(quantum|organic|physical)\s+(mechanics|chemistry|science)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid subject topic regex"))
    .collect()
});

static REQUEST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:flashcards?|notes?|help)\s+(?:for|with|on)\s+([^.!?]+)",
        r"i need\s+(?:help with\s+)?([^.!?]+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid request regex"))
    .collect()
});

static EXPLAIN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"explain\s+([^\s?]+)",
        r"what is\s+([^\s?]+)",
        r"how does\s+([^\s?]+)",
        r"tell me about\s+([^\s?]+)",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid explain regex"))
    .collect()
});

static STOP_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:the|a|an|and|or|but|in|on|at|to|for|of|with|by|my|your)\b")
        .expect("valid stop word regex")
});

static MASTERY_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"level\s*(\d+)").expect("valid mastery level regex"));

/// Tools whose keywords appear in the message, in registry order.
/// Never empty: defaults to the concept explainer.
pub fn select_tools(message: &str) -> Vec<String> {
    let lower = message.to_lowercase();
    let mut tools: Vec<String> = TOOL_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(*k)))
        .map(|(tool, _)| tool.as_str().to_string())
        .collect();
    if tools.is_empty() {
        tools.push(DEFAULT_TOOL.as_str().to_string());
    }
    tools
}

/// Highest-scoring subject, or "general" when nothing matches.
pub fn infer_subject(message: &str) -> String {
    let lower = message.to_lowercase();
    let mut best: Option<(&str, usize)> = None;
    for &(subject, keywords) in SUBJECT_KEYWORDS {
        let score = keywords.iter().filter(|k| lower.contains(**k)).count();
        // Strictly greater keeps the earliest subject on ties.
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((subject, score));
        }
    }
    best.map(|(subject, _)| subject.to_string())
        .unwrap_or_else(|| GENERAL_SUBJECT.to_string())
}

/// Specific topics: language phrases, curated concepts, then subject+topic
/// compounds. Deduplicated, at most three.
pub fn specific_topics(message: &str) -> Vec<String> {
    let lower = message.to_lowercase();
    let mut topics: Vec<String> = Vec::new();

    for phrase in LANGUAGE_TOPICS.iter().chain(CURATED_CONCEPTS) {
        if lower.contains(*phrase) {
            push_unique(&mut topics, phrase.to_string());
        }
    }
    for pattern in SUBJECT_TOPIC_PATTERNS.iter() {
        for caps in pattern.captures_iter(&lower) {
            push_unique(&mut topics, format!("{} {}", &caps[1], &caps[2]));
        }
    }

    topics.truncate(IntentAnalysis::MAX_TOPICS);
    topics
}

/// Topics for intent analysis. Falls back to bare subject names and
/// capitalized words when no specific topic matched.
pub fn extract_topics(message: &str) -> Vec<String> {
    let topics = specific_topics(message);
    if !topics.is_empty() {
        return topics;
    }

    let mut loose: Vec<String> = Vec::new();
    for word in message.split_whitespace() {
        if word.chars().count() <= 3 || !word.chars().all(char::is_alphabetic) {
            continue;
        }
        let lower = word.to_lowercase();
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        if SUBJECT_WORDS.contains(&lower.as_str()) || capitalized {
            push_unique(&mut loose, lower);
        }
    }
    loose.truncate(IntentAnalysis::MAX_TOPICS);
    loose
}

fn push_unique(topics: &mut Vec<String>, topic: String) {
    if !topics.contains(&topic) {
        topics.push(topic);
    }
}

fn strip_stop_words(text: &str) -> String {
    STOP_WORDS
        .replace_all(text, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The single topic handed to note and flashcard tools.
pub fn main_topic(message: &str, subject: &str) -> String {
    let lower = message.to_lowercase();

    if LANGUAGES.contains(&subject) {
        return if lower.contains("vocabulary") || lower.contains("words") {
            format!("{} vocabulary", subject)
        } else if lower.contains("grammar") {
            format!("{} grammar", subject)
        } else {
            format!("{} language", subject)
        };
    }

    if let Some(topic) = specific_topics(message).into_iter().next() {
        return topic;
    }

    for pattern in REQUEST_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(&lower) {
            let topic = strip_stop_words(&caps[1]);
            if !topic.is_empty() {
                return topic;
            }
        }
    }

    if subject != GENERAL_SUBJECT {
        return format!("{} concepts", subject);
    }
    GENERAL_TOPIC.to_string()
}

/// The concept handed to the explainer.
pub fn main_concept(message: &str) -> String {
    if let Some(topic) = specific_topics(message).into_iter().next() {
        return topic;
    }

    let lower = message.to_lowercase();
    EXPLAIN_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(&lower))
        .map(|caps| strip_stop_words(&caps[1]))
        .find(|concept| !concept.is_empty())
        .unwrap_or_else(|| FALLBACK_CONCEPT.to_string())
}

/// Flashcard difficulty from message wording, then mastery level.
pub fn infer_difficulty(message: &str, profile: &StudentProfile) -> &'static str {
    let lower = message.to_lowercase();
    if DISTRESS_WORDS.iter().any(|w| lower.contains(w)) {
        return "easy";
    }
    if CHALLENGE_WORDS.iter().any(|w| lower.contains(w)) {
        return "hard";
    }

    let mastery = profile.mastery_level.to_lowercase();
    let level = MASTERY_LEVEL
        .captures(&mastery)
        .and_then(|caps| caps[1].parse::<u32>().ok());
    if level.is_some_and(|n| n <= 3) || mastery.contains("foundation") {
        "easy"
    } else if level.is_some_and(|n| n >= 7) || mastery.contains("advanced") {
        "hard"
    } else {
        "medium"
    }
}

/// Difficulty phrases present in the message.
pub fn difficulty_indicators(message: &str) -> Vec<String> {
    let lower = message.to_lowercase();
    DIFFICULTY_PHRASES
        .iter()
        .filter(|p| lower.contains(**p))
        .map(|p| p.to_string())
        .collect()
}

/// Keyword-rule extraction strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    pub fn new() -> Self {
        Self
    }

    pub fn intent(&self, ctx: &ExtractionContext) -> IntentAnalysis {
        IntentAnalysis {
            tools_needed: select_tools(&ctx.message),
            primary_intent: "learning".to_string(),
            topics: extract_topics(&ctx.message),
            subject: infer_subject(&ctx.message),
            difficulty_indicators: difficulty_indicators(&ctx.message),
            confidence: HEURISTIC_CONFIDENCE,
            source: IntentSource::Heuristic,
        }
        .normalized()
    }

    /// One parameter map per requested tool. Unknown tools get an empty map
    /// so the validator reports them.
    pub fn parameters(&self, tools_needed: &[String], ctx: &ExtractionContext) -> ToolParameterSet {
        let subject = infer_subject(&ctx.message);
        let topic = main_topic(&ctx.message, &subject);
        let difficulty = infer_difficulty(&ctx.message, &ctx.profile);

        tools_needed
            .iter()
            .map(|name| {
                let params = match ToolKind::from_name(name) {
                    Some(ToolKind::NoteMaker) => json!({
                        "topic": topic,
                        "subject": subject,
                        "note_taking_style": "outline",
                        "include_examples": true,
                        "include_analogies": ctx.profile.learning_style_mentions("visual"),
                    }),
                    Some(ToolKind::FlashcardGenerator) => json!({
                        "topic": topic,
                        "count": DEFAULT_FLASHCARD_COUNT,
                        "difficulty": difficulty,
                        "subject": subject,
                        "include_examples": true,
                    }),
                    Some(ToolKind::ConceptExplainer) => json!({
                        "concept_to_explain": main_concept(&ctx.message),
                        "current_topic": subject,
                        "desired_depth": if ctx.profile.emotion_mentions(markers::CONFUSED) {
                            "basic"
                        } else {
                            "intermediate"
                        },
                    }),
                    None => json!({}),
                };
                let params = match params {
                    serde_json::Value::Object(map) => map,
                    _ => ParamMap::new(),
                };
                (name.clone(), params)
            })
            .collect()
    }
}

#[async_trait]
impl ExtractionStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn analyze_intent(&self, ctx: &ExtractionContext) -> Result<IntentAnalysis, StudyflowError> {
        Ok(self.intent(ctx))
    }

    async fn extract_parameters(
        &self,
        tools_needed: &[String],
        ctx: &ExtractionContext,
    ) -> Result<ToolParameterSet, StudyflowError> {
        Ok(self.parameters(tools_needed, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::validate;
    use pretty_assertions::assert_eq;

    fn profile(mastery: &str, emotion: &str, style: &str) -> StudentProfile {
        StudentProfile {
            id: "s1".into(),
            name: "Ayaan".into(),
            grade: "10".into(),
            learning_style: style.into(),
            emotional_state: emotion.into(),
            mastery_level: mastery.into(),
        }
    }

    fn ctx(message: &str) -> ExtractionContext {
        ExtractionContext::new(profile("Level 5", "calm", "reading"), message)
    }

    #[test]
    fn test_spanish_flashcard_intent() {
        let analysis = HeuristicStrategy.intent(&ctx("Make flashcards for Spanish vocabulary"));
        assert_eq!(analysis.tools_needed, vec!["flashcard_generator"]);
        assert_eq!(analysis.subject, "spanish");
        assert!(analysis.topics.iter().any(|t| t.contains("spanish")));
        assert_eq!(analysis.confidence, HEURISTIC_CONFIDENCE);
        assert_eq!(analysis.source, IntentSource::Heuristic);
    }

    #[test]
    fn test_spanish_flashcard_parameters() {
        let c = ctx("Make flashcards for Spanish vocabulary");
        let params = HeuristicStrategy.parameters(&["flashcard_generator".to_string()], &c);
        let cards = &params["flashcard_generator"];
        assert_eq!(cards["topic"], "spanish vocabulary");
        assert_eq!(cards["subject"], "spanish");
        assert_eq!(cards["count"], 7);
        assert_eq!(cards["difficulty"], "medium");
        assert!(validate("flashcard_generator", cards).is_valid);
    }

    #[test]
    fn test_no_keywords_defaults_to_explainer() {
        assert_eq!(select_tools("hello there"), vec!["concept_explainer"]);
    }

    #[test]
    fn test_multiple_tools_in_registry_order() {
        assert_eq!(
            select_tools("Explain cells, then give me notes and a quiz"),
            vec!["note_maker", "flashcard_generator", "concept_explainer"]
        );
    }

    #[test]
    fn test_quantum_mechanics_explainer() {
        let c = ExtractionContext::new(
            profile("Level 5", "Focused and motivated", "Visual learner"),
            "I need help understanding quantum mechanics",
        );
        let analysis = HeuristicStrategy.intent(&c);
        assert!(analysis.tools_needed.contains(&"concept_explainer".to_string()));
        assert_eq!(analysis.subject, "physics");

        let params = HeuristicStrategy.parameters(&analysis.tools_needed, &c);
        let explainer = &params["concept_explainer"];
        assert_eq!(explainer["concept_to_explain"], "quantum mechanics");
        assert_eq!(explainer["current_topic"], "physics");
        assert_eq!(explainer["desired_depth"], "intermediate");
    }

    #[test]
    fn test_confused_student_gets_basic_depth() {
        let c = ExtractionContext::new(profile("", "Confused and tired", ""), "what is entropy?");
        let params = HeuristicStrategy.parameters(&["concept_explainer".to_string()], &c);
        assert_eq!(params["concept_explainer"]["desired_depth"], "basic");
        assert_eq!(params["concept_explainer"]["concept_to_explain"], "entropy");
    }

    #[test]
    fn test_subject_ties_go_to_table_order() {
        // one hit each for english ("grammar") and physics ("energy")
        assert_eq!(infer_subject("grammar of energy"), "english");
        assert_eq!(infer_subject("nothing relevant"), "general");
    }

    #[test]
    fn test_subject_highest_score_wins() {
        assert_eq!(infer_subject("cell protein enzyme and one equation"), "biology");
    }

    #[test]
    fn test_main_topic_tiers() {
        assert_eq!(main_topic("french grammar drills", "french"), "french grammar");
        assert_eq!(main_topic("speak german", "german"), "german language");
        assert_eq!(main_topic("notes on the periodic table", "chemistry"), "periodic table");
        assert_eq!(
            main_topic("flashcards for my tax forms", GENERAL_SUBJECT),
            "tax forms"
        );
        assert_eq!(main_topic("i need help with the bus timetable", "general"), "bus timetable");
        assert_eq!(main_topic("give me stuff", "biology"), "biology concepts");
        assert_eq!(main_topic("give me stuff", GENERAL_SUBJECT), GENERAL_TOPIC);
    }

    #[test]
    fn test_topics_fall_back_to_capitalized_words() {
        assert_eq!(extract_topics("Tell me about Napoleon"), vec!["tell", "napoleon"]);
        assert!(extract_topics("ok go").is_empty());
    }

    #[test]
    fn test_topics_are_capped_at_three() {
        let topics = extract_topics("calculus algebra geometry evolution");
        assert_eq!(topics.len(), 3);
    }

    #[test]
    fn test_difficulty_from_wording_and_mastery() {
        let p = |m: &str| profile(m, "", "");
        assert_eq!(infer_difficulty("I'm struggling", &p("Level 9")), "easy");
        assert_eq!(infer_difficulty("something advanced", &p("Level 1")), "hard");
        assert_eq!(infer_difficulty("cards", &p("Level 2")), "easy");
        assert_eq!(infer_difficulty("cards", &p("Foundation stage")), "easy");
        assert_eq!(infer_difficulty("cards", &p("Level 10")), "hard");
        assert_eq!(infer_difficulty("cards", &p("Level 5")), "medium");
        assert_eq!(infer_difficulty("cards", &p("")), "medium");
    }

    #[test]
    fn test_difficulty_indicator_phrases() {
        assert_eq!(
            difficulty_indicators("I'm struggling with this, it's difficult"),
            vec!["struggling with", "difficult"]
        );
    }

    #[test]
    fn test_note_analogies_follow_learning_style() {
        let visual = ExtractionContext::new(profile("", "", "Visual learner"), "notes on dna");
        let params = HeuristicStrategy.parameters(&["note_maker".to_string()], &visual);
        assert_eq!(params["note_maker"]["include_analogies"], true);
        assert_eq!(params["note_maker"]["note_taking_style"], "outline");

        let plain = ctx("notes on dna");
        let params = HeuristicStrategy.parameters(&["note_maker".to_string()], &plain);
        assert_eq!(params["note_maker"]["include_analogies"], false);
    }

    #[test]
    fn test_unknown_tool_gets_empty_parameters() {
        let params = HeuristicStrategy.parameters(&["quiz_maker".to_string()], &ctx("quiz"));
        assert!(params["quiz_maker"].is_empty());
    }

    #[test]
    fn test_explain_pattern_skips_stop_words() {
        assert_eq!(main_concept("can you explain gravity to me"), "gravity");
        assert_eq!(main_concept("hmm"), FALLBACK_CONCEPT);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_fallback_flashcards_always_valid(message in "[A-Za-z ,.?!]{0,80}") {
                let c = ctx(&message);
                let params = HeuristicStrategy.parameters(&["flashcard_generator".to_string()], &c);
                let cards = &params["flashcard_generator"];
                let count = cards["count"].as_i64().unwrap();
                prop_assert!((1..=20).contains(&count));
                prop_assert!(["easy", "medium", "hard"].contains(&cards["difficulty"].as_str().unwrap()));
                prop_assert!(!cards["topic"].as_str().unwrap().trim().is_empty());
            }

            #[test]
            fn prop_intent_always_names_a_tool(message in ".{0,80}") {
                let analysis = HeuristicStrategy.intent(&ctx(&message));
                prop_assert!(!analysis.tools_needed.is_empty());
                prop_assert!(analysis.topics.len() <= 3);
            }
        }
    }
}
