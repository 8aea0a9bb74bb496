//! Static tool schema registry.
//!
//! One [`ToolSchema`] per [`ToolKind`]: which parameters are required, which
//! are optional, and the rule each value must satisfy.

use serde::Serialize;
use serde_json::Value;

use crate::models::ToolKind;

pub const NOTE_STYLES: &[&str] = &["outline", "bullet_points", "narrative", "structured"];
pub const DIFFICULTIES: &[&str] = &["easy", "medium", "hard"];
pub const DEPTHS: &[&str] = &["basic", "intermediate", "advanced", "comprehensive"];
pub const MIN_FLASHCARDS: i64 = 1;
pub const MAX_FLASHCARDS: i64 = 20;

/// Constraint on a single parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamRule {
    /// Non-empty string.
    Text,
    Flag,
    OneOf { values: &'static [&'static str] },
    IntRange { min: i64, max: i64 },
}

/// Integer reading of a JSON number. Integral floats such as `7.0` count.
pub fn integral(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub required: bool,
    pub rule: ParamRule,
}

const fn required(name: &'static str, rule: ParamRule) -> ParamSpec {
    ParamSpec {
        name,
        required: true,
        rule,
    }
}

const fn optional(name: &'static str, rule: ParamRule) -> ParamSpec {
    ParamSpec {
        name,
        required: false,
        rule,
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolSchema {
    pub tool: ToolKind,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
}

impl ToolSchema {
    pub fn required(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| p.required)
    }

    pub fn optional(&self) -> impl Iterator<Item = &ParamSpec> {
        self.params.iter().filter(|p| !p.required)
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

static NOTE_MAKER: ToolSchema = ToolSchema {
    tool: ToolKind::NoteMaker,
    description: "Generates structured notes on educational topics",
    params: &[
        required("topic", ParamRule::Text),
        required("subject", ParamRule::Text),
        required("note_taking_style", ParamRule::OneOf { values: NOTE_STYLES }),
        optional("include_examples", ParamRule::Flag),
        optional("include_analogies", ParamRule::Flag),
    ],
};

static FLASHCARD_GENERATOR: ToolSchema = ToolSchema {
    tool: ToolKind::FlashcardGenerator,
    description: "Creates flashcards for memorization and review",
    params: &[
        required("topic", ParamRule::Text),
        required(
            "count",
            ParamRule::IntRange {
                min: MIN_FLASHCARDS,
                max: MAX_FLASHCARDS,
            },
        ),
        required("difficulty", ParamRule::OneOf { values: DIFFICULTIES }),
        required("subject", ParamRule::Text),
        optional("include_examples", ParamRule::Flag),
    ],
};

static CONCEPT_EXPLAINER: ToolSchema = ToolSchema {
    tool: ToolKind::ConceptExplainer,
    description: "Provides detailed explanations of educational concepts",
    params: &[
        required("concept_to_explain", ParamRule::Text),
        required("current_topic", ParamRule::Text),
        required("desired_depth", ParamRule::OneOf { values: DEPTHS }),
    ],
};

/// Schema for a known tool.
pub fn schema_for(tool: ToolKind) -> &'static ToolSchema {
    match tool {
        ToolKind::NoteMaker => &NOTE_MAKER,
        ToolKind::FlashcardGenerator => &FLASHCARD_GENERATOR,
        ToolKind::ConceptExplainer => &CONCEPT_EXPLAINER,
    }
}

/// Schema lookup by raw name; `None` for tools outside the registry.
pub fn lookup(tool_name: &str) -> Option<&'static ToolSchema> {
    ToolKind::from_name(tool_name).map(schema_for)
}

/// Public listing of a tool and its parameters.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub required_parameters: Vec<&'static str>,
    pub optional_parameters: Vec<&'static str>,
}

/// Every registered tool, in registry order.
pub fn catalog() -> Vec<CatalogEntry> {
    ToolKind::ALL
        .into_iter()
        .map(schema_for)
        .map(|schema| CatalogEntry {
            name: schema.tool.as_str(),
            description: schema.description,
            required_parameters: schema.required().map(|p| p.name).collect(),
            optional_parameters: schema.optional().map(|p| p.name).collect(),
        })
        .collect()
}
