//! Tool registry, parameter validation, and adaptation.

pub mod adapter;
pub mod schema;
pub mod validator;

pub use adapter::adapt;
pub use schema::{catalog, lookup, schema_for, CatalogEntry, ParamRule, ParamSpec, ToolSchema};
pub use validator::{validate, validate_all};

/// Parameter key listing the adaptation rules applied to a tool.
///
/// Bookkeeping only: the validator ignores it and backends never see it.
pub const ADAPTATIONS_KEY: &str = "adaptations";

/// Emotional markers recognized in a profile's emotional-state summary.
pub mod markers {
    pub const ANXIOUS: &str = "anxious";
    pub const FOCUSED: &str = "focused";
    pub const CONFUSED: &str = "confused";

    pub const ALL: [&str; 3] = [FOCUSED, ANXIOUS, CONFUSED];
}
