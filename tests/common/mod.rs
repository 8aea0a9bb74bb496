pub mod builders;
pub mod harness;

// Re-export commonly used test utilities
pub use builders::ProfileBuilder;
pub use harness::{spawn_completion_server, spawn_tool_backend, ScriptedClient};
