//! CLI command handlers.

pub mod request;
pub mod system;
