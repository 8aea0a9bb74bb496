pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod extraction;
pub mod init;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod tools;

pub use error::StudyflowError;
