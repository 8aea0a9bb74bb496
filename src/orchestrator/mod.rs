//! The orchestration state machine and its session-aware front door.

mod controller;
mod state;
mod tutor;

pub use controller::Orchestrator;
pub use state::{step, OrchestrationState, Stage};
pub use tutor::TutorSession;
