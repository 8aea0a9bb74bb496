mod clock;
mod patterns;
mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use patterns::{LearningFrequency, LearningPatterns};
pub use tracker::{PersonalizationContext, Session, SessionTracker, UsageRecord};
