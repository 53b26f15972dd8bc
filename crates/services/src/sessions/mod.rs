mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::{SessionPhase, SessionProgress};
pub use service::{AssessmentSession, SubmitTrigger, TickOutcome};
pub use workflow::{SessionLoopService, Submission};
