mod controller;
mod evaluator;
mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{
    BeginOutcome, BeginTicket, ControllerStatus, DEFAULT_PROBLEM_COUNT, SessionController,
};
pub use evaluator::{AnswerEvaluator, SubmitOutcome};
pub use progress::{ProgressIndicator, ProgressStyle, ProgressTracker};
pub use workflow::{ExamService, RestartOutcome, SessionHost};
