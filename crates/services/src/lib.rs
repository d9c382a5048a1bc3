#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod confirm;
pub mod error;
pub mod history_service;
pub mod notify;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use catalog_service::CatalogService;
pub use confirm::{ConfirmDecision, ConfirmPrompt, ConfirmRequest};
pub use error::{CatalogError, PersistenceError, SessionError};
pub use history_service::HistoryService;
pub use notify::{SHORT_TOAST_TTL, Toast, ToastCenter, ToastId, ToastKind, ToastMessage};

pub use sessions::{
    AnswerEvaluator, BeginOutcome, BeginTicket, ControllerStatus, DEFAULT_PROBLEM_COUNT,
    ExamService, ProgressIndicator, ProgressStyle, ProgressTracker, RestartOutcome,
    SessionController, SessionHost, SubmitOutcome,
};
