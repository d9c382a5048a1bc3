//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{OptionId, ProblemSetError, SelectionError, SessionStateError};
use storage::repository::StorageError;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid selection: {0}")]
    InvalidSelection(#[from] SelectionError),
    #[error("problem {index} has already been answered")]
    DuplicateSubmission { index: usize },
    #[error("no session in progress")]
    NotInProgress,
    #[error("problem {actual} submitted while problem {expected} is current")]
    ProblemOutOfOrder { expected: usize, actual: usize },
    #[error("problem {index} has no option {option}")]
    UnknownOption { index: usize, option: OptionId },
    #[error("problem set could not be rendered: {0}")]
    Render(#[from] ProblemSetError),
    #[error(transparent)]
    State(SessionStateError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Errors the UI drops silently instead of surfacing.
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::DuplicateSubmission { .. })
    }
}

impl From<SessionStateError> for SessionError {
    fn from(err: SessionStateError) -> Self {
        match err {
            SessionStateError::AlreadyAnswered { index } => Self::DuplicateSubmission { index },
            SessionStateError::Completed => Self::NotInProgress,
            SessionStateError::OutOfOrder { expected, actual } => {
                Self::ProblemOutOfOrder { expected, actual }
            }
            SessionStateError::UnknownOption { index, option } => {
                Self::UnknownOption { index, option }
            }
            other => Self::State(other),
        }
    }
}

/// Errors emitted by `HistoryService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("server responded with status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server rejected the snapshot: {0}")]
    Rejected(String),
}

impl PersistenceError {
    /// HTTP status to show the user. `0` when no response arrived.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Status { status, .. } => *status,
            Self::Transport(_) => 0,
            Self::Rejected(_) => 200,
        }
    }

    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Status { detail, .. } | Self::Transport(detail) | Self::Rejected(detail) => {
                detail
            }
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Http { status, detail } => Self::Status { status, detail },
            StorageError::NotFound => Self::Status {
                status: 404,
                detail: "not found".to_string(),
            },
            StorageError::Rejected(detail) => Self::Rejected(detail),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("unknown test type {0}")]
    UnknownType(u64),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
