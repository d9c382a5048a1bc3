use std::cell::RefCell;
use std::sync::Arc;

use quiz_core::model::{ProblemSet, TestSelection};
use storage::repository::{ProblemRepository, into_problem_set};

use super::controller::{BeginOutcome, BeginTicket, SessionController};
use crate::confirm::{ConfirmDecision, ConfirmPrompt, ConfirmRequest};
use crate::error::SessionError;

/// Result of a restart request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    Declined,
    Begun(BeginOutcome),
}

/// Owner of the controller an `ExamService` drives.
///
/// Each `with_controller` borrow ends before the next `.await`.
pub trait SessionHost {
    fn with_controller<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> R;

    /// Runs once a begin was accepted, before the problems are requested.
    fn loading(&self) {}
}

impl SessionHost for RefCell<SessionController> {
    fn with_controller<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> R {
        f(&mut *self.borrow_mut())
    }
}

/// Orchestrates problem fetching around the synchronous `SessionController`.
#[derive(Clone)]
pub struct ExamService {
    problems: Arc<dyn ProblemRepository>,
}

impl ExamService {
    #[must_use]
    pub fn new(problems: Arc<dyn ProblemRepository>) -> Self {
        Self { problems }
    }

    /// Fetch and validate the problem set a ticket asks for.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the renderer cannot be reached and
    /// `SessionError::Render` when its answer does not form a valid set.
    pub async fn fetch(&self, ticket: &BeginTicket) -> Result<ProblemSet, SessionError> {
        let records = self
            .problems
            .fetch_problems(&ticket.selection, ticket.count)
            .await?;
        Ok(into_problem_set(records, ticket.count)?)
    }

    /// Begin a new attempt and wait for its problems.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidSelection` before any request is made, or
    /// the fetch error once the controller has moved to `Failed`.
    pub async fn begin<H: SessionHost + ?Sized>(
        &self,
        host: &H,
        selection: &TestSelection,
        count: usize,
    ) -> Result<BeginOutcome, SessionError> {
        let ticket = host.with_controller(|c| c.prepare_begin(selection, count))?;
        host.loading();
        let fetched = self.fetch(&ticket).await;
        host.with_controller(|c| c.complete_begin(ticket.token, fetched))
    }

    /// Confirm with the user, then `begin`. Declining leaves the controller untouched.
    ///
    /// # Errors
    ///
    /// Returns the `begin` errors after a "Yes".
    pub async fn restart<H: SessionHost + ?Sized>(
        &self,
        prompt: &dyn ConfirmPrompt,
        host: &H,
        selection: &TestSelection,
        count: usize,
    ) -> Result<RestartOutcome, SessionError> {
        match prompt.confirm(&ConfirmRequest::restart()).await {
            ConfirmDecision::No => Ok(RestartOutcome::Declined),
            ConfirmDecision::Yes => self
                .begin(host, selection, count)
                .await
                .map(RestartOutcome::Begun),
        }
    }
}
