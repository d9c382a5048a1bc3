use quiz_core::model::{
    OptionId, ProblemSet, SelectionError, Session, SessionPhase, SessionToken, SnapshotRequest,
    TestSelection, ValidSelection,
};

use super::evaluator::{AnswerEvaluator, SubmitOutcome};
use super::progress::{ProgressIndicator, ProgressTracker};
use crate::error::SessionError;

/// Default number of problems requested per attempt.
pub const DEFAULT_PROBLEM_COUNT: usize = 10;

/// Issued by `prepare_begin`; identifies the fetch that belongs to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeginTicket {
    pub token: SessionToken,
    pub selection: ValidSelection,
    pub count: usize,
}

/// Whether a fetched problem set was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    Started,
    /// A newer begin superseded this response.
    Stale,
}

/// Coarse lifecycle state, for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    Idle,
    Loading,
    InProgress(usize),
    Summary,
    Failed,
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Idle,
    Loading {
        token: SessionToken,
        selection: ValidSelection,
    },
    Active(Session),
    Failed {
        token: SessionToken,
        message: String,
    },
}

/// Lifecycle of a single test attempt: `Idle -> Loading -> InProgress -> Summary`.
///
/// All mutations are synchronous. Network work happens between
/// `prepare_begin` and `complete_begin`, and the token handed out by the former
/// decides whether the latter applies.
#[derive(Debug, Clone, Default)]
pub struct SessionController {
    state: State,
}

impl SessionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        match &self.state {
            State::Idle => ControllerStatus::Idle,
            State::Loading { .. } => ControllerStatus::Loading,
            State::Active(session) => match session.phase() {
                SessionPhase::InProgress(i) => ControllerStatus::InProgress(i),
                SessionPhase::Summary => ControllerStatus::Summary,
            },
            State::Failed { .. } => ControllerStatus::Failed,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, State::Loading { .. })
    }

    /// Token of the newest begin, whatever its state.
    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        match &self.state {
            State::Idle => None,
            State::Loading { token, .. } | State::Failed { token, .. } => Some(*token),
            State::Active(session) => Some(session.token()),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            State::Active(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            State::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Validate the selection and enter `Loading` under a fresh token.
    ///
    /// Any session in progress is discarded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidSelection` for an unset type or name, or a
    /// zero problem count. The state is unchanged on error.
    pub fn prepare_begin(
        &mut self,
        selection: &TestSelection,
        count: usize,
    ) -> Result<BeginTicket, SessionError> {
        let selection = selection.validate()?;
        if count == 0 {
            return Err(SelectionError::ZeroProblems.into());
        }
        let token = SessionToken::mint();
        log::info!(
            "begin {} test {:?} with {count} problems (session {token})",
            selection.test_type(),
            selection.test_name().as_str()
        );
        self.state = State::Loading {
            token,
            selection: selection.clone(),
        };
        Ok(BeginTicket {
            token,
            selection,
            count,
        })
    }

    /// Install the fetched problem set if `token` is still the current one.
    ///
    /// A failed fetch moves the controller to `Failed`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when it applied to the current token.
    pub fn complete_begin(
        &mut self,
        token: SessionToken,
        fetched: Result<ProblemSet, SessionError>,
    ) -> Result<BeginOutcome, SessionError> {
        let selection = match &self.state {
            State::Loading {
                token: current,
                selection,
            } if *current == token => selection.clone(),
            _ => {
                log::debug!("discarding problem set for stale session {token}");
                return Ok(BeginOutcome::Stale);
            }
        };
        match fetched {
            Ok(problems) => {
                self.state = State::Active(Session::new(token, selection, problems));
                Ok(BeginOutcome::Started)
            }
            Err(err) => {
                log::warn!("session {token} failed to load: {err}");
                self.state = State::Failed {
                    token,
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Answer problem `index` of the session in progress.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` without an active session, or the
    /// `AnswerEvaluator::submit` errors.
    pub fn submit(&mut self, index: usize, option: OptionId) -> Result<SubmitOutcome, SessionError> {
        let State::Active(session) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        AnswerEvaluator::submit(session, index, option).inspect_err(|err| {
            if err.is_ignorable() {
                log::debug!("ignored submission: {err}");
            }
        })
    }

    /// Move to problem `to_index`, or to the summary past the last problem.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` without an active session and
    /// `SessionError::State` if `to_index` skips unanswered problems.
    pub fn advance(&mut self, to_index: usize) -> Result<SessionPhase, SessionError> {
        let State::Active(session) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        Ok(session.advance(to_index)?)
    }

    #[must_use]
    pub fn progress(&self) -> Option<ProgressIndicator> {
        self.session().map(ProgressTracker::for_session)
    }

    /// # Errors
    ///
    /// Returns `SessionError::State` outside the summary.
    pub fn toggle_wrong_only(&mut self) -> Result<bool, SessionError> {
        let State::Active(session) = &mut self.state else {
            return Err(SessionError::NotInProgress);
        };
        Ok(session.toggle_wrong_only()?)
    }

    /// Snapshot to persist, handed out once per summary.
    pub fn take_snapshot_request(&mut self) -> Option<SnapshotRequest> {
        match &mut self.state {
            State::Active(session) => session.take_snapshot_request(),
            _ => None,
        }
    }

    /// Snapshot to persist again after a failed save.
    pub fn retry_snapshot_request(&mut self) -> Option<SnapshotRequest> {
        match &mut self.state {
            State::Active(session) => session.retry_snapshot_request(),
            _ => None,
        }
    }

    /// Apply a save result. Returns `false` if the session has since been replaced.
    pub fn record_save_result(&mut self, token: SessionToken, saved: bool) -> bool {
        match &mut self.state {
            State::Active(session) if session.token() == token => {
                session.mark_persisted(saved);
                true
            }
            _ => false,
        }
    }
}
