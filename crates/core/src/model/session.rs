use std::fmt;

use thiserror::Error;

use crate::model::ids::{OptionId, SessionToken};
use crate::model::outcome::{Badge, ProblemOutcome, Verdict};
use crate::model::problem::{Problem, ProblemSet};
use crate::model::selection::ValidSelection;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("problem {index} has already been answered")]
    AlreadyAnswered { index: usize },

    #[error("problem {actual} answered while problem {expected} is current")]
    OutOfOrder { expected: usize, actual: usize },

    #[error("session has no problem {index}")]
    UnknownProblem { index: usize },

    #[error("problem {index} has no option {option}")]
    UnknownOption { index: usize, option: OptionId },

    #[error("session already completed")]
    Completed,

    #[error("cannot advance to {requested}: {answered} problems answered")]
    InvalidAdvance { requested: usize, answered: usize },

    #[error("session has not reached its summary")]
    NotInSummary,
}

//
// ─── PHASE / PROGRESS ──────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Problem at the given index is the one on screen.
    InProgress(usize),
    Summary,
}

/// Where the snapshot submission for this attempt stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistState {
    #[default]
    NotRequested,
    Pending,
    Saved,
    Failed,
}

/// Aggregate view data, always recomputed from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub correct: usize,
    pub total: usize,
    pub position: usize,
}

/// Final score of a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}分", self.correct, self.total)
    }
}

/// Handed out once per summary: which attempt needs its snapshot saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRequest {
    pub token: SessionToken,
    pub selection: ValidSelection,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a named test, from its first problem to the summary.
///
/// Steps through the problems strictly in order. `outcomes.len()` always
/// equals the current index once `advance` has followed `record`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    token: SessionToken,
    selection: ValidSelection,
    problems: ProblemSet,
    current: usize,
    outcomes: Vec<ProblemOutcome>,
    wrong_only: bool,
    persistence: PersistState,
}

impl Session {
    #[must_use]
    pub fn new(token: SessionToken, selection: ValidSelection, problems: ProblemSet) -> Self {
        Self {
            token,
            selection,
            problems,
            current: 0,
            outcomes: Vec::new(),
            wrong_only: false,
            persistence: PersistState::NotRequested,
        }
    }

    #[must_use]
    pub fn token(&self) -> SessionToken {
        self.token
    }

    #[must_use]
    pub fn selection(&self) -> &ValidSelection {
        &self.selection
    }

    #[must_use]
    pub fn problems(&self) -> &ProblemSet {
        &self.problems
    }

    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ProblemOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn outcome(&self, index: usize) -> Option<&ProblemOutcome> {
        self.outcomes.get(index)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.current >= self.problems.len() {
            SessionPhase::Summary
        } else {
            SessionPhase::InProgress(self.current)
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Summary
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict() == Verdict::Correct)
            .count()
    }

    #[must_use]
    pub fn progress(&self) -> ProgressState {
        ProgressState {
            correct: self.correct_count(),
            total: self.problems.len(),
            position: self.current,
        }
    }

    /// Score of the attempt. `None` until every problem has been answered.
    #[must_use]
    pub fn score(&self) -> Option<Score> {
        self.is_complete().then(|| Score {
            correct: self.correct_count(),
            total: self.problems.len(),
        })
    }

    /// Record the answer for `index`. The caller advances afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::AlreadyAnswered` for a repeat submission,
    /// `Completed`, `UnknownProblem`, `OutOfOrder` or `UnknownOption` when the
    /// answer cannot apply. No state changes on error.
    pub fn record(
        &mut self,
        index: usize,
        selected: OptionId,
    ) -> Result<&ProblemOutcome, SessionStateError> {
        if self.outcomes.get(index).is_some() {
            return Err(SessionStateError::AlreadyAnswered { index });
        }
        if self.is_complete() {
            return Err(SessionStateError::Completed);
        }
        let problem = self
            .problems
            .get(index)
            .ok_or(SessionStateError::UnknownProblem { index })?;
        if index != self.current || self.outcomes.len() != self.current {
            return Err(SessionStateError::OutOfOrder {
                expected: self.current,
                actual: index,
            });
        }
        if !problem.has_option(selected) {
            return Err(SessionStateError::UnknownOption {
                index,
                option: selected,
            });
        }

        self.outcomes.push(ProblemOutcome::evaluate(problem, selected));
        self.outcomes.last().ok_or(SessionStateError::Completed)
    }

    /// Move to `to_index`, or to the summary once it passes the last problem.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::InvalidAdvance` unless `to_index` equals the
    /// number of recorded outcomes.
    pub fn advance(&mut self, to_index: usize) -> Result<SessionPhase, SessionStateError> {
        if to_index != self.outcomes.len() || to_index < self.current {
            return Err(SessionStateError::InvalidAdvance {
                requested: to_index,
                answered: self.outcomes.len(),
            });
        }
        self.current = to_index.min(self.problems.len());
        Ok(self.phase())
    }

    #[must_use]
    pub fn wrong_only(&self) -> bool {
        self.wrong_only
    }

    /// Flip the summary filter that hides correctly answered problems.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NotInSummary` while problems remain.
    pub fn toggle_wrong_only(&mut self) -> Result<bool, SessionStateError> {
        if !self.is_complete() {
            return Err(SessionStateError::NotInSummary);
        }
        self.wrong_only = !self.wrong_only;
        Ok(self.wrong_only)
    }

    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        match self.phase() {
            SessionPhase::InProgress(current) => index == current,
            SessionPhase::Summary => {
                index < self.problems.len()
                    && (!self.wrong_only
                        || self
                            .outcome(index)
                            .is_some_and(|o| o.verdict() == Verdict::Incorrect))
            }
        }
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        (0..self.problems.len())
            .filter(|i| self.is_visible(*i))
            .count()
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<ProblemCard<'_>> {
        let problem = self.problems.get(index)?;
        Some(ProblemCard {
            problem,
            outcome: self.outcome(index),
            visible: self.is_visible(index),
        })
    }

    pub fn cards(&self) -> impl Iterator<Item = ProblemCard<'_>> {
        (0..self.problems.len()).filter_map(|i| self.card(i))
    }

    #[must_use]
    pub fn persistence(&self) -> PersistState {
        self.persistence
    }

    /// Hand out the snapshot request for this attempt. Returns `Some` exactly
    /// once, the first time it is called after the summary is reached.
    pub fn take_snapshot_request(&mut self) -> Option<SnapshotRequest> {
        if !self.is_complete() || self.persistence != PersistState::NotRequested {
            return None;
        }
        self.persistence = PersistState::Pending;
        Some(self.snapshot_request())
    }

    /// Re-issue the snapshot request after a failed save.
    pub fn retry_snapshot_request(&mut self) -> Option<SnapshotRequest> {
        if self.persistence != PersistState::Failed {
            return None;
        }
        self.persistence = PersistState::Pending;
        Some(self.snapshot_request())
    }

    pub fn mark_persisted(&mut self, saved: bool) {
        if self.persistence == PersistState::Pending {
            self.persistence = if saved {
                PersistState::Saved
            } else {
                PersistState::Failed
            };
        }
    }

    fn snapshot_request(&self) -> SnapshotRequest {
        SnapshotRequest {
            token: self.token,
            selection: self.selection.clone(),
        }
    }
}

//
// ─── CARD PROJECTION ───────────────────────────────────────────────────────────
//

/// Render-ready state of one problem, derived from the session.
#[derive(Debug, Clone, Copy)]
pub struct ProblemCard<'a> {
    problem: &'a Problem,
    outcome: Option<&'a ProblemOutcome>,
    visible: bool,
}

impl<'a> ProblemCard<'a> {
    #[must_use]
    pub fn problem(&self) -> &'a Problem {
        self.problem
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        self.outcome.map(ProblemOutcome::verdict)
    }

    #[must_use]
    pub fn badge(&self, option: OptionId) -> Option<Badge> {
        self.outcome.and_then(|o| o.badge(option))
    }

    #[must_use]
    pub fn selected(&self) -> Option<OptionId> {
        self.outcome.map(ProblemOutcome::selected)
    }

    #[must_use]
    pub fn explain_visible(&self) -> bool {
        self.verdict() == Some(Verdict::Incorrect)
    }

    /// Answers are single-shot: inputs lock once an outcome exists.
    #[must_use]
    pub fn inputs_disabled(&self) -> bool {
        self.outcome.is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
