use quiz_core::model::{OptionId, Session, SessionPhase, SessionStateError, Verdict};

use crate::error::SessionError;

/// What one accepted answer did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub index: usize,
    pub verdict: Verdict,
    pub phase: SessionPhase,
}

impl SubmitOutcome {
    #[must_use]
    pub fn completed(&self) -> bool {
        self.phase == SessionPhase::Summary
    }
}

/// Resolves submitted options against the problem's answer.
pub struct AnswerEvaluator;

impl AnswerEvaluator {
    /// Record `selected` for problem `index` and move the session on to the next problem.
    ///
    /// Badges, the explanation and the disabled inputs are all projections of
    /// the recorded outcome, so nothing else needs updating here.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::DuplicateSubmission` if the problem already has an
    /// outcome, `ProblemOutOfOrder`, `UnknownOption` or `NotInProgress` when the
    /// answer cannot apply. The session is unchanged on error.
    pub fn submit(
        session: &mut Session,
        index: usize,
        selected: OptionId,
    ) -> Result<SubmitOutcome, SessionError> {
        let current = session.current_index();
        let verdict = match session.record(index, selected) {
            Ok(outcome) => outcome.verdict(),
            Err(SessionStateError::UnknownProblem { index }) => {
                return Err(SessionError::ProblemOutOfOrder {
                    expected: current,
                    actual: index,
                });
            }
            Err(err) => return Err(err.into()),
        };
        let phase = session.advance(index + 1)?;
        if phase == SessionPhase::Summary {
            log::info!(
                "session {} reached its summary with {}/{} correct",
                session.token(),
                session.correct_count(),
                session.problem_count()
            );
        }
        Ok(SubmitOutcome {
            index,
            verdict,
            phase,
        })
    }
}
