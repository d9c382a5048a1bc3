use serde::{Deserialize, Serialize};

use crate::model::ids::OptionId;
use crate::model::problem::Problem;

/// Recorded correctness of one answered problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    #[must_use]
    pub fn of(selected: OptionId, correct: OptionId) -> Self {
        if selected == correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    /// Short marker used on rendered problem cards.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Verdict::Correct => "AC",
            Verdict::Incorrect => "WA",
        }
    }
}

/// Badge shown next to an option once its problem has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// The correct option.
    Right,
    /// The option the user picked, when it was not the correct one.
    Wrong,
}

/// Result of one answered problem. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemOutcome {
    problem_index: usize,
    selected: OptionId,
    correct: OptionId,
    verdict: Verdict,
}

impl ProblemOutcome {
    #[must_use]
    pub fn evaluate(problem: &Problem, selected: OptionId) -> Self {
        let correct = problem.answer();
        Self {
            problem_index: problem.index(),
            selected,
            correct,
            verdict: Verdict::of(selected, correct),
        }
    }

    #[must_use]
    pub fn problem_index(&self) -> usize {
        self.problem_index
    }

    #[must_use]
    pub fn selected(&self) -> OptionId {
        self.selected
    }

    #[must_use]
    pub fn correct(&self) -> OptionId {
        self.correct
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Badge for `option`: the correct option always gets one, the selected
    /// option gets one when it differs.
    #[must_use]
    pub fn badge(&self, option: OptionId) -> Option<Badge> {
        if option == self.correct {
            Some(Badge::Right)
        } else if option == self.selected {
            Some(Badge::Wrong)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::problem::ProblemOption;

    fn problem() -> Problem {
        let options = (0..4)
            .map(|id| ProblemOption {
                id: OptionId::new(id),
                html: id.to_string(),
            })
            .collect();
        Problem::new(0, "head", "explain", options, OptionId::new(2)).unwrap()
    }

    #[test]
    fn correct_pick_badges_only_the_answer() {
        let outcome = ProblemOutcome::evaluate(&problem(), OptionId::new(2));
        assert_eq!(outcome.verdict(), Verdict::Correct);
        assert_eq!(outcome.badge(OptionId::new(2)), Some(Badge::Right));
        assert_eq!(outcome.badge(OptionId::new(0)), None);
    }

    #[test]
    fn wrong_pick_badges_both_options() {
        let outcome = ProblemOutcome::evaluate(&problem(), OptionId::new(0));
        assert_eq!(outcome.verdict(), Verdict::Incorrect);
        assert_eq!(outcome.badge(OptionId::new(0)), Some(Badge::Wrong));
        assert_eq!(outcome.badge(OptionId::new(2)), Some(Badge::Right));
        assert_eq!(outcome.badge(OptionId::new(1)), None);
    }
}
