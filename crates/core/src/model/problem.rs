use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::OptionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a problem set handed over by the renderer cannot be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProblemSetError {
    #[error("renderer returned no problems")]
    Empty,

    #[error("expected {expected} problems, renderer returned {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("problem at position {position} carries index {index}")]
    IndexOutOfSequence { position: usize, index: usize },

    #[error("problem {index} has no options")]
    NoOptions { index: usize },

    #[error("problem {index} lists option {option} more than once")]
    DuplicateOption { index: usize, option: OptionId },

    #[error("problem {index} names answer {answer} which is not one of its options")]
    AnswerNotAnOption { index: usize, answer: OptionId },

    #[error("malformed problem data: {0}")]
    Malformed(String),
}

//
// ─── PROBLEM ───────────────────────────────────────────────────────────────────
//

/// One selectable option. `html` is renderer-provided markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemOption {
    pub id: OptionId,
    pub html: String,
}

/// One multiple-choice question with a known correct option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    index: usize,
    head: String,
    explain: String,
    options: Vec<ProblemOption>,
    answer: OptionId,
}

impl Problem {
    /// # Errors
    ///
    /// Returns `ProblemSetError::NoOptions`, `DuplicateOption` or
    /// `AnswerNotAnOption` when the option list is unusable.
    pub fn new(
        index: usize,
        head: impl Into<String>,
        explain: impl Into<String>,
        options: Vec<ProblemOption>,
        answer: OptionId,
    ) -> Result<Self, ProblemSetError> {
        if options.is_empty() {
            return Err(ProblemSetError::NoOptions { index });
        }
        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.id) {
                return Err(ProblemSetError::DuplicateOption {
                    index,
                    option: option.id,
                });
            }
        }
        if !seen.contains(&answer) {
            return Err(ProblemSetError::AnswerNotAnOption { index, answer });
        }

        Ok(Self {
            index,
            head: head.into(),
            explain: explain.into(),
            options,
            answer,
        })
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn head(&self) -> &str {
        &self.head
    }

    #[must_use]
    pub fn explain(&self) -> &str {
        &self.explain
    }

    #[must_use]
    pub fn options(&self) -> &[ProblemOption] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> OptionId {
        self.answer
    }

    #[must_use]
    pub fn has_option(&self, option: OptionId) -> bool {
        self.options.iter().any(|o| o.id == option)
    }
}

//
// ─── PROBLEM SET ───────────────────────────────────────────────────────────────
//

/// Ordered, validated problems of one attempt. Problem `i` sits at position `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemSet {
    problems: Vec<Problem>,
}

impl ProblemSet {
    /// Validate the renderer's problems against the requested count.
    ///
    /// # Errors
    ///
    /// Returns `ProblemSetError::Empty`, `CountMismatch` or
    /// `IndexOutOfSequence` when the set cannot drive a session.
    pub fn new(problems: Vec<Problem>, expected: usize) -> Result<Self, ProblemSetError> {
        if problems.is_empty() {
            return Err(ProblemSetError::Empty);
        }
        if problems.len() != expected {
            return Err(ProblemSetError::CountMismatch {
                expected,
                actual: problems.len(),
            });
        }
        if let Some((position, problem)) = problems
            .iter()
            .enumerate()
            .find(|(position, problem)| problem.index != *position)
        {
            return Err(ProblemSetError::IndexOutOfSequence {
                position,
                index: problem.index,
            });
        }
        Ok(Self { problems })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Problem> {
        self.problems.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: u32) -> Vec<ProblemOption> {
        (0..n)
            .map(|id| ProblemOption {
                id: OptionId::new(id),
                html: format!("opt {id}"),
            })
            .collect()
    }

    fn problem(index: usize) -> Problem {
        Problem::new(index, "head", "explain", options(4), OptionId::new(1)).unwrap()
    }

    #[test]
    fn answer_must_be_an_option() {
        let err = Problem::new(0, "h", "e", options(2), OptionId::new(5)).unwrap_err();
        assert_eq!(
            err,
            ProblemSetError::AnswerNotAnOption {
                index: 0,
                answer: OptionId::new(5)
            }
        );
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let mut opts = options(2);
        opts.push(ProblemOption {
            id: OptionId::new(0),
            html: "again".into(),
        });
        let err = Problem::new(3, "h", "e", opts, OptionId::new(0)).unwrap_err();
        assert!(matches!(err, ProblemSetError::DuplicateOption { index: 3, .. }));
    }

    #[test]
    fn set_requires_contiguous_indices() {
        let err = ProblemSet::new(vec![problem(0), problem(2)], 2).unwrap_err();
        assert_eq!(
            err,
            ProblemSetError::IndexOutOfSequence {
                position: 1,
                index: 2
            }
        );
    }

    #[test]
    fn set_requires_requested_count() {
        let err = ProblemSet::new(vec![problem(0)], 10).unwrap_err();
        assert_eq!(
            err,
            ProblemSetError::CountMismatch {
                expected: 10,
                actual: 1
            }
        );
        assert_eq!(ProblemSet::new(Vec::new(), 0).unwrap_err(), ProblemSetError::Empty);
    }

    #[test]
    fn valid_set_is_indexable() {
        let set = ProblemSet::new((0..3).map(problem).collect(), 3).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(2).unwrap().index(), 2);
        assert!(set.get(3).is_none());
    }
}
