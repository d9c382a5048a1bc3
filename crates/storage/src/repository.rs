use async_trait::async_trait;
use quiz_core::Clock;
use quiz_core::model::{
    HistoryTag, OptionId, Problem, ProblemOption, ProblemSet, ProblemSetError, TestName,
    TestTypeId, ValidSelection,
};
use quiz_core::time::format_stamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("server responded with status {status}: {detail}")]
    Http { status: u16, detail: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("server rejected the request: {0}")]
    Rejected(String),
}

/// Wire shape of one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub id: i64,
    pub html: String,
}

/// Wire shape of one problem, as the problem renderer serves it.
///
/// Kept separate from the domain `Problem` so adapters can decode loosely
/// typed payloads and validation stays in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemRecord {
    pub id: i64,
    pub answer: i64,
    pub head: String,
    #[serde(default)]
    pub explain: String,
    pub opts: Vec<OptionRecord>,
}

impl ProblemRecord {
    #[must_use]
    pub fn from_problem(problem: &Problem) -> Self {
        Self {
            id: i64::try_from(problem.index()).unwrap_or(i64::MAX),
            answer: i64::from(problem.answer().value()),
            head: problem.head().to_owned(),
            explain: problem.explain().to_owned(),
            opts: problem
                .options()
                .iter()
                .map(|o| OptionRecord {
                    id: i64::from(o.id.value()),
                    html: o.html.clone(),
                })
                .collect(),
        }
    }

    /// Convert the record into a validated domain `Problem`.
    ///
    /// # Errors
    ///
    /// Returns `ProblemSetError::Malformed` for negative or oversized ids and
    /// the `Problem::new` validation errors otherwise.
    pub fn into_problem(self) -> Result<Problem, ProblemSetError> {
        let index = usize::try_from(self.id)
            .map_err(|_| ProblemSetError::Malformed(format!("problem id {}", self.id)))?;
        let answer = option_id(self.answer)?;
        let options = self
            .opts
            .into_iter()
            .map(|o| {
                Ok(ProblemOption {
                    id: option_id(o.id)?,
                    html: o.html,
                })
            })
            .collect::<Result<Vec<_>, ProblemSetError>>()?;
        Problem::new(index, self.head, self.explain, options, answer)
    }
}

fn option_id(raw: i64) -> Result<OptionId, ProblemSetError> {
    u32::try_from(raw)
        .map(OptionId::new)
        .map_err(|_| ProblemSetError::Malformed(format!("option id {raw}")))
}

/// Validate a renderer response against the requested problem count.
///
/// # Errors
///
/// Returns the first `ProblemSetError` found.
pub fn into_problem_set(
    records: Vec<ProblemRecord>,
    expected: usize,
) -> Result<ProblemSet, ProblemSetError> {
    let problems = records
        .into_iter()
        .map(ProblemRecord::into_problem)
        .collect::<Result<Vec<_>, _>>()?;
    ProblemSet::new(problems, expected)
}

/// Source of problem sets (the problem renderer).
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    /// Request `count` problems for the selected test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown test, or transport errors.
    async fn fetch_problems(
        &self,
        selection: &ValidSelection,
        count: usize,
    ) -> Result<Vec<ProblemRecord>, StorageError>;
}

/// History endpoint: stores and serves rendered session snapshots.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Store one snapshot for the selected test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Http` for non-2xx answers, `Rejected` when the
    /// server reports a failure, or transport errors.
    async fn save_history(
        &self,
        selection: &ValidSelection,
        snapshot_html: &str,
    ) -> Result<(), StorageError>;

    /// List stored snapshot tags for the selected test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on transport or decoding failures.
    async fn list_history(
        &self,
        selection: &ValidSelection,
    ) -> Result<Vec<HistoryTag>, StorageError>;

    /// Load one stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the tag is unknown.
    async fn load_history(
        &self,
        selection: &ValidSelection,
        tag: &HistoryTag,
    ) -> Result<String, StorageError>;
}

/// Names of the tests available under a test type.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on transport or decoding failures.
    async fn list_test_names(&self, test_type: TestTypeId) -> Result<Vec<TestName>, StorageError>;
}

/// Simple in-memory repository implementation for testing and offline use.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    clock: Clock,
    tests: Arc<Mutex<HashMap<ValidSelection, Vec<ProblemRecord>>>>,
    history: Arc<Mutex<HashMap<ValidSelection, Vec<(HistoryTag, String)>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Register the problem pool of one test.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_test(
        &self,
        selection: ValidSelection,
        problems: Vec<ProblemRecord>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(selection, problems);
        Ok(())
    }
}

#[async_trait]
impl ProblemRepository for InMemoryRepository {
    async fn fetch_problems(
        &self,
        selection: &ValidSelection,
        count: usize,
    ) -> Result<Vec<ProblemRecord>, StorageError> {
        let guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let pool = guard.get(selection).ok_or(StorageError::NotFound)?;
        if pool.is_empty() {
            return Ok(Vec::new());
        }
        // Cycle through the pool until `count` problems exist, renumbering as we go.
        Ok(pool
            .iter()
            .cycle()
            .take(count)
            .enumerate()
            .map(|(i, record)| ProblemRecord {
                id: i64::try_from(i).unwrap_or(i64::MAX),
                ..record.clone()
            })
            .collect())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryRepository {
    async fn save_history(
        &self,
        selection: &ValidSelection,
        snapshot_html: &str,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let entries = guard.entry(selection.clone()).or_default();
        let stamp = format_stamp(self.clock.now());
        let raw = if entries.iter().any(|(tag, _)| tag.as_str() == stamp) {
            format!("{stamp} ({})", entries.len())
        } else {
            stamp
        };
        let tag = HistoryTag::new(raw).ok_or(StorageError::Rejected("empty tag".into()))?;
        entries.push((tag, snapshot_html.to_owned()));
        Ok(())
    }

    async fn list_history(
        &self,
        selection: &ValidSelection,
    ) -> Result<Vec<HistoryTag>, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut tags: Vec<_> = guard
            .get(selection)
            .map(|entries| entries.iter().map(|(tag, _)| tag.clone()).collect())
            .unwrap_or_default();
        tags.sort();
        Ok(tags)
    }

    async fn load_history(
        &self,
        selection: &ValidSelection,
        tag: &HistoryTag,
    ) -> Result<String, StorageError> {
        let guard = self
            .history
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(selection)
            .and_then(|entries| entries.iter().find(|(t, _)| t == tag))
            .map(|(_, html)| html.clone())
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn list_test_names(&self, test_type: TestTypeId) -> Result<Vec<TestName>, StorageError> {
        let guard = self
            .tests
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut names: Vec<_> = guard
            .keys()
            .filter(|selection| selection.test_type() == test_type)
            .map(|selection| selection.test_name().clone())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Aggregates the collaborator repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub problems: Arc<dyn ProblemRepository>,
    pub history: Arc<dyn HistoryRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let problems: Arc<dyn ProblemRepository> = Arc::new(repo.clone());
        let history: Arc<dyn HistoryRepository> = Arc::new(repo.clone());
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo);
        Self {
            problems,
            history,
            catalog,
        }
    }
}
