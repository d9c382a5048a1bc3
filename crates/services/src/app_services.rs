use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog_service::CatalogService;
use crate::history_service::HistoryService;
use crate::notify::ToastCenter;
use crate::sessions::ExamService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct QuizServices {
    clock: Clock,
    problem_count: usize,
    exams: Arc<ExamService>,
    history: Arc<HistoryService>,
    catalog: Arc<CatalogService>,
}

impl QuizServices {
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, problem_count: usize) -> Self {
        Self {
            clock,
            problem_count,
            exams: Arc::new(ExamService::new(Arc::clone(&storage.problems))),
            history: Arc::new(HistoryService::new(Arc::clone(&storage.history))),
            catalog: Arc::new(CatalogService::new(Arc::clone(&storage.catalog))),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Problems requested per attempt.
    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.problem_count
    }

    #[must_use]
    pub fn toast_center(&self) -> ToastCenter {
        ToastCenter::new(self.clock)
    }

    #[must_use]
    pub fn exams(&self) -> Arc<ExamService> {
        Arc::clone(&self.exams)
    }

    #[must_use]
    pub fn history(&self) -> Arc<HistoryService> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }
}
