use std::sync::Arc;

use services::{CatalogService, Clock, ExamService, HistoryService};

pub trait UiApp: Send + Sync {
    fn clock(&self) -> Clock;
    fn problem_count(&self) -> usize;

    fn exams(&self) -> Arc<ExamService>;
    fn history(&self) -> Arc<HistoryService>;
    fn catalog(&self) -> Arc<CatalogService>;
}

#[derive(Clone)]
pub struct AppContext {
    clock: Clock,
    problem_count: usize,

    exams: Arc<ExamService>,
    history: Arc<HistoryService>,
    catalog: Arc<CatalogService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            clock: app.clock(),
            problem_count: app.problem_count(),
            exams: app.exams(),
            history: app.history(),
            catalog: app.catalog(),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.problem_count
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
