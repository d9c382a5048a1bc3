//! Async flows triggered from the views. Each one applies its results back
//! through the synchronous controller so stale answers are dropped by token.

use std::sync::Arc;

use dioxus::prelude::*;
use quiz_core::model::{OptionId, SnapshotRequest};
use services::{
    HistoryService, RestartOutcome, SessionController, SessionError, SessionHost, ToastKind,
    ToastMessage,
};

use crate::context::AppContext;
use crate::store::{ModalPrompt, QuizStore};
use crate::vm::{ExamVm, render_snapshot};

const LOAD_FAILED_TITLE: &str = "加载测试失败";

/// Drives the store's controller through `ExamService`.
struct StoreHost<F> {
    store: QuizStore,
    on_loading: F,
}

impl<F: Fn()> SessionHost for StoreHost<F> {
    fn with_controller<R>(&self, f: impl FnOnce(&mut SessionController) -> R) -> R {
        let mut controller = self.store.controller;
        let mut guard = controller.write();
        f(&mut *guard)
    }

    fn loading(&self) {
        let mut snapshot = self.store.snapshot;
        snapshot.set(None);
        (self.on_loading)();
    }
}

/// Ask for confirmation, then begin a new attempt for the current selection.
/// `on_loading` runs only once the new attempt was accepted.
pub async fn restart_exam(store: QuizStore, ctx: AppContext, on_loading: impl Fn() + 'static) {
    let selection = store.selection.read().clone();
    let prompt = ModalPrompt::new(store);
    let host = StoreHost { store, on_loading };
    let restarted = ctx
        .exams()
        .restart(&prompt, &host, &selection, ctx.problem_count())
        .await;
    match restarted {
        Ok(RestartOutcome::Declined) => log::debug!("restart declined"),
        Ok(RestartOutcome::Begun(_)) => {}
        Err(err) => store.show_toast(error_toast(&err)),
    }
}

/// Submit one option. The final answer hands the summary snapshot to the history endpoint.
pub fn choose(store: QuizStore, ctx: &AppContext, index: usize, option: OptionId) {
    let mut controller = store.controller;
    let submitted = controller.write().submit(index, option);
    match submitted {
        Ok(outcome) if outcome.completed() => persist_summary(store, ctx.history()),
        Ok(_) => {}
        Err(err) if err.is_ignorable() => {}
        Err(err) => log::warn!("answer for problem {index} rejected: {err}"),
    }
}

/// Re-submit the last snapshot after a failed save.
pub fn retry_save(store: QuizStore, history: Arc<HistoryService>) {
    let mut controller = store.controller;
    let Some(html) = store.snapshot.read().clone() else {
        return;
    };
    let request = controller.write().retry_snapshot_request();
    if let Some(request) = request {
        spawn_save(store, history, request, html);
    }
}

fn persist_summary(store: QuizStore, history: Arc<HistoryService>) {
    let mut controller = store.controller;
    let prepared = {
        let mut guard = controller.write();
        let request = guard.take_snapshot_request();
        request.zip(guard.session().map(ExamVm::from_session))
    };
    let Some((request, vm)) = prepared else {
        return;
    };
    let html = render_snapshot(&vm);
    let mut snapshot = store.snapshot;
    snapshot.set(Some(html.clone()));
    spawn_save(store, history, request, html);
}

fn spawn_save(
    store: QuizStore,
    history: Arc<HistoryService>,
    request: SnapshotRequest,
    html: String,
) {
    spawn_forever(async move {
        let result = history.save(&request, &html).await;
        let mut controller = store.controller;
        if !controller
            .write()
            .record_save_result(request.token, result.is_ok())
        {
            log::debug!("save result for replaced session {}", request.token);
        }
        store.show_toast(HistoryService::notification_for(&result));
    });
}

fn error_toast(err: &SessionError) -> ToastMessage {
    ToastMessage {
        title: LOAD_FAILED_TITLE.to_string(),
        body: err.to_string(),
        kind: ToastKind::Persistent,
    }
}
