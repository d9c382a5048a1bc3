use async_trait::async_trait;
use dioxus::prelude::*;
use quiz_core::model::{TestName, TestSelection, TestTypeId};
use services::{
    Clock, ConfirmDecision, ConfirmPrompt, ConfirmRequest, SHORT_TOAST_TTL, SessionController,
    ToastCenter, ToastKind, ToastMessage,
};
use tokio::sync::oneshot;

/// A yes/no prompt waiting for the user.
pub struct PendingConfirm {
    pub request: ConfirmRequest,
    reply: Option<oneshot::Sender<ConfirmDecision>>,
}

impl PendingConfirm {
    fn answer(&mut self, decision: ConfirmDecision) {
        if let Some(reply) = self.reply.take() {
            let _ = reply.send(decision);
        }
    }
}

/// Initial values for the store signals.
#[derive(Clone)]
pub struct QuizSeed {
    pub controller: SessionController,
    pub selection: TestSelection,
    pub toasts: ToastCenter,
}

impl QuizSeed {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            controller: SessionController::new(),
            selection: TestSelection::default(),
            toasts: ToastCenter::new(clock),
        }
    }
}

/// Page-wide quiz state shared by the layout's children.
#[derive(Clone, Copy)]
pub struct QuizStore {
    pub controller: Signal<SessionController>,
    pub selection: Signal<TestSelection>,
    pub toasts: Signal<ToastCenter>,
    pub confirm: Signal<Option<PendingConfirm>>,
    /// Last snapshot handed to the history endpoint, kept for a manual retry.
    pub snapshot: Signal<Option<String>>,
}

/// Create the store signals and provide them as context.
pub fn use_quiz_store_provider(seed: impl FnOnce() -> QuizSeed) -> QuizStore {
    use_context_provider(move || {
        let QuizSeed {
            controller,
            selection,
            toasts,
        } = seed();
        QuizStore {
            controller: Signal::new(controller),
            selection: Signal::new(selection),
            toasts: Signal::new(toasts),
            confirm: Signal::new(None),
            snapshot: Signal::new(None),
        }
    })
}

impl QuizStore {
    pub fn select_type(self, raw: &str) {
        let mut selection = self.selection;
        let test_type = raw.trim().parse::<u64>().ok().and_then(TestTypeId::new);
        selection.write().set_type(test_type);
    }

    pub fn select_name(self, raw: &str) {
        let mut selection = self.selection;
        selection.write().set_name(TestName::new(raw));
    }

    pub fn toggle_wrong_only(self) {
        let mut controller = self.controller;
        if let Err(err) = controller.write().toggle_wrong_only() {
            log::debug!("wrong-only toggle ignored: {err}");
        }
    }

    /// Show a toast. Short toasts hide after `SHORT_TOAST_TTL` unless replaced first.
    pub fn show_toast(self, message: ToastMessage) {
        let mut toasts = self.toasts;
        let kind = message.kind;
        let id = toasts.write().show(message);
        if kind == ToastKind::Short {
            spawn(async move {
                tokio::time::sleep(SHORT_TOAST_TTL).await;
                toasts.write().expire(id);
            });
        }
    }

    pub fn dismiss_toast(self) {
        let mut toasts = self.toasts;
        toasts.write().dismiss();
    }

    pub fn answer_confirm(self, decision: ConfirmDecision) {
        let mut slot = self.confirm;
        let pending = slot.write().take();
        if let Some(mut pending) = pending {
            pending.answer(decision);
        }
    }
}

/// `ConfirmPrompt` backed by the layout's modal.
#[derive(Clone, Copy)]
pub struct ModalPrompt {
    slot: Signal<Option<PendingConfirm>>,
}

impl ModalPrompt {
    #[must_use]
    pub fn new(store: QuizStore) -> Self {
        Self {
            slot: store.confirm,
        }
    }
}

#[async_trait(?Send)]
impl ConfirmPrompt for ModalPrompt {
    async fn confirm(&self, request: &ConfirmRequest) -> ConfirmDecision {
        let (reply, answer) = oneshot::channel();
        let mut slot = self.slot;
        let previous = slot.write().replace(PendingConfirm {
            request: request.clone(),
            reply: Some(reply),
        });
        // Only one prompt is shown at a time.
        if let Some(mut previous) = previous {
            previous.answer(ConfirmDecision::No);
        }
        answer.await.unwrap_or(ConfirmDecision::No)
    }
}
