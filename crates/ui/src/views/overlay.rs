use dioxus::prelude::*;
use services::ConfirmDecision;

use crate::store::QuizStore;
use crate::vm::sanitize_html;

/// The single toast slot.
#[component]
pub fn ToastHost() -> Element {
    let store = use_context::<QuizStore>();
    let toast = store.toasts.read().current().cloned();

    let Some(toast) = toast else {
        return rsx! {
            div { id: "liveToast", class: "toast hide", role: "alert" }
        };
    };
    let stamp = toast.stamp();
    let body = sanitize_html(&toast.message.body);

    rsx! {
        div { id: "liveToast", class: "toast show", role: "alert",
            div { class: "toast-header",
                strong { class: "me-auto", "{toast.message.title}" }
                small { class: "text-muted", "{stamp}" }
                button {
                    class: "btn-close",
                    "aria-label": "Close",
                    onclick: move |_| store.dismiss_toast(),
                }
            }
            div { class: "toast-body", dangerous_inner_html: "{body}" }
        }
    }
}

/// Yes/no modal answering the pending `ModalPrompt`.
#[component]
pub fn ConfirmModal() -> Element {
    let store = use_context::<QuizStore>();
    let request = store
        .confirm
        .read()
        .as_ref()
        .map(|pending| pending.request.clone());

    let Some(request) = request else {
        return rsx! {};
    };
    let body = sanitize_html(&request.body);

    rsx! {
        div { id: "yes-or-no-modal", class: "modal show", role: "dialog",
            div { class: "modal-dialog",
                div { class: "modal-content",
                    div { class: "modal-header",
                        h5 { class: "modal-title", "{request.title}" }
                    }
                    div { class: "modal-body", dangerous_inner_html: "{body}" }
                    div { class: "modal-footer",
                        button {
                            id: "confirm-no",
                            class: "btn btn-secondary",
                            onclick: move |_| store.answer_confirm(ConfirmDecision::No),
                            "取消"
                        }
                        button {
                            id: "confirm-yes",
                            class: "btn btn-primary",
                            onclick: move |_| store.answer_confirm(ConfirmDecision::Yes),
                            "确认"
                        }
                    }
                }
            }
        }
    }
}
