use dioxus::prelude::*;
use dioxus_router::Link;
use quiz_core::model::{HistoryTag, TestName, TestTypeId, ValidSelection};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::sanitize_snapshot;

fn selection_from_route(typ: u64, name: &str) -> Result<ValidSelection, ViewError> {
    let test_type = TestTypeId::new(typ).ok_or(ViewError::InvalidSelection)?;
    let test_name = TestName::new(name).ok_or(ViewError::InvalidSelection)?;
    Ok(ValidSelection::new(test_type, test_name))
}

#[component]
pub fn HistoryListView(typ: u64, name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();

    let resource = use_resource(use_reactive!(|(typ, name)| {
        let history = history.clone();
        async move {
            let selection = selection_from_route(typ, &name)?;
            let tags = history
                .list_history(&selection)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(tags.into_iter().map(|t| t.as_str().to_string()).collect::<Vec<_>>())
        }
    }));
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page history",
            h4 { "历史记录：{name}" }
            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "加载中…" }
                },
                ViewState::Ready(tags) => rsx! {
                    if tags.is_empty() {
                        p { class: "text-muted", "暂无历史记录。" }
                    } else {
                        ul { class: "list-group",
                            for tag in tags {
                                li { key: "{tag}", class: "list-group-item",
                                    Link {
                                        to: Route::HistoryDetail {
                                            typ,
                                            name: name.clone(),
                                            tag: tag.clone(),
                                        },
                                        "{tag}"
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "text-danger", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
pub fn HistoryDetailView(typ: u64, name: String, tag: String) -> Element {
    let ctx = use_context::<AppContext>();
    let history = ctx.history();

    let resource = use_resource(use_reactive!(|(typ, name, tag)| {
        let history = history.clone();
        async move {
            let selection = selection_from_route(typ, &name)?;
            let tag = HistoryTag::new(tag).ok_or(ViewError::NotFound)?;
            let html = history
                .load_history(&selection, &tag)
                .await
                .map_err(ViewError::from)?;
            Ok::<_, ViewError>(sanitize_snapshot(&html))
        }
    }));
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page history-detail",
            Link { class: "back-link", to: Route::HistoryList { typ, name: name.clone() }, "返回列表" }
            h4 { "{name} · {tag}" }
            match state {
                ViewState::Idle => rsx! {},
                ViewState::Loading => rsx! {
                    p { "加载中…" }
                },
                ViewState::Ready(html) => rsx! {
                    div { class: "history-snapshot", dangerous_inner_html: "{html}" }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "text-danger", "{err.message()}" }
                },
            }
        }
    }
}
