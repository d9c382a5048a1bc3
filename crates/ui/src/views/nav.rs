use dioxus::prelude::*;
use dioxus_router::use_navigator;
use quiz_core::model::TestName;

use crate::actions;
use crate::context::AppContext;
use crate::routes::Route;
use crate::store::QuizStore;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[derive(Clone, Debug, PartialEq)]
struct NameChoice {
    value: String,
    selected: bool,
}

/// Test type and name pickers plus the begin and history buttons.
#[component]
pub fn NavBar() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<QuizStore>();
    let navigator = use_navigator();
    let catalog = ctx.catalog();

    let selection = store.selection.read().clone();
    let types: Vec<(String, String, bool)> = catalog
        .test_types()
        .iter()
        .map(|t| {
            let value = t.id.value().to_string();
            let selected = selection.test_type == Some(t.id);
            (value, t.label.clone(), selected)
        })
        .collect();
    let type_unset = selection.test_type.is_none();
    let name_unset = selection.test_name.is_none();
    let ready = selection.is_complete();

    let names_catalog = ctx.catalog();
    let names = use_resource(move || {
        let catalog = names_catalog.clone();
        let test_type = store.selection.read().test_type;
        async move {
            let Some(test_type) = test_type else {
                return Ok(Vec::new());
            };
            catalog
                .list_test_names(test_type)
                .await
                .map_err(ViewError::from)
        }
    });
    let name_choices: Vec<NameChoice> = match view_state_from_resource(names) {
        ViewState::Ready(list) => list
            .iter()
            .map(|name: &TestName| NameChoice {
                value: name.as_str().to_string(),
                selected: selection.test_name.as_ref() == Some(name),
            })
            .collect(),
        _ => Vec::new(),
    };

    let begin_ctx = ctx.clone();
    let begin = move |_| {
        let enter_exam = move || {
            navigator.push(Route::Exam {});
        };
        spawn_forever(actions::restart_exam(store, begin_ctx.clone(), enter_exam));
    };
    let show_history = move |_| {
        let Ok(valid) = store.selection.read().validate() else {
            return;
        };
        navigator.push(Route::HistoryList {
            typ: valid.test_type().value(),
            name: valid.test_name().as_str().to_string(),
        });
    };

    rsx! {
        nav { class: "navbar",
            span { class: "navbar-brand", "聚类测试" }
            select {
                id: "test-type",
                class: "form-select",
                onchange: move |evt| store.select_type(&evt.value()),
                option { value: "", selected: type_unset, "选择测试类型" }
                for (value, label, selected) in types {
                    option { key: "{value}", value: "{value}", selected, "{label}" }
                }
            }
            select {
                id: "test-name",
                class: "form-select",
                disabled: type_unset,
                onchange: move |evt| store.select_name(&evt.value()),
                option { value: TestName::UNSELECTED, selected: name_unset, "{TestName::UNSELECTED}" }
                for choice in name_choices {
                    option {
                        key: "{choice.value}",
                        value: "{choice.value}",
                        selected: choice.selected,
                        "{choice.value}"
                    }
                }
            }
            button {
                id: "begin-test",
                class: "btn btn-primary",
                disabled: !ready,
                onclick: begin,
                "开始测试"
            }
            button {
                id: "show-history",
                class: "btn btn-outline-secondary",
                disabled: !ready,
                onclick: show_history,
                "历史记录"
            }
        }
    }
}
