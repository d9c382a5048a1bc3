use dioxus::prelude::*;
use quiz_core::model::{OptionId, PersistState};
use services::{ControllerStatus, ProgressIndicator};

use crate::actions;
use crate::context::AppContext;
use crate::store::QuizStore;
use crate::vm::{ExamVm, OptionVm, ProblemCardVm, badge_style};

#[component]
pub fn ExamView() -> Element {
    let ctx = use_context::<AppContext>();
    let store = use_context::<QuizStore>();

    let choose_ctx = ctx.clone();
    let on_choose = use_callback(move |(index, option): (usize, OptionId)| {
        actions::choose(store, &choose_ctx, index, option);
    });

    let (status, vm, failure) = {
        let controller = store.controller.read();
        (
            controller.status(),
            controller.session().map(ExamVm::from_session),
            controller.failure().map(str::to_string),
        )
    };

    match (status, vm) {
        (ControllerStatus::Idle, _) => rsx! {
            div { class: "page exam-idle",
                p { "请选择测试后点击「开始测试」。" }
            }
        },
        (ControllerStatus::Loading, _) => rsx! {
            div { class: "page exam-loading",
                span { class: "spinner-border", role: "status" }
                p { "正在加载题目…" }
            }
        },
        (ControllerStatus::Failed, _) | (_, None) => rsx! {
            div { class: "page",
                div { class: "alert alert-danger", role: "alert",
                    "加载测试失败：{failure.unwrap_or_default()}"
                }
            }
        },
        (_, Some(vm)) => {
            let retry_history = ctx.history();
            let save_failed = vm.persistence == PersistState::Failed;
            let toggle_label = if vm.wrong_only { "显示全部" } else { "只看错题" };
            rsx! {
                div { id: "mainpage", class: "page",
                    h4 { "{vm.test_name}" }
                    ExamBoard { vm: vm.clone(), on_choose }
                    if vm.in_summary {
                        div { class: "summary-actions",
                            button {
                                id: "wa-only-toggle",
                                class: "btn btn-outline-danger",
                                onclick: move |_| store.toggle_wrong_only(),
                                "{toggle_label}"
                            }
                            if save_failed {
                                button {
                                    id: "retry-save",
                                    class: "btn btn-outline-secondary",
                                    onclick: move |_| actions::retry_save(store, retry_history.clone()),
                                    "重新保存"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Progress bar and visible problem cards. Without `on_choose` the inputs are inert.
#[component]
pub fn ExamBoard(vm: ExamVm, on_choose: Option<EventHandler<(usize, OptionId)>>) -> Element {
    rsx! {
        div { id: "test-container",
            ProgressBar { indicator: vm.progress.clone() }
            for card in vm.visible_cards().cloned() {
                ProblemCardView { key: "{card.index}", card, on_choose }
            }
        }
    }
}

#[component]
fn ProgressBar(indicator: ProgressIndicator) -> Element {
    rsx! {
        div { class: "progress",
            div {
                id: "test-progressbar",
                class: indicator.style.css_class(),
                role: "progressbar",
                style: "width: {indicator.width_percent}%",
                "aria-valuenow": "{indicator.value_now}",
                "aria-valuemin": "0",
                "aria-valuemax": "{indicator.value_max}",
                "{indicator.label}"
            }
        }
    }
}

#[component]
fn ProblemCardView(
    card: ProblemCardVm,
    on_choose: Option<EventHandler<(usize, OptionId)>>,
) -> Element {
    let index = card.index;
    let explain_class = if card.explain_visible {
        "card-footer explain"
    } else {
        "card-footer explain d-none"
    };
    let marker = card.marker.map(|marker| {
        let class = if marker == "AC" { "marker text-success" } else { "marker text-danger" };
        (marker, class)
    });
    rsx! {
        div { id: "test-card-{index}", class: "card test-card",
            div { class: "card-header",
                span { class: "problem-number", "第 {index + 1} 题" }
                if let Some((marker, class)) = marker {
                    span {
                        class,
                        "aria-label": marker,
                        "{marker}"
                    }
                }
            }
            div { class: "card-body",
                div { class: "problem-head", dangerous_inner_html: "{card.head_html}" }
                for option in card.options.iter().cloned() {
                    OptionRow {
                        key: "{option.id}",
                        index,
                        option,
                        disabled: card.disabled,
                        on_choose,
                    }
                }
            }
            div { id: "explain-{index}", class: explain_class, dangerous_inner_html: "{card.explain_html}" }
        }
    }
}

#[component]
fn OptionRow(
    index: usize,
    option: OptionVm,
    disabled: bool,
    on_choose: Option<EventHandler<(usize, OptionId)>>,
) -> Element {
    let input_id = format!("option-{index}-{}", option.id);
    let choice = option.id;
    let badge = option.badge.map(badge_style);
    rsx! {
        div { class: "form-check",
            input {
                id: "{input_id}",
                class: "form-check-input",
                r#type: "radio",
                name: "problem-{index}",
                value: "{choice}",
                checked: option.checked,
                disabled,
                onchange: move |_| {
                    if let Some(handler) = on_choose {
                        handler.call((index, choice));
                    }
                },
            }
            label {
                class: "form-check-label",
                r#for: "{input_id}",
                dangerous_inner_html: "{option.html}",
            }
            if let Some((class, glyph)) = badge {
                span { class, "{glyph}" }
            }
        }
    }
}
