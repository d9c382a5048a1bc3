use dioxus::prelude::*;

use crate::context::AppContext;

#[component]
pub fn HomeView() -> Element {
    let ctx = use_context::<AppContext>();
    let count = ctx.problem_count();

    rsx! {
        div { class: "page welcome",
            h2 { "聚类测试" }
            p { "在上方选择测试类型与测试名称，然后点击「开始测试」。" }
            p { class: "text-muted", "每次测试 {count} 题，按顺序作答，完成后自动保存结果。" }
        }
    }
}
