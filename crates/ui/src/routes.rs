use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::context::AppContext;
use crate::store::{QuizSeed, use_quiz_store_provider};
use crate::views::{
    ConfirmModal, ExamView, HistoryDetailView, HistoryListView, HomeView, NavBar, ToastHost,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HomeView)] Home {},
        #[route("/exam", ExamView)] Exam {},
        #[route("/history/:typ/:name", HistoryListView)] HistoryList { typ: u64, name: String },
        #[route("/history/:typ/:name/:tag", HistoryDetailView)]
        HistoryDetail { typ: u64, name: String, tag: String },
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    use_quiz_store_provider(|| QuizSeed::new(ctx.clock()));

    rsx! {
        div { class: "app",
            NavBar {}
            main { class: "content container",
                Outlet::<Route> {}
            }
            ToastHost {}
            ConfirmModal {}
        }
    }
}
