use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::model::TestSelection;
use quiz_core::time::fixed_clock;
use services::{
    CatalogService, Clock, DEFAULT_PROBLEM_COUNT, ExamService, HistoryService, QuizServices,
    SessionController,
};
use storage::demo::{RADICALS, seeded_repository};
use storage::repository::{HistoryRepository, InMemoryRepository, Storage};

use crate::context::{AppContext, UiApp, build_app_context};
use crate::store::{QuizSeed, QuizStore, use_quiz_store_provider};
use crate::views::{
    ConfirmModal, ExamView, HistoryDetailView, HistoryListView, HomeView, NavBar, ToastHost,
};

#[derive(Clone)]
struct TestApp {
    services: QuizServices,
}

impl UiApp for TestApp {
    fn clock(&self) -> Clock {
        self.services.clock()
    }

    fn problem_count(&self) -> usize {
        self.services.problem_count()
    }

    fn exams(&self) -> Arc<ExamService> {
        self.services.exams()
    }

    fn history(&self) -> Arc<HistoryService> {
        self.services.history()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Nav,
    Exam,
    /// Exam view plus the toast and confirm overlays, as laid out by the router.
    ExamWithOverlays,
    HistoryList { typ: u64, name: String },
    HistoryDetail { typ: u64, name: String, tag: String },
    Overlays,
}

/// Store of the mounted view, for driving actions from a test.
#[derive(Clone, Copy)]
pub struct Handles {
    pub store: QuizStore,
}

type HandleSlot = Rc<RefCell<Option<Handles>>>;

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    seed: QuizSeed,
    handles: HandleSlot,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    use_context_provider(|| props.seed.clone());
    use_context_provider(|| props.handles.clone());
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    let seed = use_context::<QuizSeed>();
    let handles = use_context::<HandleSlot>();
    let store = use_quiz_store_provider(move || seed);
    handles.borrow_mut().get_or_insert(Handles { store });
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Nav => rsx! { NavBar {} },
        ViewKind::Exam => rsx! { ExamView {} },
        ViewKind::ExamWithOverlays => rsx! {
            ExamView {}
            ToastHost {}
            ConfirmModal {}
        },
        ViewKind::HistoryList { typ, name } => rsx! { HistoryListView { typ, name } },
        ViewKind::HistoryDetail { typ, name, tag } => rsx! { HistoryDetailView { typ, name, tag } },
        ViewKind::Overlays => rsx! {
            ToastHost {}
            ConfirmModal {}
        },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub ctx: AppContext,
    handles: HandleSlot,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    /// The mounted store. Call after `rebuild`.
    pub fn store(&self) -> QuizStore {
        self.handles.borrow().expect("view mounted").store
    }

    /// Run `f` inside the root scope, where signals and `spawn` work.
    pub fn in_runtime<T>(&self, f: impl FnOnce() -> T) -> T {
        self.dom.in_scope(ScopeId::ROOT, f)
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        self.in_runtime(|| {
            spawn(task);
        });
    }

    /// Drive until spawned work settles.
    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Services over the built-in demo banks, with a fixed clock.
pub struct Fixture {
    pub storage: Storage,
    pub services: QuizServices,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_storage(Self::demo_storage())
    }

    /// Demo banks, with history kept in `history`.
    pub fn with_history(history: Arc<dyn HistoryRepository>) -> Self {
        let storage = Storage {
            history,
            ..Self::demo_storage()
        };
        Self::with_storage(storage)
    }

    fn demo_storage() -> Storage {
        let repo = seeded_repository(InMemoryRepository::new().with_clock(fixed_clock()))
            .expect("seed demo banks");
        Storage::from_in_memory(repo)
    }

    fn with_storage(storage: Storage) -> Self {
        let services = QuizServices::new(&storage, fixed_clock(), DEFAULT_PROBLEM_COUNT);
        Self { storage, services }
    }

    pub fn empty_seed(&self) -> QuizSeed {
        QuizSeed::new(self.services.clock())
    }

    pub fn radicals_selection() -> TestSelection {
        let valid = RADICALS.selection().expect("radicals selection");
        TestSelection::new(valid.test_type(), valid.test_name().clone())
    }

    /// A controller with the radicals test loaded and nothing answered yet.
    pub async fn started_controller(&self) -> SessionController {
        let host = RefCell::new(SessionController::new());
        self.services
            .exams()
            .begin(
                &host,
                &Self::radicals_selection(),
                self.services.problem_count(),
            )
            .await
            .expect("begin radicals");
        host.into_inner()
    }

    pub fn mount(&self, view: ViewKind, seed: QuizSeed) -> ViewHarness {
        let app = Arc::new(TestApp {
            services: self.services.clone(),
        });
        let ui_app: Arc<dyn UiApp> = app.clone();
        let ctx = build_app_context(&ui_app);
        let handles = HandleSlot::default();
        let dom = VirtualDom::new_with_props(
            ViewRouterHarness,
            ViewHarnessProps {
                app,
                view,
                seed,
                handles: Rc::clone(&handles),
            },
        );
        ViewHarness { dom, ctx, handles }
    }
}
