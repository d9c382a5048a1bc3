use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{HistoryTag, OptionId, PersistState, TestName, TestTypeId, ValidSelection};
use services::{ConfirmDecision, ControllerStatus, SessionError, ToastKind, ToastMessage};
use storage::repository::{HistoryRepository, StorageError};

use super::test_harness::{Fixture, ViewHarness, ViewKind};
use crate::actions;

/// Keeps every submitted snapshot and answers with a fixed result.
#[derive(Clone, Default)]
struct RecordingHistory {
    saves: Arc<Mutex<Vec<String>>>,
    fail_with: Option<u16>,
}

#[async_trait]
impl HistoryRepository for RecordingHistory {
    async fn save_history(
        &self,
        _selection: &ValidSelection,
        snapshot_html: &str,
    ) -> Result<(), StorageError> {
        self.saves.lock().unwrap().push(snapshot_html.to_owned());
        match self.fail_with {
            Some(status) => Err(StorageError::Http {
                status,
                detail: "Internal Server Error".into(),
            }),
            None => Ok(()),
        }
    }

    async fn list_history(
        &self,
        _selection: &ValidSelection,
    ) -> Result<Vec<HistoryTag>, StorageError> {
        Ok(Vec::new())
    }

    async fn load_history(
        &self,
        _selection: &ValidSelection,
        _tag: &HistoryTag,
    ) -> Result<String, StorageError> {
        Err(StorageError::NotFound)
    }
}

fn answer_of(harness: &ViewHarness, index: usize) -> OptionId {
    let store = harness.store();
    harness.in_runtime(|| {
        store
            .controller
            .read()
            .session()
            .and_then(|s| s.problems().get(index))
            .map(|p| p.answer())
            .unwrap()
    })
}

async fn answer_all_correctly(harness: &mut ViewHarness) {
    let store = harness.store();
    for index in 0..10 {
        let answer = answer_of(harness, index);
        let ctx = harness.ctx.clone();
        harness.in_runtime(|| actions::choose(store, &ctx, index, answer));
        harness.drive_async().await;
    }
}

async fn mount_started_exam(fixture: &Fixture) -> ViewHarness {
    let mut seed = fixture.empty_seed();
    seed.selection = Fixture::radicals_selection();
    seed.controller = fixture.started_controller().await;
    let mut harness = fixture.mount(ViewKind::ExamWithOverlays, seed);
    harness.rebuild();
    harness
}

fn radicals() -> ValidSelection {
    ValidSelection::new(TestTypeId::CLUSTERING, TestName::new("常用部首").unwrap())
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_shows_problem_count() {
    let fixture = Fixture::new();
    let mut harness = fixture.mount(ViewKind::Home, fixture.empty_seed());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("每次测试 10 题"), "missing count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn nav_lists_types_and_names_for_selected_type() {
    let fixture = Fixture::new();
    let mut seed = fixture.empty_seed();
    seed.selection = Fixture::radicals_selection();
    let mut harness = fixture.mount(ViewKind::Nav, seed);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("聚类"), "missing type in {html}");
    assert!(html.contains("常用部首"), "missing name in {html}");
    assert!(html.contains("词语归类"), "missing second name in {html}");
    assert!(html.contains("begin-test"));
}

#[tokio::test(flavor = "current_thread")]
async fn nav_disables_begin_without_selection() {
    let fixture = Fixture::new();
    let mut harness = fixture.mount(ViewKind::Nav, fixture.empty_seed());
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("未选中"), "missing placeholder in {html}");
    assert!(!html.contains("常用部首"), "names listed without a type in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_idle_shows_hint() {
    let fixture = Fixture::new();
    let mut harness = fixture.mount(ViewKind::Exam, fixture.empty_seed());
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("请选择测试"), "missing hint in {html}");
    assert!(!html.contains("test-card-"));
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_in_progress_shows_only_current_card() {
    let fixture = Fixture::new();
    let mut seed = fixture.empty_seed();
    seed.controller = fixture.started_controller().await;
    let mut harness = fixture.mount(ViewKind::Exam, seed);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("test-card-0"), "missing first card in {html}");
    assert!(!html.contains("test-card-1"), "second card shown early in {html}");
    assert!(html.contains("test-progressbar"));
    assert!(html.contains("0/10"), "missing progress label in {html}");
    assert!(!html.contains("wa-only-toggle"));
}

#[tokio::test(flavor = "current_thread")]
async fn exam_summary_with_wrong_only_hides_all_correct_cards() {
    let fixture = Fixture::new();
    let mut controller = fixture.started_controller().await;
    for index in 0..10 {
        let answer = controller
            .session()
            .and_then(|s| s.problems().get(index))
            .map(|p| p.answer())
            .unwrap();
        controller.submit(index, answer).unwrap();
    }
    controller.toggle_wrong_only().unwrap();
    let mut seed = fixture.empty_seed();
    seed.controller = controller;

    let mut harness = fixture.mount(ViewKind::Exam, seed);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("10/10分"), "missing score in {html}");
    assert!(html.contains("bg-success"));
    assert!(html.contains("显示全部"));
    assert!(!html.contains("test-card-"), "correct cards visible in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn exam_view_reports_load_failure() {
    let fixture = Fixture::new();
    let mut controller = services::SessionController::new();
    let ticket = controller
        .prepare_begin(&Fixture::radicals_selection(), 10)
        .unwrap();
    let _ = controller.complete_begin(ticket.token, Err(SessionError::NotInProgress));
    let mut seed = fixture.empty_seed();
    seed.controller = controller;

    let mut harness = fixture.mount(ViewKind::Exam, seed);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("加载测试失败"), "missing failure in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_list_links_saved_snapshots() {
    let fixture = Fixture::new();
    fixture
        .storage
        .history
        .save_history(&radicals(), "<p>first</p>")
        .await
        .unwrap();
    let mut harness = fixture.mount(
        ViewKind::HistoryList {
            typ: 1,
            name: "常用部首".into(),
        },
        fixture.empty_seed(),
    );
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("list-group-item"), "missing entry in {html}");
    assert!(!html.contains("暂无历史记录"));
}

#[tokio::test(flavor = "current_thread")]
async fn history_detail_sanitizes_snapshot() {
    let fixture = Fixture::new();
    let history = &fixture.storage.history;
    history
        .save_history(
            &radicals(),
            r#"<div id="test-card-0" class="card">ok</div><script>alert(1)</script>"#,
        )
        .await
        .unwrap();
    let tag = history.list_history(&radicals()).await.unwrap().remove(0);
    let mut harness = fixture.mount(
        ViewKind::HistoryDetail {
            typ: 1,
            name: "常用部首".into(),
            tag: tag.as_str().to_string(),
        },
        fixture.empty_seed(),
    );
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("test-card-0"), "missing snapshot in {html}");
    assert!(!html.contains("alert(1)"), "script survived in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn history_list_rejects_unknown_name() {
    let fixture = Fixture::new();
    let mut harness = fixture.mount(
        ViewKind::HistoryList {
            typ: 0,
            name: "常用部首".into(),
        },
        fixture.empty_seed(),
    );
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("请先选择测试类型和测试名称"), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn toast_overlay_shows_current_message() {
    let fixture = Fixture::new();
    let mut seed = fixture.empty_seed();
    seed.toasts.show(ToastMessage {
        title: "POST错误".into(),
        body: "status: 500<br>error: Internal Server Error".into(),
        kind: ToastKind::Persistent,
    });
    let mut harness = fixture.mount(ViewKind::Overlays, seed);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("liveToast"));
    assert!(html.contains("POST错误"), "missing title in {html}");
    assert!(html.contains("status: 500"), "missing body in {html}");
    assert!(!html.contains("yes-or-no-modal"));
}

#[tokio::test(flavor = "current_thread")]
async fn declined_restart_leaves_state_and_route_alone() {
    let fixture = Fixture::new();
    let mut seed = fixture.empty_seed();
    seed.selection = Fixture::radicals_selection();
    let mut harness = fixture.mount(ViewKind::ExamWithOverlays, seed);
    harness.rebuild();
    let store = harness.store();
    let entered = Rc::new(Cell::new(false));

    let flag = Rc::clone(&entered);
    harness.spawn(actions::restart_exam(store, harness.ctx.clone(), move || {
        flag.set(true)
    }));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("yes-or-no-modal"), "no prompt in {html}");
    assert!(html.contains("重新开始"));

    harness.in_runtime(|| store.answer_confirm(ConfirmDecision::No));
    harness.settle().await;

    let status = harness.in_runtime(|| store.controller.read().status());
    assert_eq!(status, ControllerStatus::Idle);
    assert!(!entered.get());
    assert!(!harness.render().contains("yes-or-no-modal"));
}

#[tokio::test(flavor = "current_thread")]
async fn confirmed_restart_begins_and_enters_exam() {
    let fixture = Fixture::new();
    let mut seed = fixture.empty_seed();
    seed.selection = Fixture::radicals_selection();
    let mut harness = fixture.mount(ViewKind::ExamWithOverlays, seed);
    harness.rebuild();
    let store = harness.store();
    let entered = Rc::new(Cell::new(false));

    let flag = Rc::clone(&entered);
    harness.spawn(actions::restart_exam(store, harness.ctx.clone(), move || {
        flag.set(true)
    }));
    harness.settle().await;
    harness.in_runtime(|| store.answer_confirm(ConfirmDecision::Yes));
    harness.settle().await;

    let status = harness.in_runtime(|| store.controller.read().status());
    assert_eq!(status, ControllerStatus::InProgress(0));
    assert!(entered.get());
    let html = harness.render();
    assert!(html.contains("test-card-0"), "exam not shown in {html}");
    assert!(!html.contains("yes-or-no-modal"));
}

#[tokio::test(flavor = "current_thread")]
async fn finishing_the_exam_saves_one_full_snapshot() {
    let recorder = RecordingHistory::default();
    let fixture = Fixture::with_history(Arc::new(recorder.clone()));
    let mut harness = mount_started_exam(&fixture).await;
    let store = harness.store();

    answer_all_correctly(&mut harness).await;
    let last = answer_of(&harness, 9);
    let ctx = harness.ctx.clone();
    harness.in_runtime(|| actions::choose(store, &ctx, 9, last));
    harness.settle().await;

    let saves = recorder.saves.lock().unwrap().clone();
    assert_eq!(saves.len(), 1, "expected exactly one save");
    for index in 0..10 {
        assert!(
            saves[0].contains(&format!("test-card-{index}")),
            "card {index} missing from snapshot"
        );
    }
    assert!(saves[0].contains("10/10分"));

    let persisted = harness.in_runtime(|| {
        store
            .controller
            .read()
            .session()
            .map(|s| s.persistence())
    });
    assert_eq!(persisted, Some(PersistState::Saved));
    let html = harness.render();
    assert!(html.contains("保存测试结果"), "missing toast in {html}");
    assert!(html.contains("保存成功"));
}

#[tokio::test(flavor = "current_thread")]
async fn failed_save_offers_retry_with_same_snapshot() {
    let recorder = RecordingHistory {
        fail_with: Some(500),
        ..RecordingHistory::default()
    };
    let fixture = Fixture::with_history(Arc::new(recorder.clone()));
    let mut harness = mount_started_exam(&fixture).await;
    let store = harness.store();

    answer_all_correctly(&mut harness).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("POST错误"), "missing error toast in {html}");
    assert!(html.contains("status: 500"));
    assert!(html.contains("retry-save"));
    assert!(html.contains("10/10分"));

    let history = harness.ctx.history();
    harness.in_runtime(|| actions::retry_save(store, history));
    harness.settle().await;

    let saves = recorder.saves.lock().unwrap().clone();
    assert_eq!(saves.len(), 2);
    assert_eq!(saves[0], saves[1]);
}
