use dioxus::prelude::*;

use super::exam_vm::ExamVm;
use crate::views::ExamBoard;

/// Static HTML of the exam board, as stored by the history endpoint.
#[must_use]
pub fn render_snapshot(vm: &ExamVm) -> String {
    dioxus_ssr::render_element(rsx! {
        SnapshotView { vm: vm.clone() }
    })
}

#[component]
fn SnapshotView(vm: ExamVm) -> Element {
    rsx! {
        div { id: "mainpage",
            h4 { "{vm.test_name}" }
            ExamBoard { vm }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{
        OptionId, Problem, ProblemOption, ProblemSet, Session, SessionToken, TestName,
        TestTypeId, ValidSelection,
    };

    #[test]
    fn snapshot_of_summary_holds_every_problem() {
        let problems = (0..10)
            .map(|i| {
                Problem::new(
                    i,
                    format!("head-{i}"),
                    String::new(),
                    vec![
                        ProblemOption {
                            id: OptionId::new(0),
                            html: "a".into(),
                        },
                        ProblemOption {
                            id: OptionId::new(1),
                            html: "b".into(),
                        },
                    ],
                    OptionId::new(1),
                )
                .unwrap()
            })
            .collect();
        let mut session = Session::new(
            SessionToken::mint(),
            ValidSelection::new(TestTypeId::CLUSTERING, TestName::new("部首").unwrap()),
            ProblemSet::new(problems, 10).unwrap(),
        );
        for i in 0..10 {
            session.record(i, OptionId::new(1)).unwrap();
            session.advance(i + 1).unwrap();
        }

        let html = render_snapshot(&ExamVm::from_session(&session));
        for i in 0..10 {
            assert!(html.contains(&format!("test-card-{i}")), "card {i} missing in {html}");
            assert!(html.contains(&format!("head-{i}")));
        }
        assert!(html.contains("10/10分"));
        assert!(html.contains("bg-success"));
    }
}
