use quiz_core::model::{Badge, OptionId, PersistState, ProblemCard, Session, Verdict};
use services::{ProgressIndicator, ProgressTracker};

use super::html::sanitize_html;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub id: OptionId,
    pub html: String,
    pub badge: Option<Badge>,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProblemCardVm {
    pub index: usize,
    pub head_html: String,
    pub explain_html: String,
    pub explain_visible: bool,
    pub visible: bool,
    /// `AC`/`WA` once answered.
    pub marker: Option<&'static str>,
    pub disabled: bool,
    pub options: Vec<OptionVm>,
}

impl ProblemCardVm {
    #[must_use]
    pub fn from_card(card: &ProblemCard<'_>) -> Self {
        let problem = card.problem();
        Self {
            index: problem.index(),
            head_html: sanitize_html(problem.head()),
            explain_html: sanitize_html(problem.explain()),
            explain_visible: card.explain_visible(),
            visible: card.visible(),
            marker: card.verdict().map(Verdict::marker),
            disabled: card.inputs_disabled(),
            options: problem
                .options()
                .iter()
                .map(|opt| OptionVm {
                    id: opt.id,
                    html: sanitize_html(&opt.html),
                    badge: card.badge(opt.id),
                    checked: card.selected() == Some(opt.id),
                })
                .collect(),
        }
    }
}

/// Everything the exam board renders, projected from one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamVm {
    pub test_name: String,
    pub progress: ProgressIndicator,
    pub cards: Vec<ProblemCardVm>,
    pub in_summary: bool,
    pub wrong_only: bool,
    pub persistence: PersistState,
}

impl ExamVm {
    #[must_use]
    pub fn from_session(session: &Session) -> Self {
        Self {
            test_name: session.selection().test_name().to_string(),
            progress: ProgressTracker::for_session(session),
            cards: session
                .cards()
                .map(|card| ProblemCardVm::from_card(&card))
                .collect(),
            in_summary: session.is_complete(),
            wrong_only: session.wrong_only(),
            persistence: session.persistence(),
        }
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &ProblemCardVm> {
        self.cards.iter().filter(|card| card.visible)
    }
}

/// Css class and glyph for an option badge.
#[must_use]
pub fn badge_style(badge: Badge) -> (&'static str, &'static str) {
    match badge {
        Badge::Right => ("badge bg-success", "✔"),
        Badge::Wrong => ("badge bg-danger", "✘"),
    }
}
