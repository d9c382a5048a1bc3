use quiz_core::model::Session;

/// Colour variant of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    Active,
    Complete,
}

impl ProgressStyle {
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Active => "progress-bar",
            Self::Complete => "progress-bar bg-success",
        }
    }
}

/// Render-ready progress bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressIndicator {
    pub value_now: usize,
    pub value_max: usize,
    pub width_percent: usize,
    pub label: String,
    pub style: ProgressStyle,
}

/// Derives the progress bar from session state.
pub struct ProgressTracker;

impl ProgressTracker {
    /// Bar at position `current` of `max`, width rounded half up.
    #[must_use]
    pub fn render(current: usize, max: usize, style: ProgressStyle) -> ProgressIndicator {
        ProgressIndicator {
            value_now: current,
            value_max: max,
            width_percent: width_percent(current, max),
            label: format!("{current}/{max}"),
            style,
        }
    }

    /// Score bar shown once every problem is answered. `None` before that.
    #[must_use]
    pub fn summary(session: &Session) -> Option<ProgressIndicator> {
        let score = session.score()?;
        let mut indicator = Self::render(score.correct, score.total, ProgressStyle::Complete);
        indicator.label = score.to_string();
        Some(indicator)
    }

    /// Whatever bar fits the current phase.
    #[must_use]
    pub fn for_session(session: &Session) -> ProgressIndicator {
        Self::summary(session).unwrap_or_else(|| {
            Self::render(
                session.current_index(),
                session.problem_count(),
                ProgressStyle::Active,
            )
        })
    }
}

fn width_percent(current: usize, max: usize) -> usize {
    if max == 0 {
        return 0;
    }
    (current.saturating_mul(200) + max) / (2 * max)
}
