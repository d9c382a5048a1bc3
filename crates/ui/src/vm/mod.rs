mod exam_vm;
mod html;
mod snapshot;

pub use exam_vm::{ExamVm, OptionVm, ProblemCardVm, badge_style};
pub use html::{sanitize_html, sanitize_snapshot};
pub use snapshot::render_snapshot;
