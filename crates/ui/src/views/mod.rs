mod exam;
mod history;
mod home;
mod nav;
mod overlay;
mod state;

pub use exam::{ExamBoard, ExamView};
pub use history::{HistoryDetailView, HistoryListView};
pub use home::HomeView;
pub use nav::NavBar;
pub use overlay::{ConfirmModal, ToastHost};
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
