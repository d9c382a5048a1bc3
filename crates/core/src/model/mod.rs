mod ids;
mod outcome;
mod problem;
mod selection;
mod session;

pub use ids::{HistoryTag, OptionId, ParseIdError, SessionToken, TestName, TestTypeId};
pub use outcome::{Badge, ProblemOutcome, Verdict};
pub use problem::{Problem, ProblemOption, ProblemSet, ProblemSetError};
pub use selection::{SelectionError, TestSelection, TestType, ValidSelection};
pub use session::{
    PersistState, ProblemCard, ProgressState, Score, Session, SessionPhase, SessionStateError,
    SnapshotRequest,
};
