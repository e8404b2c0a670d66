mod bonus;
mod input;
mod judge;
mod score;
mod session;

pub use bonus::ComboBonusTracker;
pub use input::{HoldRecorder, InputEvent};
pub use judge::{Judgment, JudgmentOutcome, TimingJudge};
pub use score::ScoreLedger;
pub use session::{GameSession, SessionError, SessionState, TickEvent, can_transition};
