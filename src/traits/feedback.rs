use crate::game::JudgmentOutcome;

/// Presentation collaborator: receives outcome notifications to render
/// feedback. The core never depends on any of these calls succeeding or
/// completing; implementations must not block.
pub trait FeedbackSink {
    /// One input was judged. `score` is the ledger total after the award.
    fn on_judgment(&mut self, outcome: &JudgmentOutcome, score: u64) {
        let _ = (outcome, score);
    }

    /// The double-points indicator turned on or off.
    fn on_bonus_changed(&mut self, active: bool) {
        let _ = active;
    }

    /// The chart looped: playback speed increased, score carried forward.
    fn on_loop(&mut self, speed_multiplier: f64) {
        let _ = speed_multiplier;
    }
}

/// Sink that ignores everything; used when no presentation is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {}
