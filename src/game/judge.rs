use tracing::debug;

use crate::chart::{Beat, BeatKind, Chart};
use crate::config::{GameConfig, ToleranceWindows};

/// Accuracy classification of one input against one beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    Perfect,
    Good,
    Miss,
}

impl Judgment {
    /// A miss ends the session; there is no retry allowance.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Miss)
    }
}

/// Result of judging one input event: the classification, the beat it
/// consumed (hits only), and the base points awarded.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentOutcome {
    pub judgment: Judgment,
    pub beat: Option<Beat>,
    pub score_delta: u64,
}

/// Classifies input timing against the chart and consumes matched beats.
///
/// Taps are judged strictly against the head beat; holds are judged against
/// the earliest remaining hold beat, leaving taps ahead of it in place. An
/// input with no matchable beat is a no-op rather than a miss (see
/// `judge_tap`), which keeps a stray tap after the last beat from ending an
/// otherwise clean run.
pub struct TimingJudge {
    tap_windows: ToleranceWindows,
    hold_windows: ToleranceWindows,
    perfect_points: u64,
    good_points: u64,
}

impl TimingJudge {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            tap_windows: config.tap_windows,
            hold_windows: config.hold_windows,
            perfect_points: config.perfect_points,
            good_points: config.good_points,
        }
    }

    /// Judge a tap at playback time `time` against the head of `chart`.
    ///
    /// Only the head beat is considered, and only if it is a tap beat.
    /// Returns `None` when there is nothing to judge (empty chart, or a hold
    /// beat at the head). Perfect/Good consume the head; Miss leaves the
    /// chart untouched.
    pub fn judge_tap(&self, chart: &mut Chart, time: f64) -> Option<JudgmentOutcome> {
        let head = match chart.head() {
            Some(beat) if beat.kind.is_tap() => *beat,
            _ => {
                debug!(time, "tap with no matchable beat; ignoring");
                return None;
            }
        };

        let accuracy = (time - head.timestamp).abs();
        Some(self.classify(chart, head, accuracy, self.tap_windows, |c| {
            c.pop_head();
        }))
    }

    /// Judge a completed hold of `duration` seconds against the earliest
    /// remaining hold beat.
    ///
    /// Tap beats ahead of it stay in the chart for their own judgments.
    /// Returns `None` when no hold beat remains.
    pub fn judge_hold(&self, chart: &mut Chart, duration: f64) -> Option<JudgmentOutcome> {
        let Some((target, expected)) = chart.iter().find_map(|b| match b.kind {
            BeatKind::Hold { duration } => Some((*b, duration)),
            BeatKind::Tap => None,
        }) else {
            debug!(duration, "hold with no matchable beat; ignoring");
            return None;
        };

        let accuracy = (duration - expected).abs();
        Some(self.classify(chart, target, accuracy, self.hold_windows, |c| {
            c.take_first_hold();
        }))
    }

    /// A head beat this far past its timestamp can no longer be hit; the
    /// per-frame tick treats it as a miss.
    pub fn is_overdue(&self, beat: &Beat, now: f64) -> bool {
        now - beat.timestamp > self.tap_windows.good
    }

    fn classify(
        &self,
        chart: &mut Chart,
        beat: Beat,
        accuracy: f64,
        windows: ToleranceWindows,
        consume: impl FnOnce(&mut Chart),
    ) -> JudgmentOutcome {
        // Window boundaries are inclusive.
        let (judgment, score_delta) = if accuracy <= windows.perfect {
            (Judgment::Perfect, self.perfect_points)
        } else if accuracy <= windows.good {
            (Judgment::Good, self.good_points)
        } else {
            (Judgment::Miss, 0)
        };

        let matched = if judgment.is_fatal() {
            // A miss consumes nothing; the session is over anyway.
            None
        } else {
            consume(chart);
            Some(beat)
        };

        JudgmentOutcome {
            judgment,
            beat: matched,
            score_delta,
        }
    }
}
