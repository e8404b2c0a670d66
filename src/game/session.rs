use thiserror::Error;
use tracing::{error, info};

use crate::chart::{Chart, SPEED_STEP, SpeedScaler};
use crate::config::GameConfig;
use crate::traits::PlaybackClock;

use super::{ComboBonusTracker, InputEvent, JudgmentOutcome, ScoreLedger, TimingJudge};

/// Authoritative session state. Closed set; every mutation goes through the
/// transition table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Start,
    Playing,
    GameOver,
}

/// Transition table for the session machine.
///
/// `Playing -> Playing` is the loop path: chart exhausted without a miss,
/// speed increased, score carried. `GameOver -> Playing` is the full restart
/// path: score and speed back to defaults. Keeping those two separate is the
/// point of the table.
pub fn can_transition(from: SessionState, to: SessionState) -> bool {
    use SessionState::*;
    matches!(
        (from, to),
        (Start, Playing) | (Playing, Playing) | (Playing, GameOver) | (GameOver, Playing)
    )
}

/// A rejected trigger is a collaborator protocol violation (input delivered
/// in the wrong state, restart before game over). It is surfaced, never
/// silently ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("illegal transition {from:?} -> {to:?}")]
    IllegalTransition {
        from: SessionState,
        to: SessionState,
    },
}

/// Something the per-frame tick noticed.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    /// The head beat passed beyond its window with no input; fatal.
    MissedBeat,
    /// Chart exhausted without failure: speed increased, score carried.
    Looped { speed_multiplier: f64 },
}

/// One full play session: base chart, active (speed-scaled) chart, judge,
/// bonus tracker and score, all behind a single serialized access path.
///
/// Each input event is judged to completion (chart removal, bonus update,
/// score award) before the next one is looked at; there is no partial state
/// in between.
pub struct GameSession {
    scaler: SpeedScaler,
    active_chart: Chart,
    judge: TimingJudge,
    bonus: ComboBonusTracker,
    score: ScoreLedger,
    state: SessionState,
    speed_multiplier: f64,
    loops_completed: u32,
}

impl GameSession {
    pub fn new(base_chart: Chart, config: &GameConfig) -> Self {
        Self {
            scaler: SpeedScaler::new(base_chart),
            active_chart: Chart::new(),
            judge: TimingJudge::new(config),
            bonus: ComboBonusTracker::new(
                config.initial_bonus_threshold,
                config.warm_up,
                config.perfect_points,
                config.good_points,
            ),
            score: ScoreLedger::new(),
            state: SessionState::Start,
            speed_multiplier: 1.0,
            loops_completed: 0,
        }
    }

    /// The single "begin" trigger: `Start -> Playing`.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::Start, "begin")?;
        self.transition(SessionState::Playing)?;
        self.active_chart = self.scaler.chart_for(self.speed_multiplier);
        info!(beats = self.active_chart.len(), "session started");
        Ok(())
    }

    /// Judge one input event. Legal only while Playing; anywhere else the
    /// event is a collaborator bug and is rejected.
    ///
    /// Returns `Ok(None)` when there was nothing to judge (stray input), the
    /// no-op policy for unmatchable events.
    pub fn handle_event(
        &mut self,
        event: InputEvent,
    ) -> Result<Option<JudgmentOutcome>, SessionError> {
        if self.state != SessionState::Playing {
            error!(state = ?self.state, ?event, "input delivered outside Playing");
            return Err(SessionError::IllegalTransition {
                from: self.state,
                to: SessionState::Playing,
            });
        }

        let outcome = match event {
            InputEvent::Tap { time } => self.judge.judge_tap(&mut self.active_chart, time),
            InputEvent::Hold { duration } => {
                self.judge.judge_hold(&mut self.active_chart, duration)
            }
        };

        let Some(outcome) = outcome else {
            return Ok(None);
        };

        if outcome.judgment.is_fatal() {
            self.fail();
        } else if let Some(beat) = &outcome.beat {
            let bonus_delta = self.bonus.observe(outcome.judgment, beat.timestamp);
            self.score.add(outcome.score_delta + bonus_delta);
        }

        Ok(Some(outcome))
    }

    /// Per-frame poll of the playback clock.
    ///
    /// Detects beats that went past their window without input (fatal) and
    /// chart exhaustion (loop: speed up, rescale from the base chart, keep
    /// the score). A tick outside Playing is a no-op; frames keep coming in
    /// Start and GameOver and that is not a protocol violation.
    pub fn tick(&mut self, clock: &dyn PlaybackClock) -> Option<TickEvent> {
        if self.state != SessionState::Playing {
            return None;
        }

        let now = clock.current_time();
        if let Some(&head) = self.active_chart.head()
            && self.judge.is_overdue(&head, now)
        {
            info!(beat = head.timestamp, now, "beat missed without input");
            self.fail();
            return Some(TickEvent::MissedBeat);
        }

        if self.active_chart.is_empty() || clock.is_finished() {
            self.advance_loop();
            return Some(TickEvent::Looped {
                speed_multiplier: self.speed_multiplier,
            });
        }

        None
    }

    /// The explicit restart trigger: `GameOver -> Playing` with score, speed
    /// and bonus state back to defaults.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.expect_state(SessionState::GameOver, "restart")?;
        self.transition(SessionState::Playing)?;
        self.score.reset();
        self.bonus.reset();
        self.speed_multiplier = 1.0;
        self.loops_completed = 0;
        self.active_chart = self.scaler.chart_for(1.0);
        info!("session restarted from scratch");
        Ok(())
    }

    fn fail(&mut self) {
        if self.transition(SessionState::GameOver).is_ok() {
            info!(score = self.score.current(), "session over");
        }
    }

    /// Triggers are tied to a source state even where the raw edge exists in
    /// the table (`Start -> Playing` is begin's edge, not restart's).
    fn expect_state(
        &self,
        expected: SessionState,
        trigger: &'static str,
    ) -> Result<(), SessionError> {
        if self.state != expected {
            error!(state = ?self.state, trigger, "trigger received in wrong state");
            return Err(SessionError::IllegalTransition {
                from: self.state,
                to: SessionState::Playing,
            });
        }
        Ok(())
    }

    fn advance_loop(&mut self) {
        // Playing -> Playing; validated like any other transition.
        if self.transition(SessionState::Playing).is_err() {
            return;
        }
        self.speed_multiplier += SPEED_STEP;
        self.loops_completed += 1;
        self.active_chart = self.scaler.chart_for(self.speed_multiplier);
        info!(
            speed = self.speed_multiplier,
            loops = self.loops_completed,
            "chart exhausted; looping faster"
        );
    }

    fn transition(&mut self, to: SessionState) -> Result<(), SessionError> {
        if !can_transition(self.state, to) {
            error!(from = ?self.state, ?to, "illegal session transition");
            return Err(SessionError::IllegalTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score.current()
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn bonus_active(&self) -> bool {
        self.bonus.bonus_active()
    }

    pub fn loops_completed(&self) -> u32 {
        self.loops_completed
    }

    pub fn remaining_beats(&self) -> usize {
        self.active_chart.len()
    }

    /// The speed-scaled chart for the current loop; what a presenter would
    /// render as upcoming beats.
    pub fn active_chart(&self) -> &Chart {
        &self.active_chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Beat;
    use crate::game::Judgment;
    use crate::traits::MockClock;

    fn session(beats: impl IntoIterator<Item = Beat>) -> GameSession {
        GameSession::new(Chart::from_beats(beats), &GameConfig::default())
    }

    fn tap(time: f64) -> InputEvent {
        InputEvent::Tap { time }
    }

    #[test]
    fn transition_table() {
        use SessionState::*;
        assert!(can_transition(Start, Playing));
        assert!(can_transition(Playing, Playing));
        assert!(can_transition(Playing, GameOver));
        assert!(can_transition(GameOver, Playing));

        assert!(!can_transition(Start, GameOver));
        assert!(!can_transition(Start, Start));
        assert!(!can_transition(GameOver, GameOver));
        assert!(!can_transition(GameOver, Start));
        assert!(!can_transition(Playing, Start));
    }

    #[test]
    fn input_before_begin_is_rejected() {
        let mut s = session([Beat::tap(1.0)]);
        let err = s.handle_event(tap(1.0)).unwrap_err();
        assert_eq!(
            err,
            SessionError::IllegalTransition {
                from: SessionState::Start,
                to: SessionState::Playing,
            }
        );
    }

    #[test]
    fn begin_twice_is_rejected() {
        let mut s = session([Beat::tap(1.0)]);
        s.begin().unwrap();
        // Playing -> Playing is the loop edge, but begin is only legal from
        // Start.
        assert!(s.begin().is_err());
    }

    #[test]
    fn perfect_awards_and_consumes() {
        let mut s = session([Beat::tap(1.0), Beat::tap(2.0)]);
        s.begin().unwrap();

        let outcome = s.handle_event(tap(1.05)).unwrap().unwrap();
        assert_eq!(outcome.judgment, Judgment::Perfect);
        assert_eq!(s.score(), 100);
        assert_eq!(s.remaining_beats(), 1);
        assert_eq!(s.state(), SessionState::Playing);
    }

    #[test]
    fn miss_ends_the_session() {
        let mut s = session([Beat::tap(1.0)]);
        s.begin().unwrap();

        let outcome = s.handle_event(tap(1.3)).unwrap().unwrap();
        assert_eq!(outcome.judgment, Judgment::Miss);
        assert_eq!(s.state(), SessionState::GameOver);
        assert_eq!(s.score(), 0);

        // Judging is over; further input is a protocol violation.
        assert!(s.handle_event(tap(2.0)).is_err());
    }

    #[test]
    fn two_tap_chart_fails_on_late_second_tap() {
        let mut s = session([Beat::tap(0.0), Beat::tap(1.0)]);
        s.begin().unwrap();

        let first = s.handle_event(tap(0.05)).unwrap().unwrap();
        assert_eq!(first.judgment, Judgment::Perfect);
        assert_eq!(s.score(), 100);
        assert_eq!(s.remaining_beats(), 1);

        // accuracy 0.3 > 0.25: miss, game over.
        let second = s.handle_event(tap(1.3)).unwrap().unwrap();
        assert_eq!(second.judgment, Judgment::Miss);
        assert_eq!(s.state(), SessionState::GameOver);
    }

    #[test]
    fn stray_tap_is_a_noop() {
        let mut s = session([Beat::hold(1.0, 0.5)]);
        s.begin().unwrap();

        assert_eq!(s.handle_event(tap(1.0)).unwrap(), None);
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.remaining_beats(), 1);
    }

    #[test]
    fn loop_keeps_score_and_steps_speed() {
        let mut s = session([Beat::tap(1.0)]);
        s.begin().unwrap();
        s.handle_event(tap(1.0)).unwrap();
        assert_eq!(s.score(), 100);

        let clock = MockClock::new();
        clock.set_time(1.1);
        let event = s.tick(&clock).unwrap();
        assert_eq!(
            event,
            TickEvent::Looped {
                speed_multiplier: 1.1
            }
        );

        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.score(), 100);
        assert!((s.speed_multiplier() - 1.1).abs() < 1e-9);
        assert_eq!(s.loops_completed(), 1);

        // The looped chart is the base compressed by 1.1: head at ~0.909s.
        assert_eq!(s.remaining_beats(), 1);
        let outcome = s.handle_event(tap(1.0 / 1.1)).unwrap().unwrap();
        assert_eq!(outcome.judgment, Judgment::Perfect);
    }

    #[test]
    fn each_loop_scales_from_the_base_chart() {
        let mut s = session([Beat::tap(1.0)]);
        s.begin().unwrap();
        let clock = MockClock::new();

        s.handle_event(tap(1.0)).unwrap();
        s.tick(&clock).unwrap();
        s.handle_event(tap(1.0 / 1.1)).unwrap();
        s.tick(&clock).unwrap();

        // Second loop: multiplier 1.2 applied to the base, not 1.1 * 1.2.
        assert!((s.speed_multiplier() - 1.2).abs() < 1e-9);
        let outcome = s.handle_event(tap(1.0 / 1.2)).unwrap().unwrap();
        assert_eq!(outcome.judgment, Judgment::Perfect);
    }

    #[test]
    fn playback_finish_also_loops() {
        let mut s = session([Beat::tap(100.0)]);
        s.begin().unwrap();

        let clock = MockClock::new();
        clock.finish();
        let event = s.tick(&clock).unwrap();
        assert!(matches!(event, TickEvent::Looped { .. }));
    }

    #[test]
    fn overdue_beat_is_fatal() {
        let mut s = session([Beat::tap(1.0)]);
        s.begin().unwrap();

        let clock = MockClock::new();
        clock.set_time(1.2);
        assert_eq!(s.tick(&clock), None);

        clock.set_time(1.3);
        assert_eq!(s.tick(&clock), Some(TickEvent::MissedBeat));
        assert_eq!(s.state(), SessionState::GameOver);
    }

    #[test]
    fn tick_outside_playing_is_a_noop() {
        let mut s = session([Beat::tap(1.0)]);
        let clock = MockClock::new();
        assert_eq!(s.tick(&clock), None);
        assert_eq!(s.state(), SessionState::Start);
    }

    #[test]
    fn restart_resets_score_and_speed() {
        let mut s = session([Beat::tap(1.0)]);
        s.begin().unwrap();
        s.handle_event(tap(1.0)).unwrap();

        let clock = MockClock::new();
        clock.set_time(1.05);
        s.tick(&clock).unwrap(); // loop -> 1.1x

        // Fail on the rescaled chart.
        s.handle_event(tap(5.0)).unwrap();
        assert_eq!(s.state(), SessionState::GameOver);

        s.restart().unwrap();
        assert_eq!(s.state(), SessionState::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.speed_multiplier(), 1.0);
        assert_eq!(s.loops_completed(), 0);
        assert_eq!(s.remaining_beats(), 1);

        // Chart is back to base timing.
        let outcome = s.handle_event(tap(1.0)).unwrap().unwrap();
        assert_eq!(outcome.judgment, Judgment::Perfect);
    }

    #[test]
    fn restart_before_game_over_is_rejected() {
        let mut s = session([Beat::tap(1.0)]);
        assert!(s.restart().is_err());
        s.begin().unwrap();
        assert!(s.restart().is_err());
    }

    #[test]
    fn bonus_doubles_points_past_warm_up() {
        // Ten taps past the 5s warm-up threshold, one second apart.
        let beats: Vec<Beat> = (0..10).map(|i| Beat::tap(6.0 + i as f64)).collect();
        let mut s = session(beats);
        s.begin().unwrap();

        for i in 0..5 {
            s.handle_event(tap(6.0 + i as f64)).unwrap();
        }
        assert_eq!(s.score(), 500);
        assert!(!s.bonus_active());

        // Sixth perfect: 100 base + 100 bonus.
        s.handle_event(tap(11.0)).unwrap();
        assert_eq!(s.score(), 700);
        assert!(s.bonus_active());
    }

    #[test]
    fn empty_chart_session_loops_immediately() {
        // ChartNotFound path: the session starts with no beats and runs out
        // instantly instead of erroring.
        let mut s = session([]);
        s.begin().unwrap();

        let clock = MockClock::new();
        let event = s.tick(&clock).unwrap();
        assert!(matches!(event, TickEvent::Looped { .. }));
        assert_eq!(s.state(), SessionState::Playing);
    }

    #[test]
    fn hold_event_judged_by_duration() {
        let mut s = session([Beat::tap(1.0), Beat::hold(2.0, 0.8)]);
        s.begin().unwrap();

        let outcome = s
            .handle_event(InputEvent::Hold { duration: 0.75 })
            .unwrap()
            .unwrap();
        assert_eq!(outcome.judgment, Judgment::Perfect);
        // The tap ahead of the hold is still there.
        assert_eq!(s.remaining_beats(), 1);
    }
}
