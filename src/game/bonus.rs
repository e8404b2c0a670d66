use tracing::debug;

use super::Judgment;

/// Double-points streak tracker layered on top of judgment outcomes.
///
/// A run of `bonus_threshold` consecutive Perfects arms a bonus period; each
/// judged beat after that awards its point value a second time until
/// `bonus_threshold` bonus beats have been granted. The period then ends and
/// the threshold grows by one, so every later period takes a longer streak to
/// earn and pays out one beat more.
///
/// Goods are asymmetric on purpose: inside a running period they count and
/// pay bonus, but they never build toward starting one. Outside a period a
/// Good resets the streak.
///
/// Beats timestamped before the warm-up threshold are invisible to the
/// tracker; double points cannot trigger in the opening segment of a chart.
#[derive(Debug, Clone)]
pub struct ComboBonusTracker {
    consecutive_perfects: u32,
    bonus_beats_awarded: u32,
    bonus_threshold: u32,
    bonus_active: bool,
    initial_threshold: u32,
    warm_up: f64,
    perfect_points: u64,
    good_points: u64,
}

impl ComboBonusTracker {
    pub fn new(initial_threshold: u32, warm_up: f64, perfect_points: u64, good_points: u64) -> Self {
        Self {
            consecutive_perfects: 0,
            bonus_beats_awarded: 0,
            bonus_threshold: initial_threshold.max(1),
            bonus_active: false,
            initial_threshold: initial_threshold.max(1),
            warm_up,
            perfect_points,
            good_points,
        }
    }

    /// Feed one non-miss judgment for the beat at `beat_timestamp`.
    /// Returns the bonus points to add on top of the base award (0 if the
    /// bonus is not running).
    pub fn observe(&mut self, judgment: Judgment, beat_timestamp: f64) -> u64 {
        match judgment {
            Judgment::Perfect => self.on_perfect(beat_timestamp),
            Judgment::Good => self.on_good(beat_timestamp),
            Judgment::Miss => 0,
        }
    }

    pub fn on_perfect(&mut self, beat_timestamp: f64) -> u64 {
        if beat_timestamp < self.warm_up {
            return 0;
        }

        self.consecutive_perfects += 1;

        // The streak arms the period when it reaches the threshold; the
        // perfects after that are the ones that pay double.
        if self.consecutive_perfects > self.bonus_threshold
            && self.bonus_beats_awarded < self.bonus_threshold
        {
            self.award(self.perfect_points)
        } else {
            0
        }
    }

    pub fn on_good(&mut self, beat_timestamp: f64) -> u64 {
        if beat_timestamp < self.warm_up {
            return 0;
        }

        if self.bonus_active {
            self.award(self.good_points)
        } else {
            // A Good outside a running period ends any building streak and
            // never starts a period itself.
            self.consecutive_perfects = 0;
            0
        }
    }

    fn award(&mut self, points: u64) -> u64 {
        self.bonus_active = true;
        self.bonus_beats_awarded += 1;

        if self.bonus_beats_awarded >= self.bonus_threshold {
            let finished = self.bonus_threshold;
            self.bonus_active = false;
            self.bonus_beats_awarded = 0;
            self.consecutive_perfects = 0;
            self.bonus_threshold += 1;
            debug!(
                finished_threshold = finished,
                next_threshold = self.bonus_threshold,
                "bonus period complete"
            );
        }

        points
    }

    /// Whether a double-points period is currently running (drives the
    /// "DOUBLE POINTS" indicator).
    pub fn bonus_active(&self) -> bool {
        self.bonus_active
    }

    pub fn consecutive_perfects(&self) -> u32 {
        self.consecutive_perfects
    }

    pub fn bonus_threshold(&self) -> u32 {
        self.bonus_threshold
    }

    /// Back to the initial threshold with all counters zeroed; used on
    /// session restart.
    pub fn reset(&mut self) {
        self.consecutive_perfects = 0;
        self.bonus_beats_awarded = 0;
        self.bonus_threshold = self.initial_threshold;
        self.bonus_active = false;
    }
}
