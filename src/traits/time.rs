/// Abstraction over the audio playback clock.
///
/// The clock is owned by the audio collaborator and polled, never driven:
/// the core reads it once per tick and once per tap judgment. Within one
/// Playing session it must be monotonically non-decreasing; it may reset to
/// zero exactly at restart boundaries.
pub trait PlaybackClock {
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;

    /// Whether playback has reached the end of the track.
    fn is_finished(&self) -> bool;
}

/// Scripted clock for deterministic testing.
pub struct MockClock {
    time: std::cell::Cell<f64>,
    finished: std::cell::Cell<bool>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            time: std::cell::Cell::new(0.0),
            finished: std::cell::Cell::new(false),
        }
    }

    pub fn set_time(&self, seconds: f64) {
        self.time.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.time.set(self.time.get() + seconds);
    }

    pub fn finish(&self) {
        self.finished.set(true);
    }

    pub fn reset(&self) {
        self.time.set(0.0);
        self.finished.set(false);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackClock for MockClock {
    fn current_time(&self) -> f64 {
        self.time.get()
    }

    fn is_finished(&self) -> bool {
        self.finished.get()
    }
}
