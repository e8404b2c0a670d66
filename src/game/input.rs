/// A discrete input delivered by the input collaborator, consumed exactly
/// once by the judge. Times share the playback clock's domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Tap at playback time `time` (seconds).
    Tap { time: f64 },
    /// Completed long press of `duration` seconds.
    Hold { duration: f64 },
}

/// Captures a long press as a start/end timestamp pair on the input side.
///
/// The core only ever sees the resulting duration, delivered as one atomic
/// `InputEvent` at release; there is no partial-progress stream and the
/// judge never reads a live clock. A press that is cancelled (session ends
/// mid-hold) is discarded without being judged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldRecorder {
    started_at: Option<f64>,
}

impl HoldRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the press timestamp. A second press before release restarts
    /// the measurement.
    pub fn press(&mut self, at: f64) {
        self.started_at = Some(at);
    }

    /// Complete the measurement, yielding the event to judge. Returns `None`
    /// when no press is in flight or the timestamps are inverted.
    pub fn release(&mut self, at: f64) -> Option<InputEvent> {
        let started = self.started_at.take()?;
        let duration = at - started;
        if duration <= 0.0 {
            return None;
        }
        Some(InputEvent::Hold { duration })
    }

    /// Drop an in-flight measurement without judging it.
    pub fn cancel(&mut self) {
        self.started_at = None;
    }

    pub fn is_holding(&self) -> bool {
        self.started_at.is_some()
    }
}
