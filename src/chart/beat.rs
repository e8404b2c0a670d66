use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// What the player has to do when a beat arrives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BeatKind {
    /// Single tap at the beat's timestamp.
    Tap,
    /// Press held for `duration` seconds.
    Hold { duration: f64 },
}

impl BeatKind {
    pub fn is_tap(&self) -> bool {
        matches!(self, Self::Tap)
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, Self::Hold { .. })
    }
}

/// A single scheduled event the player must match.
///
/// Timestamps are seconds from playback start, in the same clock domain as
/// the playback clock collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub timestamp: f64,
    pub kind: BeatKind,
}

impl Beat {
    pub fn tap(timestamp: f64) -> Self {
        Self {
            timestamp,
            kind: BeatKind::Tap,
        }
    }

    pub fn hold(timestamp: f64, duration: f64) -> Self {
        Self {
            timestamp,
            kind: BeatKind::Hold { duration },
        }
    }
}

/// Ordered sequence of beats, insertion order = play order.
///
/// The judge consumes matched beats from the front; the chart is never
/// reordered and duplicate timestamps are kept as separate beats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    beats: VecDeque<Beat>,
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_beats(beats: impl IntoIterator<Item = Beat>) -> Self {
        Self {
            beats: beats.into_iter().collect(),
        }
    }

    pub fn head(&self) -> Option<&Beat> {
        self.beats.front()
    }

    /// Consume the head beat after a successful tap judgment.
    pub fn pop_head(&mut self) -> Option<Beat> {
        self.beats.pop_front()
    }

    /// Remove and return the earliest remaining hold beat, leaving any tap
    /// beats ahead of it in place for their own judgments.
    pub fn take_first_hold(&mut self) -> Option<Beat> {
        let idx = self.beats.iter().position(|b| b.kind.is_hold())?;
        self.beats.remove(idx)
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Beat> {
        self.beats.iter()
    }
}

impl FromIterator<Beat> for Chart {
    fn from_iter<I: IntoIterator<Item = Beat>>(iter: I) -> Self {
        Self::from_beats(iter)
    }
}
