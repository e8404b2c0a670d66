use super::{Beat, BeatKind, Chart};

/// Speed increment applied each time the chart is exhausted without a miss.
pub const SPEED_STEP: f64 = 0.1;

/// Derives the active chart for the current loop iteration by compressing
/// the base chart's timing.
///
/// The scaler owns the immutable base chart and every derived chart is
/// computed from it directly. Scaling a previously-scaled chart would
/// compound rounding error across loop iterations, so that path does not
/// exist here.
#[derive(Debug, Clone)]
pub struct SpeedScaler {
    base: Chart,
}

impl SpeedScaler {
    pub fn new(base: Chart) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Chart {
        &self.base
    }

    /// Build the chart for `multiplier`, dividing every timestamp and hold
    /// duration. A multiplier of 1.0 reproduces the base chart.
    pub fn chart_for(&self, multiplier: f64) -> Chart {
        self.base
            .iter()
            .map(|beat| scale_beat(beat, multiplier))
            .collect()
    }
}

fn scale_beat(beat: &Beat, multiplier: f64) -> Beat {
    let kind = match beat.kind {
        BeatKind::Tap => BeatKind::Tap,
        BeatKind::Hold { duration } => BeatKind::Hold {
            duration: duration / multiplier,
        },
    };
    Beat {
        timestamp: beat.timestamp / multiplier,
        kind,
    }
}
