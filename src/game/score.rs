/// Accumulated session score.
///
/// Strictly additive: a miss ends the session instead of subtracting points,
/// so no negative path exists. Changing that would change game balance, not
/// fix a bug.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreLedger {
    total: u64,
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, delta: u64) {
        self.total += delta;
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }

    pub fn current(&self) -> u64 {
        self.total
    }
}
