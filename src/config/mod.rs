use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Tolerance pair for one input kind. Accuracy at or below `perfect` scores
/// Perfect, at or below `good` scores Good, anything beyond is a Miss.
/// Boundaries are inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToleranceWindows {
    pub perfect: f64,
    pub good: f64,
}

impl ToleranceWindows {
    /// Default tap windows: 150ms perfect, 250ms good.
    pub fn tap() -> Self {
        Self {
            perfect: 0.15,
            good: 0.25,
        }
    }

    /// Hold-duration windows are looser than tap windows, the same way
    /// long-note release windows are wider than press windows.
    pub fn hold() -> Self {
        Self {
            perfect: 0.20,
            good: 0.35,
        }
    }
}

/// Session configuration: timing windows, scoring values, and the bonus
/// period parameters. Tolerances are configurable per chart/difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Tap accuracy windows in seconds.
    pub tap_windows: ToleranceWindows,
    /// Hold-duration accuracy windows in seconds.
    pub hold_windows: ToleranceWindows,
    /// Points for a Perfect judgment (also the per-beat bonus during a
    /// double-points period).
    pub perfect_points: u64,
    /// Points for a Good judgment.
    pub good_points: u64,
    /// Beats timestamped before this many seconds never feed the bonus
    /// tracker; the double-points machinery stays dormant in the opening
    /// segment of a chart.
    pub warm_up: f64,
    /// Perfect streak length required to arm the first bonus period.
    pub initial_bonus_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tap_windows: ToleranceWindows::tap(),
            hold_windows: ToleranceWindows::hold(),
            perfect_points: 100,
            good_points: 50,
            warm_up: 5.0,
            initial_bonus_threshold: 5,
        }
    }
}

impl GameConfig {
    /// Load configuration from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from_file().unwrap_or_default()
    }

    fn load_from_file() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "beatmatch", "beatmatch") {
            Ok(proj_dirs.config_dir().join("config.json"))
        } else {
            Ok(PathBuf::from(".beatmatch-config.json"))
        }
    }
}
