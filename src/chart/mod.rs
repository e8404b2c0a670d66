mod beat;
mod error;
mod loader;
mod scaler;

pub use beat::{Beat, BeatKind, Chart};
pub use error::ChartError;
pub use loader::ChartLoader;
pub use scaler::{SPEED_STEP, SpeedScaler};
