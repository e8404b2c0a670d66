mod feedback;
mod time;

pub use feedback::{FeedbackSink, NullFeedback};
pub use time::{MockClock, PlaybackClock};
