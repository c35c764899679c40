pub mod clock;
pub mod frame;
pub mod schedule;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use frame::{FrameStats, FrameTimes};
pub use schedule::{ScheduledTask, TaskState};
