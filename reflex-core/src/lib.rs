pub mod phase;
pub mod record;
pub mod stimulus;

pub use phase::{TrialMode, TrialPhase};
pub use record::{TIMESTAMP_FORMAT, TrialRecord};
pub use stimulus::{STIMULI, StimulusVariant};
