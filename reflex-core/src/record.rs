use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::StimulusVariant;

/// Local-time rendering of [`TrialRecord::timestamp`], second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Recorded result of one completed, non dry-run trial.
///
/// Serialized field order is `timestamp`, `reactionTimeMs`, `stimulusLabel`,
/// `ignored`. Sub-second timestamp information is dropped on the wire.
///
/// The timestamp is written as local wall time without an offset. A time that
/// occurs twice when daylight saving ends decodes to the earlier of the two
/// instants, so records stamped in the repeated hour come back one hour early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    #[serde(with = "local_seconds")]
    timestamp: DateTime<Local>,
    #[serde(rename = "reactionTimeMs")]
    reaction_time_ms: f64,
    #[serde(rename = "stimulusLabel")]
    stimulus: StimulusVariant,
    ignored: bool,
}

impl TrialRecord {
    /// Negative reaction times are clamped to zero.
    pub fn new(timestamp: DateTime<Local>, reaction_time_ms: f64, stimulus: StimulusVariant) -> Self {
        Self {
            timestamp,
            reaction_time_ms: reaction_time_ms.max(0.0),
            stimulus,
            ignored: false,
        }
    }

    /// When the stimulus appeared.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn reaction_time_ms(&self) -> f64 {
        self.reaction_time_ms
    }

    pub fn stimulus_label(&self) -> &'static str {
        self.stimulus.label()
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Flags the record as excluded from export. Returns false if it already was.
    pub fn mark_ignored(&mut self) -> bool {
        !std::mem::replace(&mut self.ignored, true)
    }

    /// Copy with the timestamp cut to whole seconds, the precision that survives export.
    pub fn truncated_to_seconds(&self) -> Self {
        let timestamp = self.timestamp.with_nanosecond(0).unwrap_or(self.timestamp);
        Self {
            timestamp,
            ..self.clone()
        }
    }
}

mod local_seconds {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(d)?;
        let naive =
            NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(de::Error::custom)?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| de::Error::custom(format!("nonexistent local time: {raw}")))
    }
}
