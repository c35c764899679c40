use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Inclusive range the stimulus delay is drawn from, whole milliseconds.
    pub delay_range_ms: (u64, u64),
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            delay_range_ms: (2000, 6000),
        }
    }
}

impl ControllerConfig {
    pub fn with_delay_range_ms(min_ms: u64, max_ms: u64) -> Self {
        Self {
            delay_range_ms: (min_ms, max_ms),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min_ms, max_ms) = self.delay_range_ms;
        if min_ms > max_ms {
            return Err(ConfigError::InvertedDelayRange { min_ms, max_ms });
        }
        Ok(())
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.delay_range_ms.1)
    }
}
