use std::collections::VecDeque;
use std::time::Duration;

/// Summary of recent frame intervals.
///
/// The display only updates once per frame, so `average_frame_time_ns` bounds
/// how precisely stimulus onset can be timed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub samples: usize,
    pub average_frame_time_ns: f64,
    pub jitter_ns: f64,
    pub min_frame_time_ns: f64,
    pub max_frame_time_ns: f64,
    pub effective_fps: f64,
}

/// Rolling window of frame intervals
#[derive(Debug, Clone)]
pub struct FrameTimes {
    frame_times: VecDeque<Duration>,
    max_samples: usize,
}

impl FrameTimes {
    pub fn new(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
        }
    }

    pub fn record(&mut self, d: Duration) {
        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(d);
    }

    pub fn stats(&self) -> FrameStats {
        if self.frame_times.is_empty() {
            return FrameStats::default();
        }
        let times: Vec<f64> = self
            .frame_times
            .iter()
            .map(|d| d.as_nanos() as f64)
            .collect();
        let n = times.len() as f64;
        let avg = times.iter().sum::<f64>() / n;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / n;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        FrameStats {
            samples: times.len(),
            average_frame_time_ns: avg,
            jitter_ns: var.sqrt(),
            min_frame_time_ns: min,
            max_frame_time_ns: max,
            effective_fps: if avg > 0.0 { 1e9 / avg } else { 0.0 },
        }
    }
}

impl Default for FrameTimes {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_reports_zeroes() {
        assert_eq!(FrameTimes::default().stats(), FrameStats::default());
    }

    #[test]
    fn stats_over_window() {
        let mut frames = FrameTimes::new(4);
        for ms in [10, 20, 10, 20] {
            frames.record(Duration::from_millis(ms));
        }
        let stats = frames.stats();
        assert_eq!(stats.samples, 4);
        assert!((stats.average_frame_time_ns - 15e6).abs() < 1e-3);
        assert!((stats.jitter_ns - 5e6).abs() < 1e-3);
        assert_eq!(stats.min_frame_time_ns, 10e6);
        assert_eq!(stats.max_frame_time_ns, 20e6);
        assert!((stats.effective_fps - 1e9 / 15e6).abs() < 1e-9);
    }

    #[test]
    fn window_evicts_oldest() {
        let mut frames = FrameTimes::new(2);
        frames.record(Duration::from_millis(100));
        frames.record(Duration::from_millis(10));
        frames.record(Duration::from_millis(10));
        assert_eq!(frames.stats().samples, 2);
        assert_eq!(frames.stats().max_frame_time_ns, 10e6);
    }
}
