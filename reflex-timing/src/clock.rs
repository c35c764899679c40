use chrono::{DateTime, Local};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic timestamps (for measuring) and wall-clock time (for records)
pub trait Clock: Clone + Send + Sync {
    /// Nanoseconds since the clock was created. Never goes backwards.
    fn now(&self) -> u64;

    fn wall_time(&self) -> DateTime<Local>;

    fn elapsed(&self, since: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(since))
    }
}

/// Clock backed by [`Instant`] and the system's local time.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn wall_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Hand-driven clock for deterministic tests and replays.
///
/// Clones share the same time source, so a test can keep one handle and give
/// another to the code under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
    origin: DateTime<Local>,
}

impl ManualClock {
    pub fn new(origin: DateTime<Local>) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(0)),
            origin,
        }
    }

    pub fn advance(&self, d: Duration) {
        let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }

    fn wall_time(&self) -> DateTime<Local> {
        self.origin + chrono::Duration::nanoseconds(self.now() as i64)
    }
}
