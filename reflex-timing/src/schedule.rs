use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Fired,
    Cancelled,
}

/// A one-shot deferred task polled against a [`Clock`](crate::Clock).
///
/// The task fires at most once: the first `poll` at or after `due_at` returns
/// true, every later call returns false. A cancelled task never fires.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    armed_at: u64,
    due_at: u64,
    state: TaskState,
}

impl ScheduledTask {
    /// Delays beyond the `u64` nanosecond range never come due.
    pub fn new(now: u64, delay: Duration) -> Self {
        let delay_ns = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
        Self {
            armed_at: now,
            due_at: now.saturating_add(delay_ns),
            state: TaskState::Pending,
        }
    }

    /// Returns true exactly once, when the task becomes due.
    pub fn poll(&mut self, now: u64) -> bool {
        if self.state == TaskState::Pending && now >= self.due_at {
            self.state = TaskState::Fired;
            true
        } else {
            false
        }
    }

    /// Returns true if the task was still pending.
    pub fn cancel(&mut self) -> bool {
        if self.state == TaskState::Pending {
            self.state = TaskState::Cancelled;
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == TaskState::Pending
    }

    pub fn armed_at(&self) -> u64 {
        self.armed_at
    }

    pub fn delay(&self) -> Duration {
        Duration::from_nanos(self.due_at - self.armed_at)
    }

    pub fn remaining(&self, now: u64) -> Duration {
        Duration::from_nanos(self.due_at.saturating_sub(now))
    }
}
