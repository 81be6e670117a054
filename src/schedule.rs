//! Wall-clock schedule for recurring mode.
//!
//! Two cadences run side by side, a primary one and a slower backup. Each
//! is a `DueTracker`; the daemon polls them once per poll interval on its
//! single thread. A tick that overruns simply delays the next poll.

use chrono::{DateTime, Duration, Utc};

/// Next due time of one fixed-interval job.
#[derive(Debug, Clone, PartialEq)]
pub struct DueTracker {
    interval: Duration,
    next_due: DateTime<Utc>,
}

impl DueTracker {
    /// First due one full interval after `start`.
    pub fn starting_at(start: DateTime<Utc>, interval: Duration) -> Self {
        Self {
            interval,
            next_due: start + interval,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.next_due
    }

    /// Reschedules relative to when the run finished, so a slow tick never
    /// causes a burst of catch-up runs.
    pub fn mark_run(&mut self, finished: DateTime<Utc>) {
        self.next_due = finished + self.interval;
    }

    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_due
    }
}

/// The primary and backup trackers together.
#[derive(Debug, Clone)]
pub struct Schedule {
    trackers: Vec<DueTracker>,
}

impl Schedule {
    pub fn new(start: DateTime<Utc>, intervals: &[Duration]) -> Self {
        Self {
            trackers: intervals
                .iter()
                .map(|&interval| DueTracker::starting_at(start, interval))
                .collect(),
        }
    }

    /// True when at least one tracker is due.
    ///
    /// Both trackers coincide on the hour; a single tick serves both then.
    pub fn any_due(&self, now: DateTime<Utc>) -> bool {
        self.trackers.iter().any(|t| t.is_due(now))
    }

    /// Reschedules every tracker that was due at `started`.
    pub fn mark_run(&mut self, started: DateTime<Utc>, finished: DateTime<Utc>) {
        for tracker in self.trackers.iter_mut().filter(|t| t.is_due(started)) {
            tracker.mark_run(finished);
        }
    }

    /// Earliest upcoming due time.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.trackers.iter().map(DueTracker::next_due).min()
    }
}
