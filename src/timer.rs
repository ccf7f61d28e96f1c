//! Countdown timer for one task
//!
//! Pure state; every query takes the current instant so the UI loop owns the
//! clock and tests can drive it directly.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Countdown {
    budget: Duration,
    /// Elapsed time of the current round banked at the last pause
    banked: Duration,
    running_since: Option<Instant>,
    /// Full rounds finished before the current one
    finished_rounds: Duration,
}

impl Countdown {
    /// Start a running countdown of `budget`.
    pub fn start(budget: Duration, now: Instant) -> Self {
        Self {
            budget,
            banked: Duration::ZERO,
            running_since: Some(now),
            finished_rounds: Duration::ZERO,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Elapsed time in the current round, capped at the budget.
    pub fn round_elapsed(&self, now: Instant) -> Duration {
        let running = self
            .running_since
            .map(|since| now.saturating_duration_since(since))
            .unwrap_or_default();
        (self.banked + running).min(self.budget)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.budget.saturating_sub(self.round_elapsed(now))
    }

    pub fn timed_out(&self, now: Instant) -> bool {
        self.round_elapsed(now) >= self.budget
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.running_since.is_some() && !self.timed_out(now)
    }

    /// Time to record against the task: all finished rounds plus this one.
    pub fn total_elapsed(&self, now: Instant) -> Duration {
        self.finished_rounds + self.round_elapsed(now)
    }

    pub fn pause(&mut self, now: Instant) {
        if self.running_since.is_some() {
            self.banked = self.round_elapsed(now);
            self.running_since = None;
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if self.running_since.is_none() && !self.timed_out(now) {
            self.running_since = Some(now);
        }
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.running_since.is_some() {
            self.pause(now);
        } else {
            self.resume(now);
        }
    }

    /// Start another round once the current one ran out. Returns false if the
    /// round is still in progress.
    pub fn extend(&mut self, now: Instant) -> bool {
        if !self.timed_out(now) {
            return false;
        }
        self.finished_rounds += self.budget;
        self.banked = Duration::ZERO;
        self.running_since = Some(now);
        true
    }
}

/// `MM:SS`, or `H:MM:SS` past the hour.
pub fn format_clock(value: Duration) -> String {
    let secs = value.as_secs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
