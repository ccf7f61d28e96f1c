//! Task records
//!
//! A [`Task`] is one checklist item read from the document. Records carry no
//! identity of their own: every parse builds fresh ones, and the
//! reconciliation engine moves progress (time spent, done state) from the
//! previous generation onto the new one.
//!
//! Time comes in two parts. `recorded` is what the document's `(took Nm)`
//! annotation said when the line was parsed; `time_spent` is what this
//! process has timed on top of it. The annotation written back is their sum.

use std::fmt;
use std::time::Duration;

/// Estimate used when a task line carries no star hint.
pub const DEFAULT_ESTIMATE: Duration = Duration::from_secs(20 * 60);

/// Minutes contributed by each `*` in a task line.
pub const MINUTES_PER_STAR: u64 = 5;

/// Completion state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    #[default]
    Open,
    Done,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Open => "open",
            TaskState::Done => "done",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One checklist item and the progress tracked against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Display text with star hints stripped
    pub description: String,
    pub state: TaskState,
    /// Time timed in this process; only ever grows
    pub time_spent: Duration,
    /// Time already logged in the line's `(took Nm)` annotation at parse time
    pub recorded: Duration,
    pub estimated_time: Duration,
    /// Raw source line at parse time, without its terminator
    pub original_line: String,
    /// 1-based line in the document at the last parse, 0 when unattached
    pub line_number: usize,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            state: TaskState::Open,
            time_spent: Duration::ZERO,
            recorded: Duration::ZERO,
            estimated_time: DEFAULT_ESTIMATE,
            original_line: String::new(),
            line_number: 0,
        }
    }

    pub fn with_estimate(description: impl Into<String>, estimated_minutes: u64) -> Self {
        Self {
            estimated_time: Duration::from_secs(estimated_minutes * 60),
            ..Self::new(description)
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == TaskState::Done
    }

    pub fn mark_done(&mut self) {
        self.state = TaskState::Done;
    }

    pub fn add_time(&mut self, duration: Duration) {
        self.time_spent += duration;
    }

    /// Everything logged against the task: the document's annotation plus
    /// time timed since.
    pub fn total_time(&self) -> Duration {
        self.recorded + self.time_spent
    }

    /// Whole minutes of `total_time`, truncated.
    pub fn minutes_logged(&self) -> u64 {
        self.total_time().as_secs() / 60
    }

    /// Number of stars that encode the estimate, if it differs from the default.
    pub fn star_count(&self) -> Option<usize> {
        if self.estimated_time == DEFAULT_ESTIMATE {
            return None;
        }
        Some((self.estimated_time.as_secs() / 60 / MINUTES_PER_STAR) as usize)
    }
}

/// Stable partition: open tasks first, then done tasks, each group keeping
/// its relative order.
pub fn partition_open_first(tasks: Vec<Task>) -> Vec<Task> {
    let (open, done): (Vec<Task>, Vec<Task>) = tasks.into_iter().partition(|task| !task.is_done());
    let mut sorted = open;
    sorted.extend(done);
    sorted
}
