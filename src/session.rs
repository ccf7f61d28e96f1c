//! Session controller
//!
//! Owns the authoritative task list for one document. All mutation goes
//! through here, from a single thread: reloads after external edits, timer
//! results recorded against a task, and write-back.
//!
//! ```text
//! Idle --open--> Loading --> Active --change--> Loading --> Active
//!                                   --record--> (write-back) Active
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::document;
use crate::error::{Error, Result};
use crate::reconcile::reconcile;
use crate::task::{partition_open_first, Task};
use crate::watch::ChangeDetector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Active,
}

/// What a reload did, for the status line and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSummary {
    pub previous: usize,
    pub current: usize,
}

pub struct Session {
    path: PathBuf,
    tasks: Vec<Task>,
    state: SessionState,
    detector: ChangeDetector,
}

impl Session {
    /// A session with no tasks loaded yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            detector: ChangeDetector::new(&path),
            path,
            tasks: Vec::new(),
            state: SessionState::Idle,
        }
    }

    /// Open and load the document. Fails if it cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut session = Self::new(path);
        session.state = SessionState::Loading;
        let seen = session.detector.snapshot();
        let tasks = document::read_tasks(&session.path)?;
        session.detector.mark_seen(seen);
        session.tasks = partition_open_first(tasks);
        session.state = SessionState::Active;
        tracing::info!(
            path = %session.path.display(),
            tasks = session.tasks.len(),
            "opened document"
        );
        Ok(session)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn open_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_done()).count()
    }

    pub fn done_count(&self) -> usize {
        self.tasks.len() - self.open_count()
    }

    /// Consume a pending on-disk change, if there is one.
    pub fn poll_changes(&mut self) -> bool {
        self.detector.poll()
    }

    /// Enter Loading so the front end can show progress before `reload`.
    pub fn begin_reload(&mut self) {
        self.state = SessionState::Loading;
    }

    /// Re-read the document and reconcile it with the tasks in memory.
    ///
    /// On a read failure the current tasks stay as they are and the session
    /// returns to Active; the error is handed back for reporting.
    pub fn reload(&mut self) -> Result<ReloadSummary> {
        self.state = SessionState::Loading;
        let seen = self.detector.snapshot();
        let result = document::read_tasks(&self.path);
        self.state = SessionState::Active;

        let parsed = match result {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "reload failed");
                return Err(err);
            }
        };
        self.detector.mark_seen(seen);

        let previous = self.tasks.len();
        let merged = reconcile(&self.tasks, parsed);
        self.tasks = partition_open_first(merged);
        tracing::info!(previous, current = self.tasks.len(), "reloaded document");
        Ok(ReloadSummary {
            previous,
            current: self.tasks.len(),
        })
    }

    /// Record a timer result against the task at `index` and write back.
    ///
    /// The mutation always lands in memory. If the document changed on disk
    /// since it was last read, it is reconciled first so the write addresses
    /// current line numbers. A failed write is returned but the in-memory
    /// state is kept; the next reload absorbs whatever is on disk.
    pub fn record(&mut self, index: usize, elapsed: Duration, mark_done: bool) -> Result<()> {
        let task = self
            .tasks
            .get_mut(index)
            .ok_or(Error::InvalidTaskIndex(index))?;
        if !elapsed.is_zero() {
            task.add_time(elapsed);
        }
        if mark_done {
            task.mark_done();
        }
        tracing::debug!(
            task = %task.description,
            elapsed_secs = elapsed.as_secs(),
            done = task.is_done(),
            "recorded timer result"
        );

        if self.detector.has_changed() {
            if let Err(err) = self.reload() {
                tracing::warn!(error = %err, "could not reconcile before write-back");
            }
        }

        let written = self.write();
        self.tasks = partition_open_first(std::mem::take(&mut self.tasks));
        written
    }

    /// Write the current tasks back into the document.
    pub fn write(&mut self) -> Result<()> {
        match document::write_tasks(&self.path, &self.tasks) {
            Ok(()) => {
                self.detector.acknowledge();
                tracing::debug!(path = %self.path.display(), "wrote document");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "write-back failed");
                Err(err)
            }
        }
    }
}
