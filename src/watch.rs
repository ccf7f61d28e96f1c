//! Change detection for the checklist document
//!
//! Signal sources (a notify watcher or a fixed-interval poll) run on their own
//! thread and only send [`WatchSignal::Check`] pings. The event loop confirms
//! each ping with a [`ChangeDetector`], which compares the document's
//! modification time against the last one observed. The session acknowledges
//! its own write-back right after writing, so it never signals itself.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::{WatchConfig, WatchMode};
use crate::error::Error;

/// Messages from a signal source to the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    /// The document may have changed
    Check,
    /// The source failed; detection continues by polling
    Error(String),
}

/// Edge detector over the document's modification time
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    path: PathBuf,
    last_seen: Option<SystemTime>,
}

impl ChangeDetector {
    /// Start from the document's current modification time.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_seen = modified_time(&path);
        Self { path, last_seen }
    }

    /// Whether the document changed since the last observation, without
    /// consuming the change.
    pub fn has_changed(&self) -> bool {
        match modified_time(&self.path) {
            Some(current) => self.last_seen != Some(current),
            None => false,
        }
    }

    /// Consume a pending change. Returns true once per modification.
    pub fn poll(&mut self) -> bool {
        let Some(current) = modified_time(&self.path) else {
            return false;
        };
        if self.last_seen == Some(current) {
            return false;
        }
        self.last_seen = Some(current);
        true
    }

    /// Record the current modification time as seen (after our own write).
    pub fn acknowledge(&mut self) {
        self.last_seen = modified_time(&self.path);
    }

    /// The document's modification time right now. Take it before reading
    /// and hand it to [`ChangeDetector::mark_seen`] afterwards, so an edit
    /// landing mid-read still shows up as a change.
    pub fn snapshot(&self) -> Option<SystemTime> {
        modified_time(&self.path)
    }

    pub fn mark_seen(&mut self, snapshot: Option<SystemTime>) {
        self.last_seen = snapshot;
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

/// Start the configured signal source for `path`.
pub fn spawn_watch(path: PathBuf, config: &WatchConfig, tx: Sender<WatchSignal>) {
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    match config.mode {
        WatchMode::Poll => {
            thread::spawn(move || poll_loop(poll_interval, tx));
        }
        WatchMode::Notify => {
            let debounce = Duration::from_millis(config.debounce_ms);
            thread::spawn(move || notify_loop(path, debounce, poll_interval, tx));
        }
    }
}

fn poll_loop(interval: Duration, tx: Sender<WatchSignal>) {
    loop {
        thread::sleep(interval);
        if tx.send(WatchSignal::Check).is_err() {
            break;
        }
    }
}

fn notify_loop(path: PathBuf, debounce: Duration, poll_interval: Duration, tx: Sender<WatchSignal>) {
    // Watch the directory: atomic saves replace the file and would orphan a
    // watch on the file itself.
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().map(|name| name.to_os_string());

    let (event_tx, event_rx) = mpsc::channel();
    let watcher: notify::Result<RecommendedWatcher> = notify::recommended_watcher(move |res| {
        let _ = event_tx.send(res);
    });
    let mut watcher = match watcher {
        Ok(watcher) => watcher,
        Err(err) => {
            fall_back_to_polling(err, poll_interval, tx);
            return;
        }
    };
    if let Err(err) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        fall_back_to_polling(err, poll_interval, tx);
        return;
    }
    tracing::debug!(dir = %dir.display(), "watching document directory");

    let mut pending: Option<Instant> = None;
    loop {
        let timeout = pending
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::from_secs(3600));
        match event_rx.recv_timeout(timeout) {
            Ok(Ok(event)) => {
                if matches!(event.kind, EventKind::Access(_)) {
                    continue;
                }
                let touches_document = event
                    .paths
                    .iter()
                    .any(|candidate| candidate.file_name().map(|n| n.to_os_string()) == file_name);
                if touches_document {
                    pending = Some(Instant::now() + debounce);
                }
            }
            Ok(Err(err)) => {
                let err = Error::Watch(err);
                tracing::warn!(error = %err, "watch event error");
                if tx.send(WatchSignal::Error(err.to_string())).is_err() {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if pending.take().is_some() && tx.send(WatchSignal::Check).is_err() {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn fall_back_to_polling(err: notify::Error, interval: Duration, tx: Sender<WatchSignal>) {
    let err = Error::Watch(err);
    tracing::warn!(error = %err, "file notifications unavailable, polling instead");
    if tx.send(WatchSignal::Error(err.to_string())).is_err() {
        return;
    }
    poll_loop(interval, tx);
}
