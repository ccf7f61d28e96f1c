//! Checklist document codec
//!
//! Reads markdown-style checklists (`- [ ] task`, `- [x] done`) into
//! [`Task`] records and writes progress back in place. Only lines that were
//! parsed as tasks are ever rewritten; every other line, and every line
//! terminator, passes through untouched.
//!
//! A `*` run inside a description is an estimate hint: each star is five
//! minutes. On write-back the stars are regenerated from the estimate and the
//! time logged is appended as ` (took Nm)`. Reading the line again moves
//! that annotation out of the description and into [`Task::recorded`], so
//! the next write-back keeps adding to the same total.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::task::{Task, TaskState, MINUTES_PER_STAR};

fn task_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*-\s+\[(.)\]\s+(.+)$").expect("valid regex"))
}

fn star_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*+").expect("valid regex"))
}

fn took_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\s*\(took \d+m\))+$").expect("valid regex"))
}

fn took_minutes_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(took (\d+)m\)").expect("valid regex"))
}

/// Sum of every `(took Nm)` in `annotations`.
fn recorded_time(annotations: &str) -> Duration {
    let minutes = took_minutes_regex()
        .captures_iter(annotations)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .fold(0u64, u64::saturating_add);
    Duration::from_secs(minutes.saturating_mul(60))
}

/// Split text into `(content, terminator)` pairs, keeping `\r\n`, `\n` or
/// nothing (for a final unterminated line).
fn split_lines(text: &str) -> Vec<(&str, &str)> {
    text.split_inclusive('\n')
        .map(|piece| {
            if let Some(content) = piece.strip_suffix("\r\n") {
                (content, "\r\n")
            } else if let Some(content) = piece.strip_suffix('\n') {
                (content, "\n")
            } else {
                (piece, "")
            }
        })
        .collect()
}

/// Parse a single line. Returns `None` for non-task lines.
///
/// The returned task has its `original_line` set but no line number.
pub fn parse_line(line: &str) -> Option<Task> {
    let captures = task_line_regex().captures(line)?;
    let checkbox = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let text = captures.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    let (description, recorded) = match took_regex().find(text) {
        Some(took) if took.start() > 0 => {
            (text[..took.start()].trim_end(), recorded_time(took.as_str()))
        }
        _ => (text, Duration::ZERO),
    };

    let mut task = match star_regex().find(description) {
        Some(stars) => {
            let estimate = stars.as_str().len() as u64 * MINUTES_PER_STAR;
            let cleaned = star_regex().replace_all(description, "");
            Task::with_estimate(cleaned.trim(), estimate)
        }
        None => Task::new(description),
    };

    if checkbox == "x" {
        task.state = TaskState::Done;
    }
    task.recorded = recorded;
    task.original_line = line.to_string();
    Some(task)
}

/// Parse every task line of a document, numbering lines from 1.
pub fn parse(text: &str) -> Vec<Task> {
    split_lines(text)
        .into_iter()
        .enumerate()
        .filter_map(|(idx, (content, _))| {
            let mut task = parse_line(content)?;
            task.line_number = idx + 1;
            Some(task)
        })
        .collect()
}

/// Canonical text of a task line, indented like its original line.
pub fn format_task_line(task: &Task) -> String {
    let indent: String = task
        .original_line
        .chars()
        .take_while(|ch| ch.is_whitespace())
        .collect();
    let checkbox = if task.is_done() { "x" } else { " " };

    let stars = match task.star_count() {
        Some(count) if count > 0 => format!(" {}", "*".repeat(count)),
        _ => String::new(),
    };

    let minutes = task.minutes_logged();
    let took = if minutes > 0 {
        format!(" (took {minutes}m)")
    } else {
        String::new()
    };

    format!("{indent}- [{checkbox}] {}{stars}{took}", task.description)
}

/// Whether writing `task` back would not change what its original line says.
fn is_unchanged(task: &Task) -> bool {
    match parse_line(&task.original_line) {
        Some(original) => {
            original.description == task.description
                && original.state == task.state
                && original.estimated_time == task.estimated_time
                && original.minutes_logged() == task.minutes_logged()
        }
        None => false,
    }
}

/// Write `tasks` into `original`, replacing the lines they were parsed from.
///
/// Tasks whose line number is 0 or past the end of the document are skipped.
/// `render(text, &parse(text)) == text` holds for any text.
pub fn render(original: &str, tasks: &[Task]) -> String {
    let mut lines: Vec<(String, &str)> = split_lines(original)
        .into_iter()
        .map(|(content, terminator)| (content.to_string(), terminator))
        .collect();

    for task in tasks {
        if task.line_number == 0 || task.line_number > lines.len() {
            continue;
        }
        if is_unchanged(task) {
            lines[task.line_number - 1].0 = task.original_line.clone();
            continue;
        }
        lines[task.line_number - 1].0 = format_task_line(task);
    }

    let mut out = String::with_capacity(original.len());
    for (content, terminator) in lines {
        out.push_str(&content);
        out.push_str(terminator);
    }
    out
}

/// Read the whole document.
pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            Error::DocumentNotFound(path.to_path_buf())
        } else {
            Error::DocumentUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Read and parse the document.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let text = read_document(path)?;
    Ok(parse(&text))
}

/// Render `tasks` over the document's current content and rewrite it.
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let write_failed = |source: io::Error| Error::WriteFailed {
        path: path.to_path_buf(),
        source,
    };
    let original = fs::read_to_string(path).map_err(write_failed)?;
    let rendered = render(&original, tasks);
    write_atomic(path, rendered.as_bytes()).map_err(write_failed)
}

/// Replace `path` with `data` via a temp file in the same directory + rename,
/// so readers never see a partial document.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp.as_file().set_permissions(metadata.permissions())?;
    }
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
