use std::time::Duration;

use crate::task::Task;

pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// `[x]` done, `[*]` started, `[ ]` untouched.
pub fn checkbox_label(task: &Task) -> &'static str {
    if task.is_done() {
        "[x]"
    } else if !task.total_time().is_zero() {
        "[*]"
    } else {
        "[ ]"
    }
}

pub fn format_minutes(value: Duration) -> String {
    let minutes = value.as_secs() / 60;
    if minutes >= 60 {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

/// Right-hand column of a list row: time logged, else the estimate.
pub fn time_label(task: &Task) -> String {
    if task.total_time().is_zero() {
        format!("est {}", format_minutes(task.estimated_time))
    } else {
        format!(
            "{} / {}",
            format_minutes(task.total_time()),
            format_minutes(task.estimated_time)
        )
    }
}

/// Keep the cursor on the same task across a reload, matched by description,
/// else clamp the old position into range.
pub fn select_by_description(
    tasks: &[Task],
    previous: Option<&str>,
    fallback: Option<usize>,
) -> Option<usize> {
    if tasks.is_empty() {
        return None;
    }
    if let Some(description) = previous {
        if let Some(pos) = tasks.iter().position(|task| task.description == description) {
            return Some(pos);
        }
    }
    Some(fallback.unwrap_or(0).min(tasks.len() - 1))
}

pub fn list_window(total: usize, selected: Option<usize>, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let selected = selected.unwrap_or(0);
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

pub fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}
