use std::io::{self, Write};

use crate::error::Result;
use crate::session::Session;
use crate::task::Task;
use crate::ui::model;

pub fn run(session: &Session) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for task in session.tasks() {
        writeln!(out, "{}", format_row(task))?;
    }
    if session.tasks().is_empty() {
        writeln!(out, "no tasks")?;
    }
    Ok(())
}

fn format_row(task: &Task) -> String {
    let checkbox = model::checkbox_label(task);
    if task.total_time().is_zero() {
        format!(
            "{checkbox} {} (est {})",
            task.description,
            model::format_minutes(task.estimated_time)
        )
    } else {
        format!(
            "{checkbox} {} (est {}, spent {})",
            task.description,
            model::format_minutes(task.estimated_time),
            model::format_minutes(task.total_time())
        )
    }
}
