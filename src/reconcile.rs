//! Reconciliation of re-parsed tasks against tracked tasks
//!
//! The document has no stable task identifiers, so after every external edit
//! the freshly parsed list has to be matched back to the list held in memory
//! to keep accumulated time and done state. Matching runs in three passes,
//! each looser than the last:
//!
//! 1. same line number and similar description
//! 2. similar description anywhere
//! 3. leftover old tasks paired with untouched new tasks by relative position
//!
//! Passes 2 and 3 treat a new task with zero `time_spent` as "not yet
//! matched", so a pass-1 match that carried no time can be matched again.
//!
//! Carried time keeps the `recorded` base it was timed on top of. The new
//! parse's annotation already includes any of that time cove wrote back, so
//! taking the new `recorded` as well would count it twice.

use crate::matcher::similar;
use crate::task::{Task, TaskState};

/// Match `new` against `old` and carry progress forward.
///
/// Returns `new` with `time_spent` (with its `recorded` base) and done state
/// copied from the old tasks
/// judged equivalent. Unmatched old tasks are dropped and unmatched new tasks
/// come through untouched. Never fails.
pub fn reconcile(old: &[Task], new: Vec<Task>) -> Vec<Task> {
    if old.is_empty() {
        return new;
    }

    let mut reconciled = new;
    let mut claimed = vec![false; old.len()];

    // Pass 1: tasks that stayed on their line
    for task in reconciled.iter_mut() {
        let hit = old.iter().enumerate().find(|(idx, candidate)| {
            !claimed[*idx]
                && candidate.line_number == task.line_number
                && similar(&candidate.description, &task.description)
        });
        if let Some((idx, candidate)) = hit {
            carry_forward(candidate, task);
            claimed[idx] = true;
        }
    }

    // Pass 2: tasks that moved but kept their text
    for task in reconciled.iter_mut() {
        if !task.time_spent.is_zero() {
            continue;
        }
        let hit = old.iter().enumerate().find(|(idx, candidate)| {
            !claimed[*idx] && similar(&candidate.description, &task.description)
        });
        if let Some((idx, candidate)) = hit {
            carry_forward(candidate, task);
            claimed[idx] = true;
        }
    }

    // Pass 3: positional fallback for whatever is left
    let mut cursor = 0usize;
    for (idx, candidate) in old.iter().enumerate() {
        if claimed[idx] {
            continue;
        }
        while cursor < reconciled.len() && !reconciled[cursor].time_spent.is_zero() {
            cursor += 1;
        }
        let Some(task) = reconciled.get_mut(cursor) else {
            break;
        };
        carry_forward(candidate, task);
        claimed[idx] = true;
        cursor += 1;
    }

    let carried = claimed.iter().filter(|hit| **hit).count();
    tracing::debug!(
        old = old.len(),
        new = reconciled.len(),
        carried,
        dropped = old.len() - carried,
        "reconciled tasks"
    );

    reconciled
}

/// Copy progress from `old` onto `new` unless the new parse already says done.
fn carry_forward(old: &Task, new: &mut Task) {
    if new.state != TaskState::Open {
        return;
    }
    if !old.time_spent.is_zero() {
        new.time_spent = old.time_spent;
        new.recorded = old.recorded;
    }
    if old.state == TaskState::Done {
        new.state = TaskState::Done;
    }
}
