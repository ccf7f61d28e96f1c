//! Reconciliation driven through the document parser, the way a reload does it.

use std::time::Duration;

use cove::document;
use cove::reconcile::reconcile;
use cove::task::{partition_open_first, TaskState};

fn minutes(value: u64) -> Duration {
    Duration::from_secs(value * 60)
}

#[test]
fn progress_survives_lines_inserted_above() {
    let mut old = document::parse("- [ ] Buy milk\n- [ ] Call Bob\n");
    old[0].add_time(minutes(12));
    old[1].add_time(minutes(5));

    let new = document::parse("# Errands\n\n- [ ] Buy milk\n- [ ] Call Bob\n");
    let merged = reconcile(&old, new);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].line_number, 3);
    assert_eq!(merged[0].time_spent, minutes(12));
    assert_eq!(merged[1].line_number, 4);
    assert_eq!(merged[1].time_spent, minutes(5));
}

#[test]
fn reordered_tasks_keep_their_own_time() {
    let mut old = document::parse("- [ ] Alpha\n- [ ] Beta\n- [ ] Gamma\n");
    old[0].add_time(minutes(1));
    old[1].add_time(minutes(2));
    old[2].add_time(minutes(3));

    let merged = reconcile(&old, document::parse("- [ ] Gamma\n- [ ] Alpha\n- [ ] Beta\n"));
    let spent: Vec<(&str, Duration)> = merged
        .iter()
        .map(|task| (task.description.as_str(), task.time_spent))
        .collect();
    assert_eq!(
        spent,
        vec![("Gamma", minutes(3)), ("Alpha", minutes(1)), ("Beta", minutes(2))]
    );
}

#[test]
fn unticking_by_hand_does_not_reopen() {
    let mut old = document::parse("- [ ] Write report *\n");
    old[0].mark_done();

    let merged = reconcile(&old, document::parse("- [ ] Write report *\n"));
    assert_eq!(merged[0].state, TaskState::Done);
    assert_eq!(merged[0].estimated_time, minutes(5));
}

#[test]
fn ticking_in_the_file_wins() {
    let mut old = document::parse("- [ ] Write report\n");
    old[0].add_time(minutes(8));

    let merged = reconcile(&old, document::parse("- [x] Write report\n"));
    assert_eq!(merged[0].state, TaskState::Done);
    // Done in the new parse: nothing is carried onto it
    assert_eq!(merged[0].time_spent, Duration::ZERO);
}

#[test]
fn rewritten_text_falls_back_to_position() {
    let mut old = document::parse("- [ ] Task A\n- [ ] Task B\n");
    old[0].add_time(minutes(10));

    let merged = reconcile(&old, document::parse("- [ ] Something else entirely\n"));
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].time_spent, minutes(10));
}

#[test]
fn deleted_tasks_are_dropped_and_new_ones_start_clean() {
    let mut old = document::parse("- [ ] Keep me\n- [ ] Remove me\n");
    old[0].add_time(minutes(4));

    let merged = reconcile(&old, document::parse("- [ ] Keep me\n"));
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].description, "Keep me");
    assert_eq!(merged[0].time_spent, minutes(4));
}

#[test]
fn reconciled_list_renders_back_in_place() {
    let original = "# Plan\n- [ ] Buy milk\nnotes\n  - [ ] Call Bob **\n";
    let mut old = document::parse(original);
    old[1].add_time(minutes(7));

    let merged = partition_open_first(reconcile(&old, document::parse(original)));
    assert_eq!(
        document::render(original, &merged),
        "# Plan\n- [ ] Buy milk\nnotes\n  - [ ] Call Bob ** (took 7m)\n"
    );
}
