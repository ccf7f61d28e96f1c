//! A session living through external edits and timer results.

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

use cove::session::{Session, SessionState};
use cove::task::TaskState;

fn minutes(value: u64) -> Duration {
    Duration::from_secs(value * 60)
}

fn edit_externally(path: &Path, contents: &str, skew_secs: u64) {
    fs::write(path, contents).expect("write");
    let file = File::options().write(true).open(path).expect("open");
    file.set_modified(SystemTime::now() + Duration::from_secs(skew_secs))
        .expect("set mtime");
}

fn descriptions(session: &Session) -> Vec<String> {
    session
        .tasks()
        .iter()
        .map(|task| task.description.clone())
        .collect()
}

#[test]
fn full_day_with_concurrent_editing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todo.md");
    fs::write(&path, "# Monday\n- [ ] Buy milk\n- [ ] Write report ***\n- [ ] Call Bob\n")
        .expect("write");

    let mut session = Session::open(&path).expect("open");
    assert_eq!(session.state(), SessionState::Active);

    // Time on the report, then finish it
    session.record(1, minutes(9), false).expect("record");
    session.record(1, minutes(4), true).expect("record");
    assert_eq!(
        descriptions(&session),
        vec!["Buy milk", "Call Bob", "Write report"]
    );
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "# Monday\n- [ ] Buy milk\n- [x] Write report *** (took 13m)\n- [ ] Call Bob\n"
    );
    assert!(!session.poll_changes());

    // The user adds a task at the top in their editor
    edit_externally(
        &path,
        "# Monday\n- [ ] Stand-up notes\n- [ ] Buy milk\n- [x] Write report *** (took 13m)\n- [ ] Call Bob\n",
        30,
    );
    assert!(session.poll_changes());
    session.reload().expect("reload");
    assert_eq!(
        descriptions(&session),
        vec!["Stand-up notes", "Buy milk", "Call Bob", "Write report"]
    );

    // Timer on "Call Bob" now addresses line 5
    let bob = session
        .tasks()
        .iter()
        .position(|task| task.description == "Call Bob")
        .expect("bob");
    session.record(bob, minutes(2), true).expect("record");
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "# Monday\n- [ ] Stand-up notes\n- [ ] Buy milk\n- [x] Write report *** (took 13m)\n- [x] Call Bob (took 2m)\n"
    );
    assert_eq!(session.open_count(), 2);
    assert_eq!(session.done_count(), 2);
}

#[test]
fn edit_during_timer_is_reconciled_at_record_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todo.md");
    fs::write(&path, "- [ ] First\n- [ ] Second\n").expect("write");
    let mut session = Session::open(&path).expect("open");

    // Timer running on "Second" (index 1) while the file gains a line
    edit_externally(&path, "- [ ] First\n- [ ] Inserted\n- [ ] Second\n", 30);
    session.record(1, minutes(6), false).expect("record");

    let text = fs::read_to_string(&path).expect("read");
    assert_eq!(text, "- [ ] First\n- [ ] Inserted\n- [ ] Second (took 6m)\n");
    assert_eq!(session.tasks().len(), 3);
    let second = session
        .tasks()
        .iter()
        .find(|task| task.description == "Second")
        .expect("second");
    assert_eq!(second.state, TaskState::Open);
    assert_eq!(second.line_number, 3);
}

#[test]
fn document_removed_under_the_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todo.md");
    fs::write(&path, "- [ ] a\n").expect("write");
    let mut session = Session::open(&path).expect("open");

    fs::remove_file(&path).expect("remove");
    let err = session.record(0, minutes(1), true).expect_err("no document");
    assert!(err.is_recoverable());
    assert!(session.tasks()[0].is_done());

    // Once the file is back, a reload picks up its content
    edit_externally(&path, "- [ ] a\n- [ ] b\n", 60);
    assert!(session.poll_changes());
    session.reload().expect("reload");
    assert_eq!(session.tasks().len(), 2);
    assert_eq!(session.done_count(), 1);
}

#[test]
fn time_logged_in_earlier_runs_is_added_to() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todo.md");
    fs::write(&path, "- [ ] Call Bob (took 5m)\n").expect("write");

    let mut session = Session::open(&path).expect("open");
    assert_eq!(session.tasks()[0].total_time(), minutes(5));
    session.record(0, minutes(3), false).expect("record");
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "- [ ] Call Bob (took 8m)\n"
    );

    // A reload after our own write must not count the 3m twice
    edit_externally(&path, "- [ ] Call Bob (took 8m)\n- [ ] Other\n", 30);
    assert!(session.poll_changes());
    session.reload().expect("reload");
    session.record(0, minutes(1), false).expect("record");
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "- [ ] Call Bob (took 9m)\n- [ ] Other\n"
    );
}

#[test]
fn retiming_a_finished_task_keeps_its_total() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("todo.md");
    fs::write(&path, "- [ ] Write report\n").expect("write");

    let mut session = Session::open(&path).expect("open");
    session.record(0, minutes(13), true).expect("record");

    edit_externally(&path, "- [x] Write report (took 13m)\n", 30);
    assert!(session.poll_changes());
    session.reload().expect("reload");
    assert_eq!(session.tasks()[0].total_time(), minutes(13));

    session.record(0, minutes(2), false).expect("record");
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "- [x] Write report (took 15m)\n"
    );
}
