use std::fs;

use cove::config::{config_path_for, Config, WatchMode};
use cove::error::Error;

#[test]
fn config_next_to_document_is_used() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let document = dir.path().join("todo.md");
    fs::write(
        config_path_for(&document),
        r#"
[watch]
mode = "poll"
poll_interval_ms = 750
debounce_ms = 50

[ui]
event_poll_ms = 250
"#,
    )?;

    let config = Config::load_for_document(&document)?;
    assert_eq!(config.watch.mode, WatchMode::Poll);
    assert_eq!(config.watch.poll_interval_ms, 750);
    assert_eq!(config.watch.debounce_ms, 50);
    assert_eq!(config.ui.event_poll_ms, 250);
    assert!(config.ui.show_hints);
    Ok(())
}

#[test]
fn broken_config_is_reported_not_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let document = dir.path().join("todo.md");
    fs::write(config_path_for(&document), "[watch\nmode = \"poll\"\n").expect("write");

    let err = Config::load_for_document(&document).expect_err("parse error");
    assert!(matches!(err, Error::TomlParse(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn unknown_sections_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[theme]\naccent = \"pink\"\n").expect("write");

    let config = Config::load(&path).expect("load");
    assert_eq!(config.watch.mode, WatchMode::Notify);
}
