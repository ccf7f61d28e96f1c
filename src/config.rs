//! Configuration loading and management
//!
//! Handles parsing of `.cove.toml` configuration files. A config file next to
//! the checklist applies to it; `--config` points at one explicitly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up next to the document
pub const CONFIG_FILE_NAME: &str = ".cove.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Change detection
    #[serde(default)]
    pub watch: WatchConfig,

    /// Interactive front end
    #[serde(default)]
    pub ui: UiConfig,
}

/// How external edits to the document are noticed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchMode {
    /// OS file notifications, falling back to polling if they are unavailable
    #[default]
    Notify,
    /// Fixed-interval modification time checks
    Poll,
}

/// Change detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub mode: WatchMode,

    /// Interval between checks in poll mode
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Quiet period before a burst of notifications becomes one signal
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            mode: WatchMode::default(),
            poll_interval_ms: default_poll_interval_ms(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Front end configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the event loop waits for input before redrawing
    #[serde(default = "default_event_poll_ms")]
    pub event_poll_ms: u64,

    /// Show key hints in the footer
    #[serde(default = "default_true")]
    pub show_hints: bool,
}

fn default_event_poll_ms() -> u64 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            event_poll_ms: default_event_poll_ms(),
            show_hints: true,
        }
    }
}

impl Config {
    /// Load configuration from a `.cove.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config that sits next to `document`, or return defaults.
    /// A config file that exists but does not parse is an error.
    pub fn load_for_document(document: &Path) -> Result<Self> {
        let config_path = config_path_for(document);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.watch.validate()?;
        self.ui.validate()?;
        Ok(())
    }
}

impl WatchConfig {
    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms < 100 {
            return Err(Error::InvalidConfig(
                "watch.poll_interval_ms must be >= 100".to_string(),
            ));
        }
        if self.debounce_ms > 10_000 {
            return Err(Error::InvalidConfig(
                "watch.debounce_ms must be <= 10000".to_string(),
            ));
        }
        Ok(())
    }
}

impl UiConfig {
    fn validate(&self) -> Result<()> {
        if !(10..=1000).contains(&self.event_poll_ms) {
            return Err(Error::InvalidConfig(format!(
                "ui.event_poll_ms must be between 10 and 1000 (got {})",
                self.event_poll_ms
            )));
        }
        Ok(())
    }
}

/// `.cove.toml` in the document's directory
pub fn config_path_for(document: &Path) -> PathBuf {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(CONFIG_FILE_NAME),
        _ => PathBuf::from(CONFIG_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.watch.mode, WatchMode::Notify);
        assert_eq!(cfg.watch.poll_interval_ms, 2000);
        assert_eq!(cfg.watch.debounce_ms, 200);
        assert_eq!(cfg.ui.event_poll_ms, 120);
        assert!(cfg.ui.show_hints);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
[watch]
mode = "poll"
poll_interval_ms = 500

[ui]
show_hints = false
"#,
        )
        .expect("write config");

        let cfg = Config::load(&path).expect("load");
        assert_eq!(cfg.watch.mode, WatchMode::Poll);
        assert_eq!(cfg.watch.poll_interval_ms, 500);
        assert_eq!(cfg.watch.debounce_ms, 200);
        assert!(!cfg.ui.show_hints);
        assert_eq!(cfg.ui.event_poll_ms, 120);
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[watch]\npoll_interval_ms = 5\n").expect("write config");
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));

        fs::write(&path, "[ui]\nevent_poll_ms = 0\n").expect("write config");
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));

        fs::write(&path, "[watch]\nmode = \"inotify\"\n").expect("write config");
        assert!(matches!(Config::load(&path), Err(Error::TomlParse(_))));
    }

    #[test]
    fn load_for_document_defaults_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_for_document(&dir.path().join("todo.md")).expect("load");
        assert_eq!(cfg.watch.mode, WatchMode::Notify);
    }

    #[test]
    fn config_path_for_bare_file_name() {
        assert_eq!(
            config_path_for(Path::new("todo.md")),
            PathBuf::from(CONFIG_FILE_NAME)
        );
        assert_eq!(
            config_path_for(Path::new("notes/todo.md")),
            PathBuf::from("notes").join(CONFIG_FILE_NAME)
        );
    }

    #[test]
    fn save_writes_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut cfg = Config::default();
        cfg.watch.mode = WatchMode::Poll;
        cfg.save(&path).expect("save");
        let content = fs::read_to_string(&path).expect("read");
        assert!(content.contains("mode = \"poll\""));
        let loaded = Config::load(&path).expect("load");
        assert_eq!(loaded.watch.mode, WatchMode::Poll);
    }
}
