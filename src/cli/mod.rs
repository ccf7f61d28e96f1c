//! Command-line interface for cove
//!
//! One command: open a checklist document in the interactive timer, or print
//! its tasks with `--list`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, WatchMode};
use crate::error::Result;
use crate::session::Session;

mod list;

/// cove - time-box the tasks in a markdown checklist
///
/// Pick a `- [ ]` line, run a countdown sized by its stars (one star is five
/// minutes, none means twenty), and have the time written back to the file.
#[derive(Parser, Debug)]
#[command(name = "cove")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Markdown document holding the checklist
    pub file: PathBuf,

    /// Config file (defaults to .cove.toml next to the document)
    #[arg(long, env = "COVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Detect changes by polling instead of file notifications
    #[arg(long)]
    pub poll: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "COVE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the tasks and exit
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    /// Execute the command
    pub fn run(self) -> Result<()> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_for_document(&self.file)?,
        };
        if self.poll {
            config.watch.mode = WatchMode::Poll;
        }

        let session = Session::open(&self.file)?;
        if self.list {
            return list::run(&session);
        }
        crate::ui::run(session, &config)
    }
}
