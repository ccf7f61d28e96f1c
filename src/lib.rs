//! cove - a task timer over a markdown checklist
//!
//! The document stays the source of truth. cove parses its `- [ ]` lines into
//! tasks, times them, and writes progress back in place, leaving every other
//! line untouched. When the file is edited externally while cove runs, the
//! reconciliation engine carries accumulated time and completion onto the
//! re-parsed tasks.
//!
//! # Module Organization
//!
//! - `task`: The task record and the open-before-done ordering
//! - `matcher`: Fuzzy description matching
//! - `reconcile`: Three-pass merge of old progress into a re-parsed list
//! - `document`: Parsing and rendering task lines, atomic write-back
//! - `session`: The single owner of task state for one document
//! - `watch`: Change detection (file notifications or polling)
//! - `timer`: The countdown behind a timer session
//! - `ui`: Terminal selector and timer screens
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.cove.toml`
//! - `error`: Error types and result aliases

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod matcher;
pub mod reconcile;
pub mod session;
pub mod task;
pub mod timer;
pub mod ui;
pub mod watch;

pub use error::{Error, Result};
