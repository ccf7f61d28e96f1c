//! Error types for cove
//!
//! Exit codes:
//! - 0: Success
//! - 1: Operation failed (document missing or unreadable, terminal failure)
//! - 2: User error (bad config)
//!
//! Only startup errors reach the exit path. Once the interactive session is
//! running, write-back and watch failures are reported on the status line and
//! the session keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the cove binary
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const OPERATION_FAILED: i32 = 1;
    pub const USER_ERROR: i32 = 2;
}

/// Main error type for cove operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // Operation failures (exit code 1)
    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    DocumentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No task at position {0}")]
    InvalidTaskIndex(usize),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidConfig(_) | Error::TomlParse(_) | Error::TomlSerialize(_) => {
                exit_codes::USER_ERROR
            }

            Error::DocumentNotFound(_)
            | Error::DocumentUnreadable { .. }
            | Error::WriteFailed { .. }
            | Error::InvalidTaskIndex(_)
            | Error::Watch(_)
            | Error::Io(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Whether the interactive session can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::WriteFailed { .. } | Error::Watch(_) | Error::InvalidTaskIndex(_)
        )
    }
}

/// Result type alias for cove operations
pub type Result<T> = std::result::Result<T, Error>;
