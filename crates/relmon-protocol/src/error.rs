//! Protocol and session errors.

use relmon_core::{InvariantViolation, StoreError};
use std::io;
use thiserror::Error;

/// A line that does not form a valid command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} expects {expected} argument(s), got {found}")]
    WrongArity {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("name exceeds {max} bytes: {name}")]
    NameTooLong { name: String, max: usize },
}

/// Errors that end a session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("line {line}: {source}")]
    Protocol {
        line: usize,
        #[source]
        source: ProtocolError,
    },

    #[error("invariant violated after line {line}: {source}")]
    Invariant {
        line: usize,
        #[source]
        source: InvariantViolation,
    },

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
