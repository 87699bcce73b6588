//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::parser::EventType;
use thiserror::Error;

/// Errors that can occur while loading an event log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read event log: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid event log format: {0}")]
    InvalidFormat(String),
}

/// Data-integrity faults detected during the statistics pass.
///
/// The event vocabulary is trusted, so any of these means the log is
/// inconsistent and the analysis is aborted rather than producing skewed
/// numbers. `Clone` lets a memoized failure be handed to every caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{kind} event at ts={ts} references unknown goroutine {goroutine}")]
    UnknownGoroutine {
        goroutine: u64,
        ts: i64,
        kind: EventType,
    },

    #[error("{kind} event at ts={ts} references goroutine {goroutine} after it ended")]
    GoroutineFinalized {
        goroutine: u64,
        ts: i64,
        kind: EventType,
    },

    #[error("goroutine {goroutine} stopped running at ts={ts} ({kind}) without being started")]
    NotRunning {
        goroutine: u64,
        ts: i64,
        kind: EventType,
    },

    #[error("{kind} event at ts={ts} made goroutine {goroutine} runnable while it was running")]
    RunnableWhileRunning {
        goroutine: u64,
        ts: i64,
        kind: EventType,
    },

    #[error("goroutine {goroutine} started at ts={ts} ({kind}) while already running")]
    AlreadyRunning {
        goroutine: u64,
        ts: i64,
        kind: EventType,
    },

    #[error("goroutine {goroutine} unblocked at ts={ts} while in a syscall")]
    UnblockDuringSyscall { goroutine: u64, ts: i64 },

    #[error("{kind} event at ts={ts} is missing argument slot {slot}")]
    MissingArgument {
        kind: EventType,
        ts: i64,
        slot: usize,
    },

    #[error("user region event at ts={ts} has unknown mode {mode}")]
    InvalidRegionMode { ts: i64, mode: u64 },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
