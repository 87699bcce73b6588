//! Runtime trace event vocabulary.
//!
//! Events arrive already parsed and ordered by timestamp. The engine
//! only reads them; nothing here reorders or validates a log.

use crate::utils::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a runtime trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    GoCreate,
    GoStart,
    GoStartLabel,
    GoEnd,
    GoStop,
    GoBlockSend,
    GoBlockRecv,
    GoBlockSelect,
    GoBlockSync,
    GoBlockCond,
    GoSleep,
    GoBlock,
    GoBlockNet,
    GoBlockGc,
    GoUnblock,
    GoSched,
    GoPreempt,
    GoSysBlock,
    GoSysExit,
    GcSweepStart,
    GcSweepDone,
    GcStart,
    GcDone,
    UserRegion,
    /// Any event the statistics pass has no use for (proc, heap, task...)
    #[serde(other)]
    Other,
}

impl EventType {
    /// Wire name of the event kind
    pub fn name(self) -> &'static str {
        match self {
            Self::GoCreate => "go-create",
            Self::GoStart => "go-start",
            Self::GoStartLabel => "go-start-label",
            Self::GoEnd => "go-end",
            Self::GoStop => "go-stop",
            Self::GoBlockSend => "go-block-send",
            Self::GoBlockRecv => "go-block-recv",
            Self::GoBlockSelect => "go-block-select",
            Self::GoBlockSync => "go-block-sync",
            Self::GoBlockCond => "go-block-cond",
            Self::GoSleep => "go-sleep",
            Self::GoBlock => "go-block",
            Self::GoBlockNet => "go-block-net",
            Self::GoBlockGc => "go-block-gc",
            Self::GoUnblock => "go-unblock",
            Self::GoSched => "go-sched",
            Self::GoPreempt => "go-preempt",
            Self::GoSysBlock => "go-sys-block",
            Self::GoSysExit => "go-sys-exit",
            Self::GcSweepStart => "gc-sweep-start",
            Self::GcSweepDone => "gc-sweep-done",
            Self::GcStart => "gc-start",
            Self::GcDone => "gc-done",
            Self::UserRegion => "user-region",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One frame of a captured call stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub pc: u64,

    #[serde(rename = "fn", alias = "func", default)]
    pub func: String,
}

impl Frame {
    pub fn new(pc: u64, func: impl Into<String>) -> Self {
        Self {
            pc,
            func: func.into(),
        }
    }
}

/// A single runtime trace event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventType,

    /// Nanosecond timestamp
    pub ts: i64,

    /// Goroutine the event was emitted on
    #[serde(default)]
    pub g: u64,

    #[serde(default)]
    pub args: Vec<u64>,

    #[serde(default)]
    pub sargs: Vec<String>,

    /// Call stack, outermost frame first
    #[serde(default, alias = "stk")]
    pub stack: Vec<Frame>,
}

impl Event {
    pub fn new(kind: EventType, ts: i64, g: u64) -> Self {
        Self {
            kind,
            ts,
            g,
            args: Vec::new(),
            sargs: Vec::new(),
            stack: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: &[u64]) -> Self {
        self.args = args.to_vec();
        self
    }

    pub fn with_sargs(mut self, sargs: &[&str]) -> Self {
        self.sargs = sargs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_stack(mut self, stack: Vec<Frame>) -> Self {
        self.stack = stack;
        self
    }

    /// Integer argument in `slot`, or a `MissingArgument` error
    pub fn arg(&self, slot: usize) -> Result<u64, EngineError> {
        self.args
            .get(slot)
            .copied()
            .ok_or(EngineError::MissingArgument {
                kind: self.kind,
                ts: self.ts,
                slot,
            })
    }

    /// String argument in `slot`, or a `MissingArgument` error
    pub fn sarg(&self, slot: usize) -> Result<&str, EngineError> {
        self.sargs
            .get(slot)
            .map(String::as_str)
            .ok_or(EngineError::MissingArgument {
                kind: self.kind,
                ts: self.ts,
                slot,
            })
    }

    /// Goroutine made runnable by an unblock event
    pub fn unblock_target(&self) -> Option<u64> {
        match self.kind {
            EventType::GoUnblock => self.args.first().copied(),
            _ => None,
        }
    }

    pub fn top_frame(&self) -> Option<&Frame> {
        self.stack.first()
    }
}

/// Copyable handle to an event in the log it was read from.
///
/// `seq` is the event's position in the slice handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRef {
    pub seq: usize,
    pub ts: i64,
    pub kind: EventType,
}

impl EventRef {
    pub fn new(seq: usize, event: &Event) -> Self {
        Self {
            seq,
            ts: event.ts,
            kind: event.kind,
        }
    }

    /// Look the referenced event back up in its log
    pub fn resolve<'a>(&self, events: &'a [Event]) -> Option<&'a Event> {
        events.get(self.seq)
    }
}
