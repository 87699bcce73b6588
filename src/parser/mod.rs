//! Event model and event log loading.
//!
//! This module handles:
//! - The typed runtime event vocabulary
//! - Decoding JSON event logs into ordered event sequences

pub mod event;
pub mod event_log;

// Re-export main types
pub use event::{Event, EventRef, EventType, Frame};
pub use event_log::{load_events, parse_events};
