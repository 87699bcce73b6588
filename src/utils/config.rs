//! Configuration and constants for the CLI and the analysis engine.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Number of unblock hops followed when looking for related goroutines
pub const RELATED_DEPTH: usize = 2;

/// Pseudo goroutine that owns process-wide events (GC, sweeps on system threads)
pub const GC_GOROUTINE_ID: u64 = 0;

// Field names that may hold the event array when the log is wrapped in an object
pub const EVENT_FIELD_NAMES: &[&str] = &["events", "trace", "result"];

// Group listing limits for `analyze --top`
pub const DEFAULT_TOP_GROUPS: usize = 20;
pub const MAX_TOP_GROUPS: usize = 10_000;
