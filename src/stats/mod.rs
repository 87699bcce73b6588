//! Goroutine execution statistics.
//!
//! This module turns an ordered event log into:
//! - Per-goroutine time accumulators (execution, waits, blocks, GC)
//! - Per-goroutine user region intervals with their own stats
//! - Sets of goroutines related through unblock edges

pub mod engine;
pub mod entry;
pub mod goroutine;
pub mod related;
pub mod session;

// Re-export main types and functions
pub use engine::{goroutine_stats, GoroutineStats};
pub use entry::{ExecutionStat, StatCategory, StatEntry};
pub use goroutine::{Clock, GoState, GoroutineRecord, RegionRecord};
pub use related::related_goroutines;
pub use session::AnalysisSession;
