//! Goroutine Stats
//!
//! Per-goroutine execution statistics for Go runtime traces.
//!
//! The engine walks an ordered event log once and attributes every
//! goroutine's lifetime to execution, scheduler wait, network wait,
//! synchronization block, syscall block and GC time, with the same
//! breakdown for each user region the goroutine executed.
//!
//! This crate provides the core implementation for the
//! `gostats` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install goroutine-stats
//! gostats analyze --input trace.json --summary
//! ```

pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod stats;
pub mod utils;
