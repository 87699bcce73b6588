//! Compute-once access to the statistics of one event log.
//!
//! Several callers (CLI subcommands, a viewer) may ask for the same
//! statistics. The first caller runs the engine; concurrent first callers
//! block on the same `OnceLock` and everyone sees one shared result.

use super::engine::{goroutine_stats, GoroutineStats};
use super::related::related_goroutines;
use crate::parser::Event;
use crate::utils::error::EngineError;
use log::info;
use std::collections::BTreeSet;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// An event log together with its lazily computed goroutine statistics
#[derive(Debug)]
pub struct AnalysisSession {
    events: Arc<Vec<Event>>,
    stats: OnceLock<Result<Arc<GoroutineStats>, EngineError>>,
}

impl AnalysisSession {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: Arc::new(events),
            stats: OnceLock::new(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Goroutine statistics, computed on first use
    pub fn goroutine_stats(&self) -> Result<Arc<GoroutineStats>, EngineError> {
        self.stats
            .get_or_init(|| {
                let started = Instant::now();
                let stats = goroutine_stats(&self.events).map(Arc::new);
                info!(
                    "Analyzed {} events in {:.2}s",
                    self.events.len(),
                    started.elapsed().as_secs_f64()
                );
                stats
            })
            .clone()
    }

    pub fn related_goroutines(&self, goid: u64) -> BTreeSet<u64> {
        related_goroutines(&self.events, goid)
    }
}
