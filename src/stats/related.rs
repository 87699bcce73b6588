//! Goroutines causally related to a given one through unblock edges.

use crate::parser::{Event, EventType};
use crate::utils::config::{GC_GOROUTINE_ID, RELATED_DEPTH};
use log::debug;
use std::collections::BTreeSet;

/// Find goroutines related to `goid`
///
/// **Public** - used to narrow a trace view down to one goroutine
///
/// Breadth-first search over "X unblocked Y" edges, walked backwards from
/// `goid` for `RELATED_DEPTH` rounds. The result always holds `goid` and
/// the GC pseudo goroutine 0.
pub fn related_goroutines(events: &[Event], goid: u64) -> BTreeSet<u64> {
    let mut related = BTreeSet::from([goid]);

    let untargeted = events
        .iter()
        .filter(|ev| ev.kind == EventType::GoUnblock && ev.unblock_target().is_none())
        .count();
    if untargeted > 0 {
        debug!("Skipping {} unblock events without a target", untargeted);
    }

    for round in 0..RELATED_DEPTH {
        let found: Vec<u64> = events
            .iter()
            .filter(|ev| ev.unblock_target().is_some_and(|t| related.contains(&t)))
            .map(|ev| ev.g)
            .collect();

        related.extend(found);
        debug!("Related goroutines after round {}: {}", round + 1, related.len());
    }

    related.insert(GC_GOROUTINE_ID);
    related
}
