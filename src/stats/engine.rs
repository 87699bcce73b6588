//! Single-pass goroutine statistics engine.
//!
//! Walks an ordered event log once, driving each goroutine's state
//! machine and attributing GC windows to every goroutine alive during
//! them. Goroutines still alive when the log ends are finalized at the
//! last event's timestamp.

use super::goroutine::{Clock, GoState, GoroutineRecord};
use crate::parser::{Event, EventRef, EventType};
use crate::utils::error::EngineError;
use log::{debug, warn};
use std::collections::HashMap;

/// Finalized records keyed by goroutine id
pub type GoroutineStats = HashMap<u64, GoroutineRecord>;

/// Compute execution statistics for every goroutine in the log
///
/// **Public** - main entry point of the engine
///
/// # Arguments
/// * `events` - Event log, sorted by timestamp (not re-checked)
///
/// # Returns
/// Every goroutine created in the log, finalized, with regions sorted by
/// start time
///
/// # Errors
/// Any `EngineError` on inconsistent input; the pass stops at the first
/// offending event.
pub fn goroutine_stats(events: &[Event]) -> Result<GoroutineStats, EngineError> {
    debug!("Computing goroutine statistics over {} events", events.len());

    let mut engine = StatsEngine::default();
    for (seq, ev) in events.iter().enumerate() {
        engine.process(seq, ev)?;
    }

    let stats = engine.finish();
    debug!("Finalized {} goroutines", stats.len());
    Ok(stats)
}

#[derive(Default)]
struct StatsEngine {
    goroutines: GoroutineStats,
    clock: Clock,
}

impl StatsEngine {
    fn process(&mut self, seq: usize, ev: &Event) -> Result<(), EngineError> {
        self.clock.now = ev.ts;
        let here = EventRef::new(seq, ev);
        let clock = self.clock;

        match ev.kind {
            EventType::GoCreate => self.create(ev, here)?,

            EventType::GoStart | EventType::GoStartLabel => {
                self.goroutine(ev.g, ev)?.start_running(ev)?
            }

            EventType::GoEnd | EventType::GoStop => {
                let g = self.goroutine(ev.g, ev)?;
                if g.is_finalized() {
                    return Err(EngineError::GoroutineFinalized {
                        goroutine: ev.g,
                        ts: ev.ts,
                        kind: ev.kind,
                    });
                }
                g.finalize(clock, Some(here));
            }

            EventType::GoBlockSend
            | EventType::GoBlockRecv
            | EventType::GoBlockSelect
            | EventType::GoBlockSync
            | EventType::GoBlockCond => self.block(ev, GoState::BlockedOnSync(ev.ts))?,
            EventType::GoSched | EventType::GoPreempt => {
                self.block(ev, GoState::Runnable(ev.ts))?
            }
            EventType::GoSleep | EventType::GoBlock => self.block(ev, GoState::Blocked)?,
            EventType::GoBlockNet => self.block(ev, GoState::BlockedOnNet(ev.ts))?,
            EventType::GoBlockGc => self.block(ev, GoState::BlockedOnGc(ev.ts))?,
            EventType::GoSysBlock => self.block(ev, GoState::BlockedOnSyscall(ev.ts))?,

            EventType::GoUnblock => {
                let target = ev.arg(0)?;
                self.goroutine(target, ev)?.unblock(ev)?
            }
            EventType::GoSysExit => self.goroutine(ev.g, ev)?.exit_syscall(ev)?,

            EventType::GcSweepStart => match self.goroutines.get_mut(&ev.g) {
                Some(g) => g.begin_sweep(ev.ts),
                None => debug!("Sweep at ts={} on untracked goroutine {}", ev.ts, ev.g),
            },
            EventType::GcSweepDone => {
                if let Some(g) = self.goroutines.get_mut(&ev.g) {
                    g.end_sweep(ev.ts);
                }
            }

            EventType::GcStart => self.clock.gc_window_start = Some(ev.ts),
            EventType::GcDone => {
                for g in self.goroutines.values_mut() {
                    g.charge_gc(clock);
                }
                self.clock.gc_window_start = None;
            }

            EventType::UserRegion => {
                let g = self.goroutine(ev.g, ev)?;
                match ev.arg(1)? {
                    0 => g.open_region(ev, here, clock)?,
                    1 => g.close_region(ev, here, clock)?,
                    mode => return Err(EngineError::InvalidRegionMode { ts: ev.ts, mode }),
                }
            }

            EventType::Other => {}
        }

        Ok(())
    }

    /// go-create: `args[0]` is the new goroutine
    fn create(&mut self, ev: &Event, here: EventRef) -> Result<(), EngineError> {
        let id = ev.arg(0)?;
        let mut g = GoroutineRecord::new(id, ev.ts);

        // The new goroutine runs on behalf of its creator's current task.
        let inherited = self
            .goroutines
            .get(&ev.g)
            .and_then(GoroutineRecord::active_region)
            .map(|r| r.task_id)
            .filter(|task| *task != 0);
        if let Some(task_id) = inherited {
            g.inherit_task(task_id, here);
        }

        if self.goroutines.insert(id, g).is_some() {
            warn!("Goroutine {} created again at ts={}, dropping earlier record", id, ev.ts);
        }
        Ok(())
    }

    fn block(&mut self, ev: &Event, next: GoState) -> Result<(), EngineError> {
        self.goroutine(ev.g, ev)?.stop_running(ev, next)
    }

    fn goroutine(&mut self, id: u64, ev: &Event) -> Result<&mut GoroutineRecord, EngineError> {
        self.goroutines
            .get_mut(&id)
            .ok_or(EngineError::UnknownGoroutine {
                goroutine: id,
                ts: ev.ts,
                kind: ev.kind,
            })
    }

    /// Finalize whatever is still alive and order each region list
    fn finish(mut self) -> GoroutineStats {
        let clock = self.clock;
        for g in self.goroutines.values_mut() {
            if !g.is_finalized() {
                g.finalize(clock, None);
            }
            g.sort_regions();
        }
        self.goroutines
    }
}
