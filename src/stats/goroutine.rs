//! Per-goroutine records and their in-progress state.
//!
//! A `GoroutineRecord` carries `Transient` state from its creation event
//! until it is finalized. Finalizing folds every open interval into the
//! permanent statistics and drops the transient part; after that the
//! record no longer changes.

use super::entry::{ExecutionStat, StatCategory};
use crate::parser::{Event, EventRef};
use crate::utils::error::EngineError;
use serde::{Deserialize, Serialize};

/// Process-wide position of the pass: the timestamp of the last processed
/// event and the start of the active GC window, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    pub now: i64,
    pub gc_window_start: Option<i64>,
}

impl Clock {
    pub fn new(now: i64, gc_window_start: Option<i64>) -> Self {
        Self {
            now,
            gc_window_start,
        }
    }
}

/// Scheduling state of a live goroutine, with the time it was entered.
///
/// The states are mutually exclusive; each tracked one maps to a single
/// time category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoState {
    /// Ready to run, waiting for a P
    Runnable(i64),
    Running(i64),
    BlockedOnSync(i64),
    BlockedOnNet(i64),
    BlockedOnSyscall(i64),
    /// Blocked on a GC assist. Not charged to any category: the GC window
    /// is already attributed to every live goroutine as GC pause.
    BlockedOnGc(i64),
    /// Sleeping or blocked on something without its own category
    Blocked,
}

impl GoState {
    /// Category and start of the interval this state accrues to
    pub fn open_interval(self) -> Option<(StatCategory, i64)> {
        match self {
            GoState::Runnable(since) => Some((StatCategory::SchedulerWait, since)),
            GoState::Running(since) => Some((StatCategory::Execution, since)),
            GoState::BlockedOnSync(since) => Some((StatCategory::SyncBlock, since)),
            GoState::BlockedOnNet(since) => Some((StatCategory::NetworkWait, since)),
            GoState::BlockedOnSyscall(since) => Some((StatCategory::SyscallBlock, since)),
            GoState::BlockedOnGc(_) | GoState::Blocked => None,
        }
    }
}

/// A user region and the goroutine's execution stats while it was open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub task_id: u64,
    pub name: String,

    /// Usually the user-region start event. A go-create event when the
    /// region only stands for a task inherited from the parent goroutine;
    /// absent when the region end had no matching start.
    pub start: Option<EventRef>,

    /// Usually the user-region end event. A go-end/go-stop event when the
    /// goroutine finished with the region still open; absent when the log
    /// ran out first.
    pub end: Option<EventRef>,

    pub stat: ExecutionStat,
}

impl RegionRecord {
    pub fn start_ts(&self) -> Option<i64> {
        self.start.map(|e| e.ts)
    }

    pub fn end_ts(&self) -> Option<i64> {
        self.end.map(|e| e.ts)
    }
}

/// State needed only while the goroutine is still being analyzed
#[derive(Debug, Clone)]
pub struct Transient {
    pub state: GoState,

    /// Sweeps run on the goroutine's own time, so this overlaps `Running`
    pub sweep_since: Option<i64>,

    /// Open regions, innermost last. Each holds the snapshot taken when it
    /// opened until it is closed.
    pub active_regions: Vec<RegionRecord>,
}

impl Transient {
    fn new(created: i64) -> Self {
        Self {
            state: GoState::Runnable(created),
            sweep_since: None,
            active_regions: Vec::new(),
        }
    }
}

/// Statistics and execution details of a single goroutine
#[derive(Debug, Clone)]
pub struct GoroutineRecord {
    pub id: u64,
    pub name: String,
    pub pc: u64,
    pub creation_time: i64,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,

    /// Closed regions, sorted by start time once the pass is over
    pub regions: Vec<RegionRecord>,

    pub stat: ExecutionStat,

    pub(crate) transient: Option<Transient>,
}

impl GoroutineRecord {
    /// New goroutine, waiting to be scheduled from its creation time
    pub fn new(id: u64, creation_time: i64) -> Self {
        Self {
            id,
            name: String::new(),
            pc: 0,
            creation_time,
            start_time: None,
            end_time: None,
            regions: Vec::new(),
            stat: ExecutionStat::default(),
            transient: Some(Transient::new(creation_time)),
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.transient.is_none()
    }

    /// Innermost open region, if the goroutine is live and inside one
    pub fn active_region(&self) -> Option<&RegionRecord> {
        self.transient
            .as_ref()
            .and_then(|t| t.active_regions.last())
    }

    /// Stats as of `clock.now`, counting every open interval as if it
    /// closed right now. Does not modify the record.
    pub fn snapshot(&self, clock: Clock) -> ExecutionStat {
        let mut ret = self.stat;

        let Some(t) = &self.transient else {
            return ret;
        };

        if let Some(gc_start) = clock.gc_window_start {
            // Goroutines created mid-GC are only charged for the overlap.
            ret.gc_time
                .add_time(clock.now - gc_start.max(self.creation_time));
        }

        if self.stat.total_time.count == 0 {
            ret.total_time.add_time(clock.now - self.creation_time);
        }

        if let Some((category, since)) = t.state.open_interval() {
            ret.entry_mut(category).add_time(clock.now - since);
        }

        if let Some(since) = t.sweep_since {
            ret.sweep_time.add_time(clock.now - since);
        }

        ret
    }

    /// Fold all pending state into permanent stats and close any open
    /// regions. `trigger` is the go-end/go-stop event, or `None` when the
    /// log ended with the goroutine still alive.
    pub fn finalize(&mut self, clock: Clock, trigger: Option<EventRef>) {
        if let Some(ev) = trigger {
            self.end_time = Some(ev.ts);
        }

        let final_stat = self.snapshot(clock);
        self.stat = final_stat;

        if let Some(t) = self.transient.take() {
            for mut region in t.active_regions {
                region.end = trigger;
                region.stat = final_stat.sub(&region.stat);
                self.regions.push(region);
            }
        }
    }

    /// Give a freshly created goroutine the task of its creator's region
    pub(crate) fn inherit_task(&mut self, task_id: u64, create: EventRef) {
        if let Some(t) = self.transient.as_mut() {
            t.active_regions.push(RegionRecord {
                task_id,
                name: String::new(),
                start: Some(create),
                end: None,
                stat: ExecutionStat::default(),
            });
        }
    }

    /// go-start / go-start-label
    pub(crate) fn start_running(&mut self, ev: &Event) -> Result<(), EngineError> {
        let t = live_state(&mut self.transient, self.id, ev)?;

        if self.pc == 0 {
            if let Some(frame) = ev.top_frame() {
                self.pc = frame.pc;
                self.name = frame.func.clone();
            }
        }
        if self.start_time.is_none() {
            self.start_time = Some(ev.ts);
        }
        match t.state {
            GoState::Running(_) => {
                return Err(EngineError::AlreadyRunning {
                    goroutine: self.id,
                    ts: ev.ts,
                    kind: ev.kind,
                })
            }
            // A start straight out of a block still ends the block.
            state => {
                if let Some((category, since)) = state.open_interval() {
                    self.stat.entry_mut(category).add_time(ev.ts - since);
                }
            }
        }
        t.state = GoState::Running(ev.ts);
        Ok(())
    }

    /// Close the running interval and move to `next`
    pub(crate) fn stop_running(&mut self, ev: &Event, next: GoState) -> Result<(), EngineError> {
        let t = live_state(&mut self.transient, self.id, ev)?;

        let GoState::Running(since) = t.state else {
            return Err(EngineError::NotRunning {
                goroutine: self.id,
                ts: ev.ts,
                kind: ev.kind,
            });
        };
        self.stat.exec_time.add_time(ev.ts - since);
        t.state = next;
        Ok(())
    }

    /// go-unblock: another goroutine made this one runnable.
    /// Closes the network or sync wait it was in, if any. A syscall block
    /// only ends with its syscall-exit.
    pub(crate) fn unblock(&mut self, ev: &Event) -> Result<(), EngineError> {
        let t = live_state(&mut self.transient, self.id, ev)?;

        match t.state {
            GoState::Running(_) => {
                return Err(EngineError::RunnableWhileRunning {
                    goroutine: self.id,
                    ts: ev.ts,
                    kind: ev.kind,
                })
            }
            GoState::BlockedOnSyscall(_) => {
                return Err(EngineError::UnblockDuringSyscall {
                    goroutine: self.id,
                    ts: ev.ts,
                })
            }
            GoState::BlockedOnNet(since) => self.stat.io_time.add_time(ev.ts - since),
            GoState::BlockedOnSync(since) => self.stat.block_time.add_time(ev.ts - since),
            // Already waiting for a P: the scheduler wait keeps running.
            GoState::Runnable(_) => return Ok(()),
            GoState::BlockedOnGc(_) | GoState::Blocked => {}
        }
        t.state = GoState::Runnable(ev.ts);
        Ok(())
    }

    /// go-sys-exit: the syscall returned and the goroutine waits for a P
    pub(crate) fn exit_syscall(&mut self, ev: &Event) -> Result<(), EngineError> {
        let t = live_state(&mut self.transient, self.id, ev)?;

        match t.state {
            GoState::Running(_) => {
                return Err(EngineError::RunnableWhileRunning {
                    goroutine: self.id,
                    ts: ev.ts,
                    kind: ev.kind,
                })
            }
            GoState::BlockedOnSyscall(since) => self.stat.syscall_time.add_time(ev.ts - since),
            GoState::Runnable(_) => return Ok(()),
            GoState::BlockedOnNet(_)
            | GoState::BlockedOnSync(_)
            | GoState::BlockedOnGc(_)
            | GoState::Blocked => {}
        }
        t.state = GoState::Runnable(ev.ts);
        Ok(())
    }

    pub(crate) fn begin_sweep(&mut self, ts: i64) {
        if let Some(t) = self.transient.as_mut() {
            t.sweep_since = Some(ts);
        }
    }

    pub(crate) fn end_sweep(&mut self, ts: i64) {
        if let Some(since) = self.transient.as_mut().and_then(|t| t.sweep_since.take()) {
            self.stat.sweep_time.add_time(ts - since);
        }
    }

    /// Charge the part of a finished GC window this goroutine lived through
    pub(crate) fn charge_gc(&mut self, clock: Clock) {
        if self.is_finalized() {
            return;
        }
        let from = clock
            .gc_window_start
            .map_or(self.creation_time, |start| start.max(self.creation_time));
        self.stat.gc_time.add_time(clock.now - from);
    }

    /// Push a region opened by a user-region start event
    pub(crate) fn open_region(
        &mut self,
        ev: &Event,
        here: EventRef,
        clock: Clock,
    ) -> Result<(), EngineError> {
        let name = ev.sarg(0)?.to_string();
        let task_id = ev.arg(0)?;
        let opening = self.snapshot(clock);

        let t = live_state(&mut self.transient, self.id, ev)?;
        t.active_regions.push(RegionRecord {
            task_id,
            name,
            start: Some(here),
            end: None,
            stat: opening,
        });
        Ok(())
    }

    /// Close the innermost open region, or record a start-less region if
    /// none is open.
    pub(crate) fn close_region(
        &mut self,
        ev: &Event,
        here: EventRef,
        clock: Clock,
    ) -> Result<(), EngineError> {
        let now = self.snapshot(clock);

        let t = live_state(&mut self.transient, self.id, ev)?;
        let mut region = match t.active_regions.pop() {
            Some(region) => region,
            None => RegionRecord {
                task_id: ev.arg(0)?,
                name: ev.sarg(0)?.to_string(),
                start: None,
                end: None,
                stat: ExecutionStat::default(),
            },
        };

        region.stat = now.sub(&region.stat);
        region.end = Some(here);
        self.regions.push(region);
        Ok(())
    }

    /// Order regions by start time; regions without a start come first.
    pub(crate) fn sort_regions(&mut self) {
        self.regions.sort_by_key(|r| r.start_ts());
    }
}

/// Transient state of a goroutine that must still be live for `ev`
fn live_state<'a>(
    transient: &'a mut Option<Transient>,
    id: u64,
    ev: &Event,
) -> Result<&'a mut Transient, EngineError> {
    transient.as_mut().ok_or(EngineError::GoroutineFinalized {
        goroutine: id,
        ts: ev.ts,
        kind: ev.kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{EventType, Frame};

    fn live(id: u64, created: i64, state: GoState) -> GoroutineRecord {
        let mut g = GoroutineRecord::new(id, created);
        g.transient.as_mut().unwrap().state = state;
        g
    }

    #[test]
    fn test_new_goroutine_waits_for_scheduler() {
        let g = GoroutineRecord::new(7, 100);
        let snap = g.snapshot(Clock::new(130, None));

        assert_eq!(snap.sched_wait_time.total, 30);
        assert_eq!(snap.total_time.total, 30);
        assert_eq!(snap.exec_time.count, 0);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let g = live(1, 0, GoState::Running(10));
        let first = g.snapshot(Clock::new(50, None));
        let second = g.snapshot(Clock::new(50, None));

        assert_eq!(first, second);
        assert_eq!(g.stat, ExecutionStat::default());
        assert_eq!(first.exec_time.total, 40);
    }

    #[test]
    fn test_snapshot_charges_gc_overlap_only() {
        let early = live(1, 0, GoState::Running(0));
        let late = live(2, 150, GoState::Runnable(150));
        let clock = Clock::new(200, Some(100));

        assert_eq!(early.snapshot(clock).gc_time.total, 100);
        assert_eq!(late.snapshot(clock).gc_time.total, 50);
    }

    #[test]
    fn test_blocked_on_gc_is_uncharged() {
        let g = live(1, 0, GoState::BlockedOnGc(20));
        let snap = g.snapshot(Clock::new(60, None));

        assert_eq!(snap.total_time.total, 60);
        assert_eq!(snap.unknown_time().total, 60);
    }

    #[test]
    fn test_sweep_overlaps_execution() {
        let mut g = live(1, 0, GoState::Running(0));
        g.transient.as_mut().unwrap().sweep_since = Some(30);
        let snap = g.snapshot(Clock::new(50, None));

        assert_eq!(snap.exec_time.total, 50);
        assert_eq!(snap.sweep_time.total, 20);
    }

    #[test]
    fn test_finalize_closes_open_regions() {
        let mut g = live(1, 0, GoState::Running(0));
        let opening = g.snapshot(Clock::new(5, None));
        g.transient.as_mut().unwrap().active_regions.push(RegionRecord {
            task_id: 3,
            name: "load".to_string(),
            start: None,
            end: None,
            stat: opening,
        });

        let end = Event::new(EventType::GoEnd, 40, 1);
        g.finalize(Clock::new(40, None), Some(EventRef::new(9, &end)));

        assert!(g.is_finalized());
        assert_eq!(g.end_time, Some(40));
        assert_eq!(g.stat.exec_time.total, 40);
        assert_eq!(g.regions.len(), 1);
        assert_eq!(g.regions[0].end.map(|e| e.seq), Some(9));
        assert_eq!(g.regions[0].stat.exec_time.total, 35);
        assert_eq!(g.regions[0].stat.total_time.total, 35);
    }

    #[test]
    fn test_finalize_without_trigger_leaves_end_unset() {
        let mut g = live(1, 0, GoState::Running(0));
        g.finalize(Clock::new(25, None), None);

        assert_eq!(g.end_time, None);
        assert_eq!(g.stat.total_time.total, 25);
    }

    #[test]
    fn test_snapshot_of_finalized_is_stable() {
        let mut g = live(1, 0, GoState::Running(0));
        g.finalize(Clock::new(25, None), None);

        assert_eq!(g.snapshot(Clock::new(1000, Some(500))), g.stat);
    }

    #[test]
    fn test_sort_regions_puts_startless_first() {
        let mut g = GoroutineRecord::new(1, 0);
        let mk = |ts: Option<i64>| RegionRecord {
            task_id: 0,
            name: format!("{:?}", ts),
            start: ts.map(|ts| EventRef {
                seq: 0,
                ts,
                kind: EventType::UserRegion,
            }),
            end: None,
            stat: ExecutionStat::default(),
        };
        g.regions = vec![mk(Some(30)), mk(None), mk(Some(10))];
        g.sort_regions();

        let starts: Vec<_> = g.regions.iter().map(|r| r.start_ts()).collect();
        assert_eq!(starts, vec![None, Some(10), Some(30)]);
    }

    #[test]
    fn test_start_names_goroutine_from_first_start() {
        let mut g = GoroutineRecord::new(4, 0);
        let first = Event::new(EventType::GoStart, 10, 4)
            .with_stack(vec![Frame::new(0x1000, "main.worker")]);
        g.start_running(&first).unwrap();
        g.stop_running(&Event::new(EventType::GoSched, 20, 4), GoState::Runnable(20))
            .unwrap();

        let second = Event::new(EventType::GoStart, 25, 4)
            .with_stack(vec![Frame::new(0x2000, "runtime.other")]);
        g.start_running(&second).unwrap();

        assert_eq!(g.pc, 0x1000);
        assert_eq!(g.name, "main.worker");
        assert_eq!(g.start_time, Some(10));
        assert_eq!(g.stat.sched_wait_time.count, 2);
        assert_eq!(g.stat.sched_wait_time.total, 15);
    }

    #[test]
    fn test_stop_running_requires_running() {
        let mut g = GoroutineRecord::new(4, 0);
        let block = Event::new(EventType::GoBlockRecv, 5, 4);

        assert_eq!(
            g.stop_running(&block, GoState::BlockedOnSync(5)),
            Err(EngineError::NotRunning {
                goroutine: 4,
                ts: 5,
                kind: EventType::GoBlockRecv
            })
        );
    }

    #[test]
    fn test_unblock_rejects_running() {
        let mut g = live(2, 0, GoState::Running(0));
        let unblock = Event::new(EventType::GoUnblock, 5, 9).with_args(&[2]);

        assert!(matches!(
            g.unblock(&unblock),
            Err(EngineError::RunnableWhileRunning { goroutine: 2, .. })
        ));
    }

    #[test]
    fn test_unblock_rejects_goroutine_in_syscall() {
        let mut g = live(2, 0, GoState::BlockedOnSyscall(3));
        let unblock = Event::new(EventType::GoUnblock, 5, 9).with_args(&[2]);

        assert_eq!(
            g.unblock(&unblock),
            Err(EngineError::UnblockDuringSyscall { goroutine: 2, ts: 5 })
        );
        assert_eq!(g.stat.syscall_time.count, 0);
    }

    #[test]
    fn test_unblock_keeps_scheduler_wait_of_runnable() {
        let mut g = live(2, 0, GoState::Runnable(4));
        g.unblock(&Event::new(EventType::GoUnblock, 9, 1).with_args(&[2]))
            .unwrap();
        g.start_running(&Event::new(EventType::GoStart, 12, 2)).unwrap();

        assert_eq!(g.stat.sched_wait_time.total, 8);
    }

    #[test]
    fn test_syscall_exit_closes_syscall_block() {
        let mut g = live(2, 0, GoState::BlockedOnSyscall(10));
        g.exit_syscall(&Event::new(EventType::GoSysExit, 25, 2)).unwrap();
        g.start_running(&Event::new(EventType::GoStart, 30, 2)).unwrap();

        assert_eq!(g.stat.syscall_time.total, 15);
        assert_eq!(g.stat.sched_wait_time.total, 5);
    }

    #[test]
    fn test_start_out_of_block_closes_block() {
        let mut g = live(2, 0, GoState::BlockedOnNet(10));
        g.start_running(&Event::new(EventType::GoStart, 40, 2)).unwrap();

        assert_eq!(g.stat.io_time.count, 1);
        assert_eq!(g.stat.io_time.total, 30);
        assert_eq!(g.stat.sched_wait_time.count, 0);
    }

    #[test]
    fn test_start_rejects_running() {
        let mut g = live(2, 0, GoState::Running(0));

        assert_eq!(
            g.start_running(&Event::new(EventType::GoStart, 7, 2)),
            Err(EngineError::AlreadyRunning {
                goroutine: 2,
                ts: 7,
                kind: EventType::GoStart
            })
        );
    }

    #[test]
    fn test_events_after_finalize_are_rejected() {
        let mut g = live(2, 0, GoState::Running(0));
        g.finalize(Clock::new(10, None), None);

        let start = Event::new(EventType::GoStart, 20, 2);
        assert!(matches!(
            g.start_running(&start),
            Err(EngineError::GoroutineFinalized { goroutine: 2, ts: 20, .. })
        ));
    }

    #[test]
    fn test_charge_gc_skips_finalized() {
        let mut g = live(2, 0, GoState::Running(0));
        g.finalize(Clock::new(10, None), None);
        g.charge_gc(Clock::new(50, Some(20)));

        assert_eq!(g.stat.gc_time.count, 0);
    }
}
