//! Duration accumulators.
//!
//! `StatEntry` folds a stream of non-negative durations into
//! count/total/min/max. `ExecutionStat` holds one entry per time category
//! a goroutine can be in, plus its overall lifetime.

use serde::{Deserialize, Serialize};

/// Accumulation of zero or more durations (nanoseconds)
///
/// `count == 0` implies `total == min == max == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub count: i64,
    pub total: i64,
    pub min: i64,
    pub max: i64,
}

impl StatEntry {
    /// Record one interval. Zero-length intervals carry no timing signal
    /// and are dropped.
    pub fn add_time(&mut self, time: i64) {
        if time == 0 {
            return;
        }
        if self.count == 0 {
            self.min = time;
            self.max = time;
        }
        self.count += 1;
        self.total += time;
        self.min = self.min.min(time);
        self.max = self.max.max(time);
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &StatEntry) {
        if self.count == 0 {
            self.min = other.min;
            self.max = other.max;
        } else if other.count > 0 {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
        self.total += other.total;
        self.count += other.count;
    }

    /// Mean interval length, if any interval was recorded
    pub fn mean(&self) -> Option<i64> {
        (self.count > 0).then(|| self.total / self.count)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Time categories tracked per goroutine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    Execution,
    NetworkWait,
    SyncBlock,
    SyscallBlock,
    SchedulerWait,
    GcSweep,
    GcPause,
    Total,
}

impl StatCategory {
    /// Every category, in display order
    pub const ALL: [StatCategory; 8] = [
        StatCategory::Total,
        StatCategory::Execution,
        StatCategory::NetworkWait,
        StatCategory::SyncBlock,
        StatCategory::SyscallBlock,
        StatCategory::SchedulerWait,
        StatCategory::GcSweep,
        StatCategory::GcPause,
    ];

    /// Categories that partition a goroutine's lifetime; whatever they
    /// leave uncovered is reported as unknown time.
    pub const LIFETIME_PARTS: [StatCategory; 5] = [
        StatCategory::Execution,
        StatCategory::NetworkWait,
        StatCategory::SyncBlock,
        StatCategory::SyscallBlock,
        StatCategory::SchedulerWait,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Execution => "Execution",
            Self::NetworkWait => "Network wait",
            Self::SyncBlock => "Sync block",
            Self::SyscallBlock => "Blocking syscall",
            Self::SchedulerWait => "Scheduler wait",
            Self::GcSweep => "GC sweeping",
            Self::GcPause => "GC pause",
            Self::Total => "Total",
        }
    }
}

/// Execution statistics of a goroutine over some period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionStat {
    pub exec_time: StatEntry,
    pub sched_wait_time: StatEntry,
    pub io_time: StatEntry,
    pub block_time: StatEntry,
    pub syscall_time: StatEntry,
    pub gc_time: StatEntry,
    pub sweep_time: StatEntry,
    pub total_time: StatEntry,
}

impl ExecutionStat {
    pub fn entry(&self, category: StatCategory) -> &StatEntry {
        match category {
            StatCategory::Execution => &self.exec_time,
            StatCategory::NetworkWait => &self.io_time,
            StatCategory::SyncBlock => &self.block_time,
            StatCategory::SyscallBlock => &self.syscall_time,
            StatCategory::SchedulerWait => &self.sched_wait_time,
            StatCategory::GcSweep => &self.sweep_time,
            StatCategory::GcPause => &self.gc_time,
            StatCategory::Total => &self.total_time,
        }
    }

    pub fn entry_mut(&mut self, category: StatCategory) -> &mut StatEntry {
        match category {
            StatCategory::Execution => &mut self.exec_time,
            StatCategory::NetworkWait => &mut self.io_time,
            StatCategory::SyncBlock => &mut self.block_time,
            StatCategory::SyscallBlock => &mut self.syscall_time,
            StatCategory::SchedulerWait => &mut self.sched_wait_time,
            StatCategory::GcSweep => &mut self.sweep_time,
            StatCategory::GcPause => &mut self.gc_time,
            StatCategory::Total => &mut self.total_time,
        }
    }

    /// Returns `self - earlier` on totals only.
    ///
    /// Count/min/max are kept from `self`; they describe the intervals seen
    /// so far, not the delta.
    pub fn sub(&self, earlier: &ExecutionStat) -> ExecutionStat {
        let mut r = *self;
        for category in StatCategory::ALL {
            r.entry_mut(category).total -= earlier.entry(category).total;
        }
        r
    }

    /// Merge every category of `other` into `self`
    pub fn merge(&mut self, other: &ExecutionStat) {
        for category in StatCategory::ALL {
            self.entry_mut(category).merge(other.entry(category));
        }
    }

    /// Lifetime not covered by execution, waits or blocks.
    ///
    /// Only `total` is meaningful in the returned entry.
    pub fn unknown_time(&self) -> StatEntry {
        let covered: i64 = StatCategory::LIFETIME_PARTS
            .iter()
            .map(|c| self.entry(*c).total)
            .sum();

        if covered < self.total_time.total {
            StatEntry {
                total: self.total_time.total - covered,
                ..StatEntry::default()
            }
        } else {
            StatEntry::default()
        }
    }
}
