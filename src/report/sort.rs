//! Enumerated sort keys for goroutine and group listings.

use super::group::GoroutineGroup;
use crate::stats::{ExecutionStat, GoroutineRecord, StatCategory};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Column a listing is ordered by (always descending)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Number of goroutines in a group
    Count,
    Total,
    #[default]
    Execution,
    NetworkWait,
    SyncBlock,
    SyscallBlock,
    SchedulerWait,
    GcSweep,
    GcPause,
}

impl SortKey {
    pub const ALL: [SortKey; 9] = [
        SortKey::Count,
        SortKey::Total,
        SortKey::Execution,
        SortKey::NetworkWait,
        SortKey::SyncBlock,
        SortKey::SyscallBlock,
        SortKey::SchedulerWait,
        SortKey::GcSweep,
        SortKey::GcPause,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SortKey::Count => "count",
            SortKey::Total => "total",
            SortKey::Execution => "exec",
            SortKey::NetworkWait => "io",
            SortKey::SyncBlock => "block",
            SortKey::SyscallBlock => "syscall",
            SortKey::SchedulerWait => "sched",
            SortKey::GcSweep => "sweep",
            SortKey::GcPause => "gc",
        }
    }

    /// Stat category backing the key; `None` for `Count`
    pub fn category(self) -> Option<StatCategory> {
        match self {
            SortKey::Count => None,
            SortKey::Total => Some(StatCategory::Total),
            SortKey::Execution => Some(StatCategory::Execution),
            SortKey::NetworkWait => Some(StatCategory::NetworkWait),
            SortKey::SyncBlock => Some(StatCategory::SyncBlock),
            SortKey::SyscallBlock => Some(StatCategory::SyscallBlock),
            SortKey::SchedulerWait => Some(StatCategory::SchedulerWait),
            SortKey::GcSweep => Some(StatCategory::GcSweep),
            SortKey::GcPause => Some(StatCategory::GcPause),
        }
    }

    /// Key to use when every row is a single goroutine
    ///
    /// A count ordering means nothing there, so it becomes the default.
    pub fn for_goroutines(self) -> SortKey {
        match self {
            SortKey::Count => SortKey::default(),
            other => other,
        }
    }

    /// Parse a user-supplied key, falling back to the default
    pub fn parse_or_default(value: &str) -> SortKey {
        value.parse().unwrap_or_else(|_| {
            log::warn!(
                "Unknown sort key '{}', sorting by {}",
                value,
                SortKey::default()
            );
            SortKey::default()
        })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "count" | "n" => SortKey::Count,
            "total" | "totaltime" => SortKey::Total,
            "exec" | "execution" | "exectime" => SortKey::Execution,
            "io" | "network" | "net" | "iotime" => SortKey::NetworkWait,
            "block" | "sync" | "blocktime" => SortKey::SyncBlock,
            "syscall" | "syscalltime" => SortKey::SyscallBlock,
            "sched" | "scheduler" | "schedwaittime" => SortKey::SchedulerWait,
            "sweep" | "sweeptime" => SortKey::GcSweep,
            "gc" | "gctime" => SortKey::GcPause,
            other => return Err(format!("unknown sort key: {}", other)),
        })
    }
}

/// A row of a sortable listing
pub trait SortableRow {
    fn row_id(&self) -> u64;
    fn row_count(&self) -> usize;
    fn row_stat(&self) -> &ExecutionStat;

    fn sort_value(&self, key: SortKey) -> i64 {
        match key.category() {
            Some(category) => self.row_stat().entry(category).total,
            None => self.row_count() as i64,
        }
    }
}

impl SortableRow for GoroutineGroup {
    fn row_id(&self) -> u64 {
        self.pc
    }

    fn row_count(&self) -> usize {
        self.count
    }

    fn row_stat(&self) -> &ExecutionStat {
        &self.stat
    }
}

impl SortableRow for GoroutineRecord {
    fn row_id(&self) -> u64 {
        self.id
    }

    fn row_count(&self) -> usize {
        1
    }

    fn row_stat(&self) -> &ExecutionStat {
        &self.stat
    }
}

impl<T: SortableRow + ?Sized> SortableRow for &T {
    fn row_id(&self) -> u64 {
        (**self).row_id()
    }

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn row_stat(&self) -> &ExecutionStat {
        (**self).row_stat()
    }
}

/// Sort rows by `key` descending; ties go to the larger id first
pub fn sort_rows<T: SortableRow>(rows: &mut [T], key: SortKey) {
    rows.sort_by_key(|row| (Reverse(row.sort_value(key)), Reverse(row.row_id())));
}
