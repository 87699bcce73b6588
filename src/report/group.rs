//! Grouping of goroutines by start function.
//!
//! Goroutines started from the same pc are instances of the same
//! `go f()` statement; their stats are merged so the listing shows one
//! row per start function.

use super::sort::{sort_rows, SortKey};
use crate::stats::{ExecutionStat, GoroutineRecord, GoroutineStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Goroutines sharing a start pc, with merged statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoroutineGroup {
    /// Start pc, used as the group id
    pub pc: u64,

    /// Start function name, or `PC:<pc>` when unknown
    pub name: String,

    /// Number of goroutines in the group
    pub count: usize,

    pub stat: ExecutionStat,
}

/// Group goroutines by start pc
///
/// **Public** - backs the group listing
///
/// # Returns
/// One group per distinct start pc, ordered by pc
pub fn group_by_start_pc(stats: &GoroutineStats) -> Vec<GoroutineGroup> {
    let mut groups: BTreeMap<u64, GoroutineGroup> = BTreeMap::new();

    for g in stats.values() {
        let group = groups.entry(g.pc).or_insert_with(|| GoroutineGroup {
            pc: g.pc,
            ..Default::default()
        });

        if group.name.is_empty() && !g.name.is_empty() {
            group.name = g.name.clone();
        }
        group.count += 1;
        group.stat.merge(&g.stat);
    }

    groups
        .into_values()
        .map(|mut group| {
            if group.name.is_empty() {
                group.name = format!("PC:{}", group.pc);
            }
            group
        })
        .collect()
}

/// Execution time summed over every goroutine
pub fn total_exec_time(stats: &GoroutineStats) -> i64 {
    stats.values().map(|g| g.stat.exec_time.total).sum()
}

/// Goroutines of one group plus the group's share of program execution
#[derive(Debug)]
pub struct GroupDetail<'a> {
    pub pc: u64,
    pub name: String,
    pub goroutines: Vec<&'a GoroutineRecord>,

    /// Execution time of this group
    pub exec_time: i64,

    /// Execution time of the whole program
    pub total_exec_time: i64,

    /// Longest lifetime in the group
    pub max_total_time: i64,
}

impl GroupDetail<'_> {
    /// Group execution as a percentage of program execution
    pub fn exec_time_percent(&self) -> Option<f64> {
        (self.total_exec_time > 0)
            .then(|| self.exec_time as f64 / self.total_exec_time as f64 * 100.0)
    }
}

/// Collect the goroutines started at `pc`, sorted by `key`
///
/// **Public** - backs the per-group goroutine listing
pub fn group_detail(stats: &GoroutineStats, pc: u64, key: SortKey) -> GroupDetail<'_> {
    let mut goroutines: Vec<&GoroutineRecord> =
        stats.values().filter(|g| g.pc == pc).collect();

    sort_rows(&mut goroutines, key.for_goroutines());

    GroupDetail {
        pc,
        name: goroutines
            .iter()
            .map(|g| g.name.as_str())
            .find(|n| !n.is_empty())
            .unwrap_or_default()
            .to_string(),
        exec_time: goroutines.iter().map(|g| g.stat.exec_time.total).sum(),
        total_exec_time: total_exec_time(stats),
        max_total_time: goroutines
            .iter()
            .map(|g| g.stat.total_time.total)
            .max()
            .unwrap_or(0),
        goroutines,
    }
}
