//! Report JSON schema definitions.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use super::group::{group_by_start_pc, total_exec_time, GoroutineGroup};
use super::sort::{sort_rows, SortKey};
use crate::stats::{ExecutionStat, GoroutineRecord, GoroutineStats, RegionRecord};
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Event log the report was computed from
    pub source: String,

    pub event_count: usize,

    pub goroutine_count: usize,

    /// Execution time summed over all goroutines (ns)
    pub total_exec_time: i64,

    /// Key the group and goroutine lists are ordered by
    pub sort_key: String,

    /// Number of distinct start functions, before the `top` cut
    #[serde(default)]
    pub group_count: usize,

    /// Groups by start function
    pub groups: Vec<GoroutineGroup>,

    pub goroutines: Vec<GoroutineSummary>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Finalized statistics of one goroutine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoroutineSummary {
    pub id: u64,
    pub name: String,
    pub pc: u64,
    pub creation_time: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,

    pub stat: ExecutionStat,

    /// Lifetime not explained by any tracked category (ns)
    pub unknown_time: i64,

    pub regions: Vec<RegionRecord>,
}

impl From<&GoroutineRecord> for GoroutineSummary {
    fn from(g: &GoroutineRecord) -> Self {
        Self {
            id: g.id,
            name: g.name.clone(),
            pc: g.pc,
            creation_time: g.creation_time,
            start_time: g.start_time,
            end_time: g.end_time,
            stat: g.stat,
            unknown_time: g.stat.unknown_time().total,
            regions: g.regions.clone(),
        }
    }
}

/// Build a report from computed statistics
///
/// **Public** - used by commands to create final output
///
/// # Arguments
/// * `source` - Where the events came from (shown in the report)
/// * `event_count` - Number of events analyzed
/// * `stats` - Engine output
/// * `key` - Ordering of groups and goroutines
/// * `top_groups` - Maximum number of groups kept
pub fn to_report(
    source: &str,
    event_count: usize,
    stats: &GoroutineStats,
    key: SortKey,
    top_groups: usize,
) -> Report {
    use chrono::Utc;

    let mut groups = group_by_start_pc(stats);
    sort_rows(&mut groups, key);
    let group_count = groups.len();
    groups.truncate(top_groups);

    let mut records: Vec<&GoroutineRecord> = stats.values().collect();
    sort_rows(&mut records, key.for_goroutines());

    Report {
        version: SCHEMA_VERSION.to_string(),
        source: source.to_string(),
        event_count,
        goroutine_count: stats.len(),
        total_exec_time: total_exec_time(stats),
        sort_key: key.to_string(),
        group_count,
        groups,
        goroutines: records.into_iter().map(GoroutineSummary::from).collect(),
        generated_at: Utc::now().to_rfc3339(),
    }
}
