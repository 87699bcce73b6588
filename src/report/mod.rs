//! Grouping, ordering and rendering of goroutine statistics.
//!
//! This module turns engine output into:
//! - Groups of goroutines by start function
//! - Listings ordered by an enumerated sort key
//! - The versioned JSON report and terminal summaries

pub mod format;
pub mod group;
pub mod schema;
pub mod sort;
pub mod summary;

// Re-export main types and functions
pub use format::{format_duration, min_avg_max, percent};
pub use group::{group_by_start_pc, group_detail, total_exec_time, GoroutineGroup, GroupDetail};
pub use schema::{to_report, GoroutineSummary, Report};
pub use sort::{sort_rows, SortKey, SortableRow};
pub use summary::{
    format_breakdown, format_group_detail, format_regions, generate_text_summary, stacked_bar,
};
