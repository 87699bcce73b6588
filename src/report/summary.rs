//! Terminal summaries of goroutine statistics.

use super::format::{format_duration, min_avg_max, percent};
use super::group::{GoroutineGroup, GroupDetail};
use crate::stats::{ExecutionStat, GoroutineRecord, StatCategory};

const RESET: &str = "\x1b[0m";
const BAR_WIDTH: usize = 50;

fn ansi_color(category: StatCategory) -> &'static str {
    match category {
        StatCategory::Execution => "\x1b[31;1m", // Red
        StatCategory::NetworkWait => "\x1b[33m", // Orange/Yellow
        StatCategory::SyncBlock => "\x1b[35m",   // Magenta
        StatCategory::SyscallBlock => "\x1b[34m", // Purple/Blue
        StatCategory::SchedulerWait => "\x1b[36m", // Cyan
        StatCategory::GcSweep | StatCategory::GcPause => "\x1b[32m",
        StatCategory::Total => "\x1b[90m", // Gray
    }
}

/// Keep the last `width` characters of `name`, marking the cut with "..."
fn truncate_left(name: &str, width: usize) -> String {
    let len = name.chars().count();
    if len <= width {
        return name.to_string();
    }
    let tail: String = name.chars().skip(len - (width - 3)).collect();
    format!("...{}", tail)
}

/// One-line stacked bar of where a lifetime went
///
/// Unknown time is drawn in gray first, then each lifetime category in
/// its color, scaled to `BAR_WIDTH` characters.
pub fn stacked_bar(stat: &ExecutionStat) -> String {
    let total = stat.total_time.total;
    if total <= 0 {
        return String::new();
    }

    let segment = |value: i64, color: &str| {
        let width = (value as f64 / total as f64 * BAR_WIDTH as f64).round() as usize;
        if width == 0 {
            String::new()
        } else {
            format!("{}{}{}", color, "█".repeat(width), RESET)
        }
    };

    let mut bar = segment(stat.unknown_time().total, ansi_color(StatCategory::Total));
    for category in StatCategory::LIFETIME_PARTS {
        bar.push_str(&segment(stat.entry(category).total, ansi_color(category)));
    }
    bar
}

/// Create a text summary of the group listing
///
/// # Arguments
/// * `groups` - Groups, already sorted
/// * `max_lines` - Maximum number of groups shown
/// * `group_count` - Groups in the whole program, which may exceed `groups`
/// * `total_exec_time` - Program execution time, for percentages
pub fn generate_text_summary(
    groups: &[GoroutineGroup],
    max_lines: usize,
    group_count: usize,
    total_exec_time: i64,
) -> String {
    let mut lines = Vec::new();

    lines.push("  GOROUTINE GROUPS".to_string());
    lines.push(format!(
        "  {:<40} {:>6} {:>12} {:>20} {:>12} {:>12} {:>12} {:>12}",
        "Start function", "Count", "Total", "Execution", "Network", "Sync", "Syscall", "Sched"
    ));
    lines.push(format!("  {}", "─".repeat(134)));

    for group in groups.iter().take(max_lines) {
        let s = &group.stat;
        let exec_share = percent(s.exec_time.total, total_exec_time)
            .map(|p| format!(" ({:.1}%)", p))
            .unwrap_or_default();

        let display_name = truncate_left(&group.name, 40);

        lines.push(format!(
            "  {:<40} {:>6} {:>12} {}{:>20}{} {:>12} {:>12} {:>12} {:>12}",
            display_name,
            group.count,
            format_duration(s.total_time.total),
            ansi_color(StatCategory::Execution),
            format!("{}{}", format_duration(s.exec_time.total), exec_share),
            RESET,
            format_duration(s.io_time.total),
            format_duration(s.block_time.total),
            format_duration(s.syscall_time.total),
            format_duration(s.sched_wait_time.total),
        ));
        lines.push(format!("  {:<40} {}", "", stacked_bar(s)));
    }

    let shown = groups.len().min(max_lines);
    let group_count = group_count.max(groups.len());
    if group_count > shown {
        lines.push(String::new());
        lines.push(format!(
            "   (Showing top {} of {} goroutine groups)",
            shown, group_count
        ));
    }

    lines.join("\n")
}

/// Per-category breakdown of one stat, with min/avg/max
pub fn format_breakdown(stat: &ExecutionStat) -> String {
    let mut lines = Vec::new();
    for category in StatCategory::ALL {
        let entry = stat.entry(category);
        lines.push(format!(
            "    {:<18} {:>12} {}",
            category.label(),
            format_duration(entry.total),
            min_avg_max(entry)
        ));
    }
    lines.push(format!(
        "    {:<18} {:>12}",
        "Unknown",
        format_duration(stat.unknown_time().total)
    ));
    lines.join("\n")
}

/// Listing of the goroutines of one group
pub fn format_group_detail(detail: &GroupDetail<'_>) -> String {
    let mut lines = vec![
        format!("  Goroutine Name:       {}", detail.name),
        format!("  Number of Goroutines: {}", detail.goroutines.len()),
        format!(
            "  Execution Time:       {} of total program execution time",
            detail
                .exec_time_percent()
                .map(|p| format!("{:.2}%", p))
                .unwrap_or_default()
        ),
        String::new(),
    ];

    for g in &detail.goroutines {
        lines.push(format!(
            "  goroutine {:<8} total {:>12}  exec {:>12} {}",
            g.id,
            format_duration(g.stat.total_time.total),
            format_duration(g.stat.exec_time.total),
            min_avg_max(&g.stat.exec_time)
        ));
        lines.push(format!("  {:<8} {}", "", stacked_bar(&g.stat)));
    }

    lines.join("\n")
}

/// Region list of one goroutine
pub fn format_regions(g: &GoroutineRecord) -> String {
    if g.regions.is_empty() {
        return format!("  goroutine {} has no regions", g.id);
    }

    let ts = |t: Option<i64>| t.map_or_else(|| "-".to_string(), |t| t.to_string());

    let mut lines = vec![format!(
        "  {:<24} {:>8} {:>14} {:>14} {:>12} {:>12}",
        "Region", "Task", "Start", "End", "Total", "Execution"
    )];
    for r in &g.regions {
        let name = if r.name.is_empty() { "<task>" } else { r.name.as_str() };
        lines.push(format!(
            "  {:<24} {:>8} {:>14} {:>14} {:>12} {:>12}",
            name,
            r.task_id,
            ts(r.start_ts()),
            ts(r.end_ts()),
            format_duration(r.stat.total_time.total),
            format_duration(r.stat.exec_time.total),
        ));
    }
    lines.join("\n")
}
