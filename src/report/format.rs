//! Human-readable durations.

use crate::stats::StatEntry;

/// Format nanoseconds with the largest unit that keeps the value >= 1
pub fn format_duration(ns: i64) -> String {
    let abs = ns.unsigned_abs();
    let value = ns as f64;

    if abs < 1_000 {
        format!("{}ns", ns)
    } else if abs < 1_000_000 {
        format!("{:.2}µs", value / 1e3)
    } else if abs < 1_000_000_000 {
        format!("{:.2}ms", value / 1e6)
    } else {
        format!("{:.2}s", value / 1e9)
    }
}

/// `[min/avg/max]` of an entry, empty if nothing was recorded
pub fn min_avg_max(entry: &StatEntry) -> String {
    match entry.mean() {
        Some(avg) => format!(
            "[{}/{}/{}]",
            format_duration(entry.min),
            format_duration(avg),
            format_duration(entry.max)
        ),
        None => String::new(),
    }
}

/// `part` as a percentage of `whole`, if `whole` is non-zero
pub fn percent(part: i64, whole: i64) -> Option<f64> {
    (whole != 0).then(|| part as f64 / whole as f64 * 100.0)
}
