use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    if report.version != SCHEMA_VERSION {
        log::warn!(
            "Report schema v{} differs from current v{}",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Events: {}", report.event_count);
    println!("  Goroutines: {}", report.goroutine_count);
    println!("  Groups: {} of {}", report.groups.len(), report.group_count);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Goroutine Stats Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string           - Schema version (e.g., '1.0.0')");
        println!("  source: string            - Event log path");
        println!("  event_count: number       - Events analyzed");
        println!("  goroutine_count: number   - Goroutines seen");
        println!("  total_exec_time: number   - Execution time of all goroutines (ns)");
        println!("  sort_key: string          - Ordering of groups and goroutines");
        println!("  group_count: number       - Distinct start functions before the top cut");
        println!("  groups: array             - Goroutines grouped by start function");
        println!("    pc, name, count         - Group identity and size");
        println!("    stat: object            - Merged statistics");
        println!("  goroutines: array         - Per-goroutine statistics");
        println!("    id, name, pc            - Goroutine identity");
        println!("    creation_time, start_time?, end_time? (ns)");
        println!("    stat: object            - exec/sched_wait/io/block/syscall/gc/sweep/total");
        println!("      {{count, total, min, max}} per category");
        println!("    unknown_time: number    - Lifetime not covered by a category");
        println!("    regions: array          - User regions with their own stat");
        println!("  generated_at: string      - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Goroutine Stats v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Per-goroutine execution statistics for Go runtime traces.");
}
