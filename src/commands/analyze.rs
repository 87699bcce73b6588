//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the event log
//! 2. Computes per-goroutine statistics
//! 3. Groups and orders the results
//! 4. Writes the JSON report and optional summary

use super::models::AnalyzeArgs;
use crate::output::write_report;
use crate::parser::load_events;
use crate::report::{generate_text_summary, to_report};
use crate::stats::AnalysisSession;
use crate::utils::config::MAX_TOP_GROUPS;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Event log cannot be read or decoded
/// * Event log is inconsistent (engine error)
/// * Report cannot be written
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Step 1: Load events
    info!("Step 1/4: Loading event log...");
    let events = load_events(&args.input)
        .with_context(|| format!("Failed to load event log {}", args.input.display()))?;
    let event_count = events.len();
    debug!("Loaded {} events", event_count);

    // Step 2: Run the statistics engine
    info!("Step 2/4: Computing goroutine statistics...");
    let session = AnalysisSession::new(events);
    let stats = session
        .goroutine_stats()
        .context("Failed to compute goroutine statistics")?;
    debug!("Computed statistics for {} goroutines", stats.len());

    // Step 3: Group and order
    info!("Step 3/4: Grouping goroutines by start function (sort by {})...", args.sort_key);
    let source = args.input.display().to_string();
    let report = to_report(&source, event_count, &stats, args.sort_key, args.top_groups);

    for (i, group) in report.groups.iter().take(3).enumerate() {
        debug!(
            "  {}. {} x{} ({} ns exec)",
            i + 1,
            group.name,
            group.count,
            group.stat.exec_time.total
        );
    }

    // Step 4: Write outputs
    match &args.output_json {
        Some(path) => {
            info!("Step 4/4: Writing report...");
            write_report(&report, path).context("Failed to write report JSON")?;
            info!("✓ Report written to: {}", path.display());
        }
        None => info!("Step 4/4: Skipping report file (not requested)"),
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("GOROUTINE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Event log:   {}", source);
        println!("Events:      {}", event_count);
        println!("Goroutines:  {}", report.goroutine_count);
        println!(
            "\n{}",
            generate_text_summary(
                &report.groups,
                args.top_groups,
                report.group_count,
                report.total_exec_time
            )
        );
        println!("{}", "=".repeat(80));
    }

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if let Some(output) = &args.output_json {
        if output.as_os_str().is_empty() {
            anyhow::bail!("Output path cannot be empty");
        }
        if output == &args.input {
            anyhow::bail!("Output path must differ from the input event log");
        }
    }

    if args.top_groups == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    if args.top_groups > MAX_TOP_GROUPS {
        anyhow::bail!("top is too large (max {})", MAX_TOP_GROUPS);
    }

    Ok(())
}
