//! Inspect commands: one group, one goroutine's regions, related goroutines.

use super::models::{InspectArgs, InspectTarget};
use crate::parser::load_events;
use crate::report::{format_breakdown, format_group_detail, format_regions, group_detail};
use crate::stats::AnalysisSession;
use anyhow::{Context, Result};
use log::info;

/// Execute an inspect command and return the text to print
///
/// **Public** - main entry point called from main.rs
pub fn execute_inspect(args: &InspectArgs) -> Result<String> {
    let events = load_events(&args.input)
        .with_context(|| format!("Failed to load event log {}", args.input.display()))?;
    let session = AnalysisSession::new(events);

    inspect(&session, args.target)
}

/// Render `target` from an already loaded session
pub fn inspect(session: &AnalysisSession, target: InspectTarget) -> Result<String> {
    match target {
        InspectTarget::Related { goroutine } => {
            let related = session.related_goroutines(goroutine);
            info!("{} goroutines related to {}", related.len(), goroutine);

            let ids: Vec<String> = related.iter().map(u64::to_string).collect();
            Ok(format!("Related to goroutine {}: {}", goroutine, ids.join(" ")))
        }

        InspectTarget::Group { pc, sort_key } => {
            let stats = session
                .goroutine_stats()
                .context("Failed to compute goroutine statistics")?;
            let detail = group_detail(&stats, pc, sort_key);
            if detail.goroutines.is_empty() {
                anyhow::bail!("No goroutine started at pc {}", pc);
            }
            Ok(format_group_detail(&detail))
        }

        InspectTarget::Regions { goroutine } => {
            let stats = session
                .goroutine_stats()
                .context("Failed to compute goroutine statistics")?;
            let g = stats
                .get(&goroutine)
                .with_context(|| format!("Goroutine {} not found in event log", goroutine))?;

            Ok(format!(
                "Goroutine {} ({})\n{}\n\n{}",
                g.id,
                if g.name.is_empty() { "unnamed" } else { g.name.as_str() },
                format_breakdown(&g.stat),
                format_regions(g)
            ))
        }
    }
}
