//! Goroutine Stats CLI
//!
//! Per-goroutine execution statistics for Go runtime traces.
//! Breaks each goroutine's lifetime down by where its time went.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use goroutine_stats::commands::{
    display_schema, display_version, execute_analyze, execute_inspect, validate_args,
    validate_report_file, AnalyzeArgs, InspectArgs, InspectTarget,
};
use goroutine_stats::report::SortKey;
use goroutine_stats::utils::config::DEFAULT_TOP_GROUPS;

/// Goroutine Stats - execution statistics for Go runtime traces
#[derive(Parser, Debug)]
#[command(name = "gostats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze an event log and write a JSON report
    Analyze {
        /// Event log (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Sort key: count, total, exec, io, block, syscall, sched, sweep, gc
        #[arg(short, long, default_value = "exec")]
        sort_by: String,

        /// Number of goroutine groups to keep
        #[arg(long, default_value_t = DEFAULT_TOP_GROUPS)]
        top: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// List the goroutines started at one pc
    Goroutines {
        /// Event log (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Start pc of the group
        #[arg(long)]
        pc: u64,

        /// Sort key: total, exec, io, block, syscall, sched, sweep, gc
        #[arg(short, long, default_value = "total")]
        sort_by: String,
    },

    /// List goroutines related to one goroutine through unblocks
    Related {
        /// Event log (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Goroutine id
        #[arg(short, long)]
        goroutine: u64,
    },

    /// Show the user regions of one goroutine
    Regions {
        /// Event log (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Goroutine id
        #[arg(short, long)]
        goroutine: u64,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            output,
            sort_by,
            top,
            summary,
        } => {
            let args = AnalyzeArgs {
                input,
                output_json: Some(output),
                sort_key: SortKey::parse_or_default(&sort_by),
                top_groups: top,
                print_summary: summary,
            };

            // Validate arguments
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Goroutines { input, pc, sort_by } => {
            let target = InspectTarget::Group {
                pc,
                sort_key: SortKey::parse_or_default(&sort_by),
            };
            println!("{}", execute_inspect(&InspectArgs { input, target })?);
        }

        Commands::Related { input, goroutine } => {
            let target = InspectTarget::Related { goroutine };
            println!("{}", execute_inspect(&InspectArgs { input, target })?);
        }

        Commands::Regions { input, goroutine } => {
            let target = InspectTarget::Regions { goroutine };
            println!("{}", execute_inspect(&InspectArgs { input, target })?);
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
